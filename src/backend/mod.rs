//! Code emitter: resolved project model to C++ artifacts.
//!
//! ## Flow
//! 1. [`emission`] builds one canonical unit per top-level type (members classified, types mapped, includes derived).
//! 2. [`render`] turns a unit into header and definition text with [`cpp_emitter::CppEmitter`].
//! 3. [`project`] runs both over every top-level type in parallel and adds the namespace forward headers.
//!
//! Emission only reads the model; everything it needs was settled during resolution.

#![deny(clippy::unwrap_used)]

pub mod cpp_emitter;
pub mod emission;
pub mod includes;
pub mod layout;
pub mod literals;
pub mod project;
pub mod render;

pub use project::{Artifact, emit_project, write_artifacts};
