#![forbid(unsafe_code)]
//! gdunsharp: translate Godot-flavoured C# into godot-cpp C++.
//!
//! The crate is a pipeline: per-file outlines ([`frontend::outline`]) merge into one project model
//! ([`frontend::merge`]), every type reference in it is resolved and mapped ([`frontend::resolve`]), and the
//! emitter ([`backend`]) renders headers, definitions and forward headers from the resolved model.
//! [`pipeline::Translator`] runs all of it.
//!
//! ## Panic Policy
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` and `backend` modules
//!   enforce `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//!
//! - **True invariants**: If a panic represents a translator bug (logic error), use `.expect("INVARIANT: reason")`
//!   with a clear explanation.

pub mod backend;
pub mod cli;
pub mod config;
pub mod diagnostics;
pub mod frontend;
pub mod pipeline;

pub use backend::Artifact;
pub use config::TranslatorConfig;
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
pub use pipeline::{SourceUnit, Translator};
