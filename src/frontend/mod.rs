//! Frontend: from syntax trees to a fully resolved project model.
//!
//! ## Phases
//! 1. [`outline`]: one syntax tree to one file-local outline (parallel across files).
//! 2. [`merge`]: every outline into one [`model::ProjectModel`] (the barrier).
//! 3. [`resolve`]: generic scopes ([`generics`]), name lookup ([`symbols`]) and target mapping ([`type_map`]) for
//!    every type reference.
//!
//! [`classify`] is a read-only view over the resolved model, used by the backend.

pub mod classify;
pub mod generics;
pub mod merge;
pub mod model;
pub mod outline;
pub mod resolve;
pub mod symbols;
pub mod type_map;
