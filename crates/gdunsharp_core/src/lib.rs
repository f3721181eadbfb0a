//! Provide the canonical vocabulary shared by every gdunsharp phase.
//!
//! This crate is intentionally small and dependency-free. It holds the registry tables that describe the two
//! languages the translator sits between:
//! - the C# dialect accepted on input (builtin type names, modifiers, engine attributes), and
//! - the godot-cpp target (C++ spellings, headers, `Variant` type tags, reserved words).
//!
//! ## Notes
//!
//! - This is a "vocabulary" crate: **no IO**, no global state, and no syntax-tree or model types.
//! - Callers work with stable IDs (e.g. `PrimitiveTypeId`, `ModifierId`) and look up spellings and metadata through
//!   the registry functions instead of matching on strings across the translator.

pub mod lang;
