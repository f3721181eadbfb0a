//! Language vocabulary registries.
//!
//! ## Notes
//! - Registries are intentionally **pure**: no model types, no IO, no side effects.
//! - The parser adapter enforces syntax; registries provide spellings and metadata for the outline builder, the
//!   resolver, and the emitter.
//!
//! ## Examples
//! ```rust
//! use gdunsharp_core::lang::modifiers::{self, ModifierId};
//!
//! assert_eq!(modifiers::from_str("readonly"), Some(ModifierId::Readonly));
//! assert_eq!(modifiers::as_str(ModifierId::Override), "override");
//! ```

pub mod attributes;
pub mod callbacks;
pub mod conventions;
pub mod cpp_keywords;
pub mod modifiers;
pub mod types;
