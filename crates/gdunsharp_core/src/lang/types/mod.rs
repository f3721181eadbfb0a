//! Builtin type vocabularies.
//!
//! This module defines registries for the type names the resolver treats as builtins once the project's own
//! namespaces have been searched.
//!
//! ## Notes
//! - These registries are vocabulary only: spellings, default C++ spellings, headers and `Variant` tags.
//!   Mapping policy (which can be overridden by configuration) lives in the translator's type mapper.
//! - Each submodule groups a small family of types for readability.

pub mod containers;
pub mod engine;
pub mod primitives;

pub use containers::{CONTAINER_TYPES, ContainerTypeId, ContainerTypeInfo, StructuralRule};
pub use engine::{ENGINE_TYPES, EngineTypeInfo, EngineTypeKind};
pub use primitives::{PRIMITIVE_TYPES, PrimitiveTypeId, PrimitiveTypeInfo};

/// Namespaces whose types the builtin table stands in for.
///
/// A qualified reference such as `System.Int32` or `Godot.Node` that does not resolve inside the project is looked
/// up in the builtin tables by its last segment when its qualifier is one of these.
pub const BUILTIN_NAMESPACES: &[&str] = &[
    "System",
    "System.Collections.Generic",
    "Godot",
    "Godot.Collections",
];

/// Check whether a dotted namespace is covered by the builtin tables.
pub fn is_builtin_namespace(qualifier: &str) -> bool {
    let qualifier = qualifier.strip_prefix("global::").unwrap_or(qualifier);
    BUILTIN_NAMESPACES.contains(&qualifier)
}
