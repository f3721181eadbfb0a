//! Generic container builtin type vocabulary.
//!
//! This registry covers the generic container types a script can name (`List<T>`, `Dictionary<K, V>`, ...) and the
//! structural rule each one maps through by default.
//!
//! ## Notes
//! - Lookup via [`from_str`] is **case-sensitive** and matches on both name and arity, so the untyped engine
//!   `Array` (arity 0, an engine value type) and the typed `Array<T>` (arity 1, a container) never collide.
//! - The rule is a default; the translator's configuration may remap any container name.
//!
//! ## Examples
//! ```rust
//! use gdunsharp_core::lang::types::containers::{self, ContainerTypeId, StructuralRule};
//!
//! assert_eq!(containers::from_str("List", 1), Some(ContainerTypeId::List));
//! assert_eq!(containers::from_str("List", 2), None);
//! assert_eq!(containers::info_for(ContainerTypeId::Dictionary).rule, StructuralRule::Map);
//! ```

/// Structural mapping rule for a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StructuralRule {
    /// Sequence-of-T (also used for `T[]`).
    Sequence,
    /// Map-of-K-to-V; ordered or unordered by configuration.
    Map,
    /// Set-of-T.
    Set,
}

impl StructuralRule {
    /// Number of type arguments the rule consumes.
    pub fn arity(self) -> usize {
        match self {
            StructuralRule::Sequence | StructuralRule::Set => 1,
            StructuralRule::Map => 2,
        }
    }
}

/// Stable identifier for container builtin types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ContainerTypeId {
    List,
    Dictionary,
    HashSet,
    GodotArray,
    GodotDictionary,
}

/// Metadata for a container builtin type.
#[derive(Debug, Clone, Copy)]
pub struct ContainerTypeInfo {
    pub id: ContainerTypeId,
    /// Simple name as written in C#.
    pub canonical: &'static str,
    /// Namespace the type lives in.
    pub namespace: &'static str,
    pub aliases: &'static [&'static str],
    pub rule: StructuralRule,
}

/// Registry of container builtin types.
///
/// Order matters: when an unqualified name matches several entries with the same arity, the first one wins.
pub const CONTAINER_TYPES: &[ContainerTypeInfo] = &[
    info(
        ContainerTypeId::List,
        "List",
        "System.Collections.Generic",
        &["IList", "IReadOnlyList"],
        StructuralRule::Sequence,
    ),
    info(
        ContainerTypeId::Dictionary,
        "Dictionary",
        "System.Collections.Generic",
        &["IDictionary", "IReadOnlyDictionary"],
        StructuralRule::Map,
    ),
    info(
        ContainerTypeId::HashSet,
        "HashSet",
        "System.Collections.Generic",
        &["ISet"],
        StructuralRule::Set,
    ),
    info(ContainerTypeId::GodotArray, "Array", "Godot.Collections", &[], StructuralRule::Sequence),
    info(
        ContainerTypeId::GodotDictionary,
        "Dictionary",
        "Godot.Collections",
        &[],
        StructuralRule::Map,
    ),
];

/// Resolve an unqualified container name with `arity` type arguments.
pub fn from_str(name: &str, arity: usize) -> Option<ContainerTypeId> {
    CONTAINER_TYPES
        .iter()
        .filter(|t| t.rule.arity() == arity)
        .find(|t| t.canonical == name || t.aliases.contains(&name))
        .map(|t| t.id)
}

/// Resolve a container name written with a namespace qualifier (`Godot.Collections.Dictionary`).
pub fn from_qualified(namespace: &str, name: &str, arity: usize) -> Option<ContainerTypeId> {
    let namespace = namespace.strip_prefix("global::").unwrap_or(namespace);
    CONTAINER_TYPES
        .iter()
        .filter(|t| t.rule.arity() == arity && t.namespace == namespace)
        .find(|t| t.canonical == name || t.aliases.contains(&name))
        .map(|t| t.id)
}

/// Return the canonical spelling for a container type.
pub fn as_str(id: ContainerTypeId) -> &'static str {
    info_for(id).canonical
}

/// Return the full metadata entry for a container type.
///
/// ## Panics
/// - If the registry is missing an entry for `id` (this indicates a programming error).
pub fn info_for(id: ContainerTypeId) -> &'static ContainerTypeInfo {
    CONTAINER_TYPES
        .iter()
        .find(|t| t.id == id)
        .expect("container type info missing")
}

/// Key used by configuration tables: the namespace-qualified container name.
pub fn qualified_name(id: ContainerTypeId) -> String {
    let info = info_for(id);
    format!("{}.{}", info.namespace, info.canonical)
}

const fn info(
    id: ContainerTypeId,
    canonical: &'static str,
    namespace: &'static str,
    aliases: &'static [&'static str],
    rule: StructuralRule,
) -> ContainerTypeInfo {
    ContainerTypeInfo {
        id,
        canonical,
        namespace,
        aliases,
        rule,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unqualified_dictionary_prefers_system_collections() {
        assert_eq!(from_str("Dictionary", 2), Some(ContainerTypeId::Dictionary));
        assert_eq!(
            from_qualified("Godot.Collections", "Dictionary", 2),
            Some(ContainerTypeId::GodotDictionary)
        );
    }

    #[test]
    fn untyped_array_is_not_a_container() {
        assert_eq!(from_str("Array", 0), None);
        assert_eq!(from_str("Array", 1), Some(ContainerTypeId::GodotArray));
    }

    #[test]
    fn qualified_names_are_distinct() {
        let mut names: Vec<String> = CONTAINER_TYPES.iter().map(|t| qualified_name(t.id)).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), CONTAINER_TYPES.len());
    }
}
