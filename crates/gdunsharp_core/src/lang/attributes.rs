//! Engine attribute vocabulary.
//!
//! Godot's C# bindings drive engine registration through attributes. Only the attributes listed here are
//! accepted; anything else on a translated declaration is a structural error.
//!
//! ## Examples
//! ```rust
//! use gdunsharp_core::lang::attributes::{self, AttributeId};
//!
//! assert_eq!(attributes::from_str("Signal"), Some(AttributeId::Signal));
//! assert_eq!(attributes::from_str("Godot.Export"), Some(AttributeId::Export));
//! assert_eq!(attributes::from_str("ExportAttribute"), Some(AttributeId::Export));
//! ```

/// Stable identifier for engine attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeId {
    Signal,
    Export,
    ExportGroup,
    ExportSubgroup,
    ExportCategory,
    Tool,
    GlobalClass,
}

/// What an attribute does to the declaration it decorates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeRole {
    /// Turns a delegate into an engine signal.
    Signal,
    /// Registers a field or property with the editor.
    Export,
    /// Editor/tooling hint with no effect on the translated shape.
    Ignored,
}

/// Metadata for an engine attribute.
#[derive(Debug, Clone, Copy)]
pub struct AttributeInfo {
    pub id: AttributeId,
    pub canonical: &'static str,
    pub role: AttributeRole,
    pub description: &'static str,
}

/// Registry of engine attributes.
pub const ATTRIBUTES: &[AttributeInfo] = &[
    info(AttributeId::Signal, "Signal", AttributeRole::Signal, "Declares an engine signal."),
    info(AttributeId::Export, "Export", AttributeRole::Export, "Exposes a member to the editor."),
    info(AttributeId::ExportGroup, "ExportGroup", AttributeRole::Ignored, "Editor grouping."),
    info(AttributeId::ExportSubgroup, "ExportSubgroup", AttributeRole::Ignored, "Editor subgrouping."),
    info(AttributeId::ExportCategory, "ExportCategory", AttributeRole::Ignored, "Editor category."),
    info(AttributeId::Tool, "Tool", AttributeRole::Ignored, "Runs the script in the editor."),
    info(AttributeId::GlobalClass, "GlobalClass", AttributeRole::Ignored, "Registers a global class name."),
];

/// Resolve an attribute name to an [`AttributeId`].
///
/// ## Notes
/// - Accepts the short form (`Export`), the `Attribute`-suffixed form (`ExportAttribute`) and the `Godot.`
///   qualified form (`Godot.Export`).
pub fn from_str(name: &str) -> Option<AttributeId> {
    let name = name.strip_prefix("global::").unwrap_or(name);
    let name = name.strip_prefix("Godot.").unwrap_or(name);
    let name = name.strip_suffix("Attribute").unwrap_or(name);
    ATTRIBUTES.iter().find(|a| a.canonical == name).map(|a| a.id)
}

/// Return the full metadata entry for an attribute.
///
/// ## Panics
/// - If the registry is missing an entry for `id` (this indicates a programming error).
pub fn info_for(id: AttributeId) -> &'static AttributeInfo {
    ATTRIBUTES
        .iter()
        .find(|a| a.id == id)
        .expect("attribute info missing")
}

/// Return the role of an attribute.
pub fn role(id: AttributeId) -> AttributeRole {
    info_for(id).role
}

const fn info(id: AttributeId, canonical: &'static str, role: AttributeRole, description: &'static str) -> AttributeInfo {
    AttributeInfo {
        id,
        canonical,
        role,
        description,
    }
}
