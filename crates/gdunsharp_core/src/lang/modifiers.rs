//! C# modifier vocabulary.
//!
//! Every modifier the outline builder can meet is listed here together with the role it plays in translation.
//! Access modifiers are recognized only so they can be dropped; unsupported modifiers are rejected with a
//! structural diagnostic instead of being silently ignored.
//!
//! ## Notes
//! - Lookup via [`from_str`] is **case-sensitive** (C# keywords are lowercase).
//!
//! ## Examples
//! ```rust
//! use gdunsharp_core::lang::modifiers::{self, ModifierCategory, ModifierId};
//!
//! assert_eq!(modifiers::from_str("public"), Some(ModifierId::Public));
//! assert_eq!(modifiers::info_for(ModifierId::Async).category, ModifierCategory::Unsupported);
//! ```

/// Stable identifier for C# modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ModifierId {
    Public,
    Private,
    Protected,
    Internal,
    File,
    Static,
    Const,
    Readonly,
    Virtual,
    Override,
    Abstract,
    Sealed,
    New,
    Partial,
    Async,
    Unsafe,
    Extern,
    Volatile,
    Required,
    Ref,
    Out,
    In,
    This,
    Params,
}

/// How the translator treats a modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModifierCategory {
    /// Visibility; dropped entirely (every emitted member is public).
    Access,
    /// Instance/static and mutable/immutable classification.
    Storage,
    /// Virtual dispatch and inheritance shape.
    Inheritance,
    /// Declaration bookkeeping (e.g. `partial`).
    Declaration,
    /// Parameter passing (`ref`, `out`, `in`, `this`, `params`).
    Parameter,
    /// Outside the translatable dialect.
    Unsupported,
}

/// Metadata for a modifier.
#[derive(Debug, Clone, Copy)]
pub struct ModifierInfo {
    pub id: ModifierId,
    pub spelling: &'static str,
    pub category: ModifierCategory,
    pub description: &'static str,
}

/// Registry of modifiers.
pub const MODIFIERS: &[ModifierInfo] = &[
    info(ModifierId::Public, "public", ModifierCategory::Access, "Public visibility."),
    info(ModifierId::Private, "private", ModifierCategory::Access, "Private visibility."),
    info(ModifierId::Protected, "protected", ModifierCategory::Access, "Protected visibility."),
    info(ModifierId::Internal, "internal", ModifierCategory::Access, "Assembly visibility."),
    info(ModifierId::File, "file", ModifierCategory::Access, "File-local visibility."),
    info(ModifierId::Static, "static", ModifierCategory::Storage, "Type-level storage."),
    info(ModifierId::Const, "const", ModifierCategory::Storage, "Compile-time constant (implies static)."),
    info(ModifierId::Readonly, "readonly", ModifierCategory::Storage, "Assign-once field."),
    info(ModifierId::Virtual, "virtual", ModifierCategory::Inheritance, "Overridable member."),
    info(ModifierId::Override, "override", ModifierCategory::Inheritance, "Overrides a base member."),
    info(ModifierId::Abstract, "abstract", ModifierCategory::Inheritance, "Member without implementation."),
    info(ModifierId::Sealed, "sealed", ModifierCategory::Inheritance, "Closes a type or override."),
    info(ModifierId::New, "new", ModifierCategory::Inheritance, "Hides an inherited member."),
    info(ModifierId::Partial, "partial", ModifierCategory::Declaration, "Type split across declarations."),
    info(ModifierId::Async, "async", ModifierCategory::Unsupported, "Asynchronous control flow."),
    info(ModifierId::Unsafe, "unsafe", ModifierCategory::Unsupported, "Pointer code."),
    info(ModifierId::Extern, "extern", ModifierCategory::Unsupported, "Externally implemented member."),
    info(ModifierId::Volatile, "volatile", ModifierCategory::Unsupported, "Volatile field access."),
    info(ModifierId::Required, "required", ModifierCategory::Unsupported, "Required initialization member."),
    info(ModifierId::Ref, "ref", ModifierCategory::Parameter, "By-reference parameter."),
    info(ModifierId::Out, "out", ModifierCategory::Parameter, "By-reference output parameter."),
    info(ModifierId::In, "in", ModifierCategory::Parameter, "By-reference readonly parameter."),
    info(ModifierId::This, "this", ModifierCategory::Parameter, "Extension method receiver."),
    info(ModifierId::Params, "params", ModifierCategory::Parameter, "Variadic array parameter."),
];

/// Resolve a spelling to a [`ModifierId`].
pub fn from_str(spelling: &str) -> Option<ModifierId> {
    MODIFIERS.iter().find(|m| m.spelling == spelling).map(|m| m.id)
}

/// Return the spelling for a modifier.
pub fn as_str(id: ModifierId) -> &'static str {
    info_for(id).spelling
}

/// Return the full metadata entry for a modifier.
///
/// ## Panics
/// - If the registry is missing an entry for `id` (this indicates a programming error).
pub fn info_for(id: ModifierId) -> &'static ModifierInfo {
    MODIFIERS
        .iter()
        .find(|m| m.id == id)
        .expect("modifier info missing")
}

const fn info(
    id: ModifierId,
    spelling: &'static str,
    category: ModifierCategory,
    description: &'static str,
) -> ModifierInfo {
    ModifierInfo {
        id,
        spelling,
        category,
        description,
    }
}
