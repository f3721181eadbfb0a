//! Primitive builtin type vocabulary.
//!
//! This registry covers the C# keyword types and their `System.*` aliases, together with the default C++
//! spelling the type mapper starts from.
//!
//! ## Notes
//! - Lookup via [`from_str`] is **case-sensitive** (`int` and `Int32` are both valid, `Int` is not).
//! - A `default_target` of `None` means "recognized but unmappable": the name resolves, and the type mapper then
//!   reports it as unsupported unless configuration supplies a mapping.
//!
//! ## Examples
//! ```rust
//! use gdunsharp_core::lang::types::primitives::{self, PrimitiveTypeId};
//!
//! assert_eq!(primitives::from_str("int"), Some(PrimitiveTypeId::Int));
//! assert_eq!(primitives::from_str("System.Int32"), Some(PrimitiveTypeId::Int));
//! assert_eq!(primitives::info_for(PrimitiveTypeId::Long).default_target, Some("int64_t"));
//! assert_eq!(primitives::info_for(PrimitiveTypeId::Decimal).default_target, None);
//! ```

/// Stable identifier for primitive builtin types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PrimitiveTypeId {
    Bool,
    Byte,
    SByte,
    Short,
    UShort,
    Int,
    UInt,
    Long,
    ULong,
    Float,
    Double,
    Char,
    String,
    Object,
    Void,
    Decimal,
    Dynamic,
    NInt,
    NUInt,
}

/// Metadata for a primitive builtin type.
#[derive(Debug, Clone, Copy)]
pub struct PrimitiveTypeInfo {
    pub id: PrimitiveTypeId,
    pub canonical: &'static str,
    pub aliases: &'static [&'static str],
    pub default_target: Option<&'static str>,
    pub header: Option<&'static str>,
    pub variant_type: Option<&'static str>,
}

const CSTDINT: Option<&str> = Some("cstdint");

/// Registry of primitive builtin types.
pub const PRIMITIVE_TYPES: &[PrimitiveTypeInfo] = &[
    info(PrimitiveTypeId::Bool, "bool", &["Boolean"], Some("bool"), None, Some("BOOL")),
    info(PrimitiveTypeId::Byte, "byte", &["Byte"], Some("uint8_t"), CSTDINT, Some("INT")),
    info(PrimitiveTypeId::SByte, "sbyte", &["SByte"], Some("int8_t"), CSTDINT, Some("INT")),
    info(PrimitiveTypeId::Short, "short", &["Int16"], Some("int16_t"), CSTDINT, Some("INT")),
    info(PrimitiveTypeId::UShort, "ushort", &["UInt16"], Some("uint16_t"), CSTDINT, Some("INT")),
    info(PrimitiveTypeId::Int, "int", &["Int32"], Some("int32_t"), CSTDINT, Some("INT")),
    info(PrimitiveTypeId::UInt, "uint", &["UInt32"], Some("uint32_t"), CSTDINT, Some("INT")),
    info(PrimitiveTypeId::Long, "long", &["Int64"], Some("int64_t"), CSTDINT, Some("INT")),
    info(PrimitiveTypeId::ULong, "ulong", &["UInt64"], Some("uint64_t"), CSTDINT, Some("INT")),
    info(PrimitiveTypeId::Float, "float", &["Single"], Some("float"), None, Some("FLOAT")),
    info(PrimitiveTypeId::Double, "double", &["Double"], Some("double"), None, Some("FLOAT")),
    info(PrimitiveTypeId::Char, "char", &["Char"], Some("char32_t"), None, Some("INT")),
    info(
        PrimitiveTypeId::String,
        "string",
        &["String"],
        Some("godot::String"),
        Some("godot_cpp/variant/string.hpp"),
        Some("STRING"),
    ),
    info(
        PrimitiveTypeId::Object,
        "object",
        &["Object"],
        Some("godot::Variant"),
        Some("godot_cpp/variant/variant.hpp"),
        Some("NIL"),
    ),
    info(PrimitiveTypeId::Void, "void", &["Void"], Some("void"), None, None),
    info(PrimitiveTypeId::Decimal, "decimal", &["Decimal"], None, None, None),
    info(PrimitiveTypeId::Dynamic, "dynamic", &[], None, None, None),
    info(PrimitiveTypeId::NInt, "nint", &["IntPtr"], None, None, None),
    info(PrimitiveTypeId::NUInt, "nuint", &["UIntPtr"], None, None, None),
];

/// Resolve a type name to a [`PrimitiveTypeId`].
///
/// ## Notes
/// - Aliases may be written with their `System.` qualifier.
pub fn from_str(name: &str) -> Option<PrimitiveTypeId> {
    if let Some(t) = PRIMITIVE_TYPES.iter().find(|t| t.canonical == name) {
        return Some(t.id);
    }
    let name = name.strip_prefix("System.").unwrap_or(name);
    PRIMITIVE_TYPES
        .iter()
        .find(|t| t.aliases.contains(&name))
        .map(|t| t.id)
}

/// Return the canonical C# spelling for a primitive type.
pub fn as_str(id: PrimitiveTypeId) -> &'static str {
    info_for(id).canonical
}

/// Return the full metadata entry for a primitive type.
///
/// ## Panics
/// - If the registry is missing an entry for `id` (this indicates a programming error).
pub fn info_for(id: PrimitiveTypeId) -> &'static PrimitiveTypeInfo {
    PRIMITIVE_TYPES
        .iter()
        .find(|t| t.id == id)
        .expect("primitive type info missing")
}

const fn info(
    id: PrimitiveTypeId,
    canonical: &'static str,
    aliases: &'static [&'static str],
    default_target: Option<&'static str>,
    header: Option<&'static str>,
    variant_type: Option<&'static str>,
) -> PrimitiveTypeInfo {
    PrimitiveTypeInfo {
        id,
        canonical,
        aliases,
        default_target,
        header,
        variant_type,
    }
}
