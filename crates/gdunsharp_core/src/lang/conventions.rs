//! Shared translator conventions (well-known identifiers and file names).

/// Suffix Godot's C# bindings require on `[Signal]` delegate names; the engine-side signal name drops it.
pub const SIGNAL_DELEGATE_SUFFIX: &str = "EventHandler";

/// Name of the per-namespace forward-declaration header.
pub const FORWARD_HEADER_STEM: &str = "_forward";

/// Name of the static registration hook godot-cpp calls on every `GDCLASS`.
pub const BIND_METHODS_NAME: &str = "_bind_methods";

/// Prefix for synthesized property getters.
pub const GETTER_PREFIX: &str = "get_";

/// Prefix for synthesized property setters.
pub const SETTER_PREFIX: &str = "set_";

/// Prefix for backing fields of auto-properties.
pub const BACKING_FIELD_PREFIX: &str = "m_";

/// Parameter name used by synthesized setters.
pub const SETTER_PARAM: &str = "value";

/// Root C++ namespace of the engine bindings.
pub const ENGINE_CPP_NAMESPACE: &str = "godot";

/// Underlying integer type for emitted `enum class` declarations (matches Godot's `int64_t` enum storage).
pub const ENUM_UNDERLYING_TYPE: &str = "int64_t";
