//! Engine builtin type vocabulary.
//!
//! This registry covers the engine-provided core types a Godot C# script can name: the `Variant`-compatible value
//! types and the engine object classes. Each entry carries its godot-cpp spelling and header.
//!
//! ## Notes
//! - Lookup via [`from_str`] is **case-sensitive** and accepts an optional `Godot.` qualifier.
//! - The list of engine classes is deliberately the common scripting surface, not the full class database.
//!
//! ## Examples
//! ```rust
//! use gdunsharp_core::lang::types::engine::{self, EngineTypeKind};
//!
//! let node = engine::from_str("Node2D").unwrap();
//! assert_eq!(node.cpp_name, "godot::Node2D");
//! assert_eq!(node.kind, EngineTypeKind::Object);
//! assert_eq!(engine::from_str("Godot.Vector2").unwrap().header, "godot_cpp/variant/vector2.hpp");
//! ```

/// How values of an engine type are held in emitted C++.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EngineTypeKind {
    /// `Variant`-compatible value type, held by value.
    Value,
    /// Manually managed object, held through a raw pointer.
    Object,
    /// Reference-counted object, held through `godot::Ref<T>`.
    RefCounted,
}

/// Metadata for an engine builtin type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EngineTypeInfo {
    /// Name as written in C# (without the `Godot.` qualifier).
    pub name: &'static str,
    pub cpp_name: &'static str,
    pub header: &'static str,
    pub kind: EngineTypeKind,
    /// `godot::Variant::Type` tag used when the type crosses the engine boundary.
    pub variant_type: &'static str,
}

// Entries are built by macro so the `godot::` spelling and header path stay `const` literals.
macro_rules! value {
    ($name:literal, $cpp:literal, $file:literal, $variant:literal) => {
        EngineTypeInfo {
            name: $name,
            cpp_name: concat!("godot::", $cpp),
            header: concat!("godot_cpp/variant/", $file, ".hpp"),
            kind: EngineTypeKind::Value,
            variant_type: $variant,
        }
    };
}

macro_rules! object {
    ($kind:ident, $name:literal, $cpp:literal, $file:literal) => {
        EngineTypeInfo {
            name: $name,
            cpp_name: concat!("godot::", $cpp),
            header: concat!("godot_cpp/classes/", $file, ".hpp"),
            kind: EngineTypeKind::$kind,
            variant_type: "OBJECT",
        }
    };
}

/// Registry of engine builtin types.
pub const ENGINE_TYPES: &[EngineTypeInfo] = &[
    value!("Vector2", "Vector2", "vector2", "VECTOR2"),
    value!("Vector2I", "Vector2i", "vector2i", "VECTOR2I"),
    value!("Vector3", "Vector3", "vector3", "VECTOR3"),
    value!("Vector3I", "Vector3i", "vector3i", "VECTOR3I"),
    value!("Vector4", "Vector4", "vector4", "VECTOR4"),
    value!("Vector4I", "Vector4i", "vector4i", "VECTOR4I"),
    value!("Rect2", "Rect2", "rect2", "RECT2"),
    value!("Rect2I", "Rect2i", "rect2i", "RECT2I"),
    value!("Transform2D", "Transform2D", "transform2d", "TRANSFORM2D"),
    value!("Transform3D", "Transform3D", "transform3d", "TRANSFORM3D"),
    value!("Basis", "Basis", "basis", "BASIS"),
    value!("Quaternion", "Quaternion", "quaternion", "QUATERNION"),
    value!("Plane", "Plane", "plane", "PLANE"),
    value!("Aabb", "AABB", "aabb", "AABB"),
    value!("Color", "Color", "color", "COLOR"),
    value!("NodePath", "NodePath", "node_path", "NODE_PATH"),
    value!("StringName", "StringName", "string_name", "STRING_NAME"),
    value!("Rid", "RID", "rid", "RID"),
    value!("Callable", "Callable", "callable", "CALLABLE"),
    value!("Signal", "Signal", "signal", "SIGNAL"),
    value!("Variant", "Variant", "variant", "NIL"),
    value!("Array", "Array", "array", "ARRAY"),
    value!("Dictionary", "Dictionary", "dictionary", "DICTIONARY"),
    object!(Object, "GodotObject", "Object", "object"),
    object!(Object, "Node", "Node", "node"),
    object!(Object, "Node2D", "Node2D", "node2d"),
    object!(Object, "Node3D", "Node3D", "node3d"),
    object!(Object, "CanvasItem", "CanvasItem", "canvas_item"),
    object!(Object, "Control", "Control", "control"),
    object!(Object, "Label", "Label", "label"),
    object!(Object, "Button", "Button", "button"),
    object!(Object, "Sprite2D", "Sprite2D", "sprite2d"),
    object!(Object, "Sprite3D", "Sprite3D", "sprite3d"),
    object!(Object, "AnimatedSprite2D", "AnimatedSprite2D", "animated_sprite2d"),
    object!(Object, "AnimationPlayer", "AnimationPlayer", "animation_player"),
    object!(Object, "Camera2D", "Camera2D", "camera2d"),
    object!(Object, "Camera3D", "Camera3D", "camera3d"),
    object!(Object, "CharacterBody2D", "CharacterBody2D", "character_body2d"),
    object!(Object, "CharacterBody3D", "CharacterBody3D", "character_body3d"),
    object!(Object, "RigidBody2D", "RigidBody2D", "rigid_body2d"),
    object!(Object, "RigidBody3D", "RigidBody3D", "rigid_body3d"),
    object!(Object, "StaticBody2D", "StaticBody2D", "static_body2d"),
    object!(Object, "StaticBody3D", "StaticBody3D", "static_body3d"),
    object!(Object, "Area2D", "Area2D", "area2d"),
    object!(Object, "Area3D", "Area3D", "area3d"),
    object!(Object, "CollisionShape2D", "CollisionShape2D", "collision_shape2d"),
    object!(Object, "CollisionShape3D", "CollisionShape3D", "collision_shape3d"),
    object!(Object, "MeshInstance3D", "MeshInstance3D", "mesh_instance3d"),
    object!(Object, "Marker2D", "Marker2D", "marker2d"),
    object!(Object, "Marker3D", "Marker3D", "marker3d"),
    object!(Object, "Timer", "Timer", "timer"),
    object!(Object, "AudioStreamPlayer", "AudioStreamPlayer", "audio_stream_player"),
    object!(Object, "AudioStreamPlayer2D", "AudioStreamPlayer2D", "audio_stream_player2d"),
    object!(Object, "SceneTree", "SceneTree", "scene_tree"),
    object!(Object, "Input", "Input", "input"),
    object!(RefCounted, "RefCounted", "RefCounted", "ref_counted"),
    object!(RefCounted, "Resource", "Resource", "resource"),
    object!(RefCounted, "PackedScene", "PackedScene", "packed_scene"),
    object!(RefCounted, "Texture2D", "Texture2D", "texture2d"),
    object!(RefCounted, "InputEvent", "InputEvent", "input_event"),
    object!(RefCounted, "Tween", "Tween", "tween"),
];

/// Resolve a C# engine type name (optionally `Godot.`-qualified) to its registry entry.
pub fn from_str(name: &str) -> Option<&'static EngineTypeInfo> {
    let name = name.strip_prefix("Godot.").unwrap_or(name);
    ENGINE_TYPES.iter().find(|t| t.name == name)
}

/// Check whether an engine type is an object class (pointer or `Ref<>` held).
pub fn is_object_class(info: &EngineTypeInfo) -> bool {
    matches!(info.kind, EngineTypeKind::Object | EngineTypeKind::RefCounted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_unique() {
        for t in ENGINE_TYPES {
            assert_eq!(ENGINE_TYPES.iter().filter(|o| o.name == t.name).count(), 1, "{}", t.name);
        }
    }

    #[test]
    fn object_classes_live_under_classes_headers() {
        for t in ENGINE_TYPES.iter().filter(|t| is_object_class(t)) {
            assert!(t.header.starts_with("godot_cpp/classes/"), "{}", t.name);
            assert_eq!(t.variant_type, "OBJECT");
        }
    }

    #[test]
    fn ref_counted_kind_is_kept() {
        assert_eq!(from_str("Resource").map(|t| t.kind), Some(EngineTypeKind::RefCounted));
        assert_eq!(from_str("Aabb").map(|t| t.cpp_name), Some("godot::AABB"));
    }
}
