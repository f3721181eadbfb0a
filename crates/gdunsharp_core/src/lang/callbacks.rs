//! Engine virtual callback vocabulary.
//!
//! Godot's C# bindings spell engine virtuals in PascalCase (`_Ready`); godot-cpp keeps the engine's snake_case
//! (`_ready`). Overrides of these names must be emitted with the engine spelling or they would not override.

/// A C#/engine spelling pair for a virtual callback.
#[derive(Debug, Clone, Copy)]
pub struct CallbackInfo {
    pub csharp: &'static str,
    pub engine: &'static str,
}

/// Registry of engine virtual callbacks.
pub const CALLBACKS: &[CallbackInfo] = &[
    CallbackInfo { csharp: "_Ready", engine: "_ready" },
    CallbackInfo { csharp: "_Process", engine: "_process" },
    CallbackInfo { csharp: "_PhysicsProcess", engine: "_physics_process" },
    CallbackInfo { csharp: "_Input", engine: "_input" },
    CallbackInfo { csharp: "_UnhandledInput", engine: "_unhandled_input" },
    CallbackInfo { csharp: "_UnhandledKeyInput", engine: "_unhandled_key_input" },
    CallbackInfo { csharp: "_GuiInput", engine: "_gui_input" },
    CallbackInfo { csharp: "_EnterTree", engine: "_enter_tree" },
    CallbackInfo { csharp: "_ExitTree", engine: "_exit_tree" },
    CallbackInfo { csharp: "_Draw", engine: "_draw" },
    CallbackInfo { csharp: "_Notification", engine: "_notification" },
];

/// Return the engine spelling for a C# callback name, if it is one.
///
/// ## Examples
/// ```rust
/// use gdunsharp_core::lang::callbacks::engine_name;
///
/// assert_eq!(engine_name("_PhysicsProcess"), Some("_physics_process"));
/// assert_eq!(engine_name("Jump"), None);
/// ```
pub fn engine_name(csharp: &str) -> Option<&'static str> {
    CALLBACKS.iter().find(|c| c.csharp == csharp).map(|c| c.engine)
}
