//! Rendering of emission units into C++ text.
//!
//! Each unit yields a header and, when anything needs an out-of-class definition, a definition artifact: a `.cpp`
//! for ordinary units, or a `.inl` included at the end of the header for units containing templates. A header only
//! includes its `.inl` when one is produced.
//!
//! Rendering is a pure function of the unit, so running it twice yields byte-identical text.

pub mod forward;
mod header;
mod source;

use crate::backend::emission::{EmissionUnit, EmitContext, ParamUnit, TypeUnit};
use crate::backend::cpp_emitter::CppEmitter;
use crate::frontend::classify::{MemberShape, Storage, Virtuality};
use crate::frontend::model::CppType;

/// Text of one unit's artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedUnit {
    pub header: String,
    pub definitions: Option<String>,
}

pub fn render_unit(ctx: &EmitContext<'_>, unit: &EmissionUnit) -> RenderedUnit {
    let definitions = source::render(ctx, unit);
    RenderedUnit {
        header: header::render(ctx, unit, definitions.is_some()),
        definitions,
    }
}

/// Opening comment naming the files an artifact was generated from.
pub(crate) fn banner(e: &mut CppEmitter, ctx: &EmitContext<'_>, sources: &[String]) {
    if !ctx.config.output.banner {
        return;
    }
    if sources.is_empty() {
        e.line("// Generated by gdunsharp. Do not edit.");
    } else {
        e.linef(format_args!("// Generated by gdunsharp from {}. Do not edit.", sources.join(", ")));
    }
}

/// `template <typename T, typename U>`
pub(crate) fn template_line(params: &[String]) -> String {
    let params: Vec<String> = params.iter().map(|p| format!("typename {p}")).collect();
    format!("template <{}>", params.join(", "))
}

pub(crate) fn param_list(params: &[ParamUnit], with_defaults: bool) -> String {
    params
        .iter()
        .map(|p| match (&p.default, with_defaults) {
            (Some(default), true) => format!("{} = {default}", p.declare()),
            _ => p.declare(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Declarator for an immutable value: `T *const name` for pointers, `const T name` otherwise.
pub(crate) fn declare_const(ty: &CppType, name: &str) -> String {
    if ty.as_str().ends_with('*') {
        format!("{ty}const {name}")
    } else {
        format!("const {}", ty.declare(name))
    }
}

/// Leading and trailing specifiers of a member function declaration.
pub(crate) fn specifiers(shape: &MemberShape) -> (&'static str, &'static str) {
    if shape.storage == Storage::Static {
        return ("static ", "");
    }
    match shape.virtuality {
        Virtuality::None => ("", ""),
        Virtuality::Virtual => ("virtual ", ""),
        Virtuality::Pure => ("virtual ", " = 0"),
        Virtuality::Override => ("", " override"),
        Virtuality::FinalOverride => ("", " override final"),
    }
}

/// Source body as comment text: outer braces dropped and the common indentation removed.
pub(crate) fn body_text(body: &str) -> String {
    let trimmed = body.trim();
    // A constructor initializer (`: base(x)`) precedes the block on its own line.
    if let Some((initializer, block)) = trimmed.strip_prefix(':').and_then(|rest| rest.split_once('\n')) {
        let inner = body_text(block);
        let initializer = format!(":{}", initializer.trim_end());
        return if inner.is_empty() {
            initializer
        } else {
            format!("{initializer}\n{inner}")
        };
    }
    let inner = match trimmed.strip_prefix('{').and_then(|b| b.strip_suffix('}')) {
        Some(inner) => inner,
        None => trimmed,
    };
    let lines: Vec<&str> = inner.lines().map(str::trim_end).collect();
    let first = lines.iter().position(|l| !l.trim().is_empty());
    let last = lines.iter().rposition(|l| !l.trim().is_empty());
    let (Some(first), Some(last)) = (first, last) else {
        return String::new();
    };
    let lines = &lines[first..=last];
    let indent = lines
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.len() - l.trim_start().len())
        .min()
        .unwrap_or(0);
    lines
        .iter()
        .map(|l| if l.trim().is_empty() { "" } else { &l[indent..] })
        .collect::<Vec<_>>()
        .join("\n")
}

/// `Outer<T>::Inner::` prefix for out-of-class definitions.
pub(crate) fn qualifier(ty: &TypeUnit) -> String {
    format!("{}::", ty.qualified)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_text_strips_braces_and_indent() {
        let body = "{\n        var x = 1;\n        if (x > 0)\n            Run();\n    }";
        assert_eq!(body_text(body), "var x = 1;\nif (x > 0)\n    Run();");
        assert_eq!(body_text("{ return _speed; }"), "return _speed;");
        assert_eq!(body_text("=> _speed * 2;"), "=> _speed * 2;");
        assert_eq!(body_text("{ }"), "");
        assert_eq!(body_text(": base(name)\n{\n        _hp = 10;\n    }"), ": base(name)\n_hp = 10;");
    }

    #[test]
    fn const_pointers_bind_to_the_pointer() {
        assert_eq!(declare_const(&CppType::new("Game::Foo *"), "foo"), "Game::Foo *const foo");
        assert_eq!(declare_const(&CppType::new("int32_t"), "x"), "const int32_t x");
    }

    #[test]
    fn template_lines() {
        assert_eq!(template_line(&["T".into(), "U".into()]), "template <typename T, typename U>");
    }
}
