//! Per-namespace forward-declaration headers.
//!
//! Every namespace holding top-level types gets one. A unit that only holds another namespace's types through
//! pointers includes that namespace's forward header instead of each defining header.

use gdunsharp_core::lang::conventions::ENUM_UNDERLYING_TYPE;
use gdunsharp_core::lang::cpp_keywords;

use super::{banner, template_line};
use crate::backend::cpp_emitter::CppEmitter;
use crate::backend::emission::EmitContext;
use crate::frontend::model::{DeclKind, GenericOwner, NamespaceNode};

/// Forward header text for a namespace, or `None` when it declares no types.
pub fn render(ctx: &EmitContext<'_>, namespace: &NamespaceNode) -> Option<String> {
    if namespace.types.is_empty() {
        return None;
    }
    let model = ctx.model;
    let mut declarations = Vec::with_capacity(namespace.types.len());
    let mut has_enum = false;
    for &id in namespace.types.values() {
        let decl = model.decl(id);
        let name = cpp_keywords::escape(&decl.name);
        match &decl.kind {
            DeclKind::Enum(e) => {
                has_enum = true;
                let underlying = e
                    .underlying
                    .as_ref()
                    .and_then(|u| u.target())
                    .map_or(ENUM_UNDERLYING_TYPE, |t| t.as_str());
                declarations.push(format!("enum class {name} : {underlying};"));
            }
            _ => {
                let params: Vec<String> = decl
                    .generic_scope()
                    .map(|s| s.own(GenericOwner::Type { depth: 0 }).map(|p| p.emitted.clone()).collect())
                    .unwrap_or_default();
                if params.is_empty() {
                    declarations.push(format!("class {name};"));
                } else {
                    declarations.push(format!("{}\nclass {name};", template_line(&params)));
                }
            }
        }
    }

    let mut e = CppEmitter::new();
    banner(&mut e, ctx, &[]);
    e.line("#pragma once");
    if has_enum {
        e.blank_line();
        e.line("#include <cstdint>");
    }
    e.blank_line();
    let segments: Vec<String> = namespace.path.segments().iter().map(|s| cpp_keywords::escape(s)).collect();
    e.open_namespaces(&segments);
    for declaration in &declarations {
        for line in declaration.lines() {
            e.line(line);
        }
    }
    e.close_namespaces(&segments);
    Some(e.finish())
}
