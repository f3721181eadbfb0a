//! Generic & Nested-Type Resolver.
//!
//! Builds the [`GenericScope`] of every class, interface and method, answers "is this name a generic parameter
//! here?", and completes references to nested types of generic types with the outer type arguments the source left
//! implicit.
//!
//! ## Notes
//! - A scope lists outer type parameters first, then the declaration's own, in declaration order.
//! - A parameter that reuses an outer parameter's name shadows it. The shadowing parameter gets a distinct emitted
//!   name (`T_`) because a C++ template parameter cannot be redeclared inside the template it belongs to.
//! - Inside `Outer<T>`, a bare `Inner` means `Outer<T>.Inner`. Outside it there is no `T` to thread, so the reference
//!   must spell the outer arguments (`Outer<int>.Inner`).

use gdunsharp_core::lang::modifiers::ModifierId;

use crate::diagnostics::Diagnostic;
use crate::frontend::model::{
    DeclId, DeclKind, GenericOwner, GenericParam, GenericScope, LexicalScope, ProjectModel, SourceType,
};

/// Compute and store the generic scope of every type and method.
///
/// Types are visited in arena order, which the merger guarantees puts every type before its nested types and
/// members.
#[tracing::instrument(skip_all, fields(declarations = model.len()))]
pub fn build_scopes(model: &mut ProjectModel) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    for id in 0..model.len() {
        let decl = model.decl(id);
        let owner = match &decl.kind {
            DeclKind::Class(_) | DeclKind::Interface(_) => GenericOwner::Type {
                depth: model.type_chain(id).len() - 1,
            },
            DeclKind::Method(_) | DeclKind::Constructor(_) => GenericOwner::Method,
            _ => continue,
        };
        let mut scope = outer_scope(model, decl.parent);
        let own = decl.generics().to_vec();
        for (i, name) in own.iter().enumerate() {
            if own[..i].contains(name) {
                diagnostics.push(Diagnostic::generic_scope(
                    format!("generic parameter `{name}` is declared twice on `{}`", decl.path),
                    decl.location.clone(),
                ));
                continue;
            }
            scope.push(name, owner);
        }
        if owner == GenericOwner::Method && !own.is_empty() {
            if let Some(message) = virtual_template(model, id) {
                diagnostics.push(Diagnostic::generic_scope(message, decl.location.clone()));
            }
        }
        match &mut model.decl_mut(id).kind {
            DeclKind::Class(t) | DeclKind::Interface(t) => t.generic_scope = scope,
            DeclKind::Method(m) | DeclKind::Constructor(m) => m.generic_scope = scope,
            _ => {}
        }
    }
    diagnostics
}

/// Scope inherited from the enclosing type, if any.
fn outer_scope(model: &ProjectModel, parent: Option<DeclId>) -> GenericScope {
    parent
        .and_then(|p| model.decl(p).generic_scope().cloned())
        .unwrap_or_default()
}

/// Generic methods become member templates, which cannot be virtual.
fn virtual_template(model: &ProjectModel, method: DeclId) -> Option<String> {
    let decl = model.decl(method);
    let in_interface = decl
        .parent
        .is_some_and(|p| matches!(model.decl(p).kind, DeclKind::Interface(_)));
    let modifiers = decl.modifiers()?;
    let is_virtual = in_interface
        || modifiers.has(ModifierId::Virtual)
        || modifiers.has(ModifierId::Override)
        || modifiers.has(ModifierId::Abstract);
    is_virtual.then(|| {
        format!(
            "generic method `{}` cannot be virtual: its type parameters make it a member template",
            decl.name
        )
    })
}

/// The generic scope in force at a reference site: the member's own scope when it has one, else the enclosing
/// type's.
pub fn scope_at<'m>(model: &'m ProjectModel, scope: &LexicalScope) -> Option<&'m GenericScope> {
    let member = scope
        .member
        .as_ref()
        .and_then(|path| model.lookup(path))
        .and_then(|id| model.decl(id).generic_scope());
    member.or_else(|| {
        scope
            .enclosing_type
            .as_ref()
            .and_then(|path| model.lookup(path))
            .and_then(|id| model.decl(id).generic_scope())
    })
}

/// Generic parameter `name` visible at a reference site.
pub fn lookup_param<'m>(model: &'m ProjectModel, scope: &LexicalScope, name: &str) -> Option<&'m GenericParam> {
    scope_at(model, scope)?.lookup(name)
}

/// A type's own parameters as source types, for threading into nested references made inside it.
pub fn own_params_as_args(model: &ProjectModel, id: DeclId) -> Vec<SourceType> {
    let decl = model.decl(id);
    let Some(scope) = decl.generic_scope() else {
        return Vec::new();
    };
    let depth = model.type_chain(id).len() - 1;
    scope
        .own(GenericOwner::Type { depth })
        .map(|p| SourceType::GenericParam {
            name: p.name.clone(),
            emitted: p.emitted.clone(),
        })
        .collect()
}

/// Type arguments for an outer type the reference did not spell out.
///
/// ## Errors
///
/// A generic-scope message when the outer type is generic and the reference site is outside it.
pub fn implicit_outer_args(
    model: &ProjectModel,
    outer: DeclId,
    site: &LexicalScope,
    written: &str,
) -> Result<Vec<SourceType>, String> {
    let decl = model.decl(outer);
    if decl.generics().is_empty() {
        return Ok(Vec::new());
    }
    let inside = site
        .enclosing_type
        .as_ref()
        .and_then(|path| model.lookup(path))
        .is_some_and(|enclosing| model.type_chain(enclosing).contains(&outer));
    if inside {
        Ok(own_params_as_args(model, outer))
    } else {
        Err(format!(
            "`{written}` is nested in generic type `{}`; spell the outer type arguments (`{}<...>.{}`)",
            decl.path,
            decl.name,
            written.rsplit('.').next().unwrap_or(written)
        ))
    }
}

/// Check the number of type arguments supplied for a declared type.
pub fn check_arity(model: &ProjectModel, id: DeclId, supplied: usize) -> Result<(), String> {
    let decl = model.decl(id);
    let expected = decl.generics().len();
    if expected == supplied {
        return Ok(());
    }
    Err(format!(
        "`{}` expects {expected} type argument{}, found {supplied}",
        decl.path,
        if expected == 1 { "" } else { "s" }
    ))
}
