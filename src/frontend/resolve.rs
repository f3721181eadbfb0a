//! Project-wide type resolution.
//!
//! Every [`TypeReference`] in the model is resolved exactly once. Lookups run in parallel over a read-only view of
//! the model and produce `(declaration, slot, result)` triples; the results are then written back by a single
//! writer. Base types go first because mapping other references needs to know which classes derive from engine
//! classes.
//!
//! All problems found anywhere in the project are reported together.

use gdunsharp_core::lang::attributes::AttributeId;
use gdunsharp_core::lang::types::{PrimitiveTypeId, engine};
use rayon::prelude::*;

use crate::config::TypeMapConfig;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::frontend::classify::{self, Passing};
use crate::frontend::generics;
use crate::frontend::model::{
    CppType, DeclId, DeclKind, Declaration, GenericOwner, ProjectModel, ResolvedType, SourceType, TypeReference,
    UnresolvedType,
};
use crate::frontend::symbols::SymbolTable;
use crate::frontend::type_map::{self, TypeMapper};

/// A type-reference position inside a declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefSlot {
    Base(usize),
    EnumUnderlying,
    Field,
    Property,
    Return,
    Param(usize),
    SignalParam(usize),
}

impl RefSlot {
    /// Every slot a declaration has.
    pub fn all(decl: &Declaration) -> Vec<RefSlot> {
        match &decl.kind {
            DeclKind::Class(t) | DeclKind::Interface(t) => (0..t.bases.len()).map(RefSlot::Base).collect(),
            DeclKind::Enum(e) => e.underlying.iter().map(|_| RefSlot::EnumUnderlying).collect(),
            DeclKind::Field(_) => vec![RefSlot::Field],
            DeclKind::Property(_) => vec![RefSlot::Property],
            DeclKind::Method(m) | DeclKind::Constructor(m) => std::iter::once(RefSlot::Return)
                .chain((0..m.params.len()).map(RefSlot::Param))
                .collect(),
            DeclKind::Signal(s) => (0..s.params.len()).map(RefSlot::SignalParam).collect(),
            DeclKind::Namespace(_) => Vec::new(),
        }
    }

    pub fn get(self, decl: &Declaration) -> Option<&TypeReference> {
        match (self, &decl.kind) {
            (RefSlot::Base(i), DeclKind::Class(t) | DeclKind::Interface(t)) => t.bases.get(i),
            (RefSlot::EnumUnderlying, DeclKind::Enum(e)) => e.underlying.as_ref(),
            (RefSlot::Field, DeclKind::Field(f)) => Some(&f.ty),
            (RefSlot::Property, DeclKind::Property(p)) => Some(&p.ty),
            (RefSlot::Return, DeclKind::Method(m) | DeclKind::Constructor(m)) => Some(&m.return_type),
            (RefSlot::Param(i), DeclKind::Method(m) | DeclKind::Constructor(m)) => m.params.get(i).map(|p| &p.ty),
            (RefSlot::SignalParam(i), DeclKind::Signal(s)) => s.params.get(i).map(|p| &p.ty),
            _ => None,
        }
    }

    pub fn get_mut(self, decl: &mut Declaration) -> Option<&mut TypeReference> {
        match (self, &mut decl.kind) {
            (RefSlot::Base(i), DeclKind::Class(t) | DeclKind::Interface(t)) => t.bases.get_mut(i),
            (RefSlot::EnumUnderlying, DeclKind::Enum(e)) => e.underlying.as_mut(),
            (RefSlot::Field, DeclKind::Field(f)) => Some(&mut f.ty),
            (RefSlot::Property, DeclKind::Property(p)) => Some(&mut p.ty),
            (RefSlot::Return, DeclKind::Method(m) | DeclKind::Constructor(m)) => Some(&mut m.return_type),
            (RefSlot::Param(i), DeclKind::Method(m) | DeclKind::Constructor(m)) => {
                m.params.get_mut(i).map(|p| &mut p.ty)
            }
            (RefSlot::SignalParam(i), DeclKind::Signal(s)) => s.params.get_mut(i).map(|p| &mut p.ty),
            _ => None,
        }
    }

    fn is_base(self) -> bool {
        matches!(self, RefSlot::Base(_))
    }
}

/// Resolve every type reference in the model and validate what depends on resolved types.
///
/// ## Errors
///
/// Every unresolved, unsupported or generic-scope problem in the project, sorted by location.
#[tracing::instrument(skip_all, fields(declarations = model.len()))]
pub fn resolve(model: &mut ProjectModel, config: &TypeMapConfig) -> Result<(), Diagnostics> {
    let mut diagnostics = generics::build_scopes(model);
    diagnostics.extend(resolve_slots(model, config, RefSlot::is_base));
    diagnostics.extend(resolve_slots(model, config, |slot| !slot.is_base()));
    diagnostics.extend(validate(model, config));
    match Diagnostics::from_vec(diagnostics) {
        Some(errors) => Err(errors),
        None => Ok(()),
    }
}

fn resolve_slots(model: &mut ProjectModel, config: &TypeMapConfig, select: fn(RefSlot) -> bool) -> Vec<Diagnostic> {
    let results: Vec<(DeclId, RefSlot, Result<ResolvedType, Diagnostic>)> = {
        let view: &ProjectModel = model;
        let table = SymbolTable::new(view, config);
        let mapper = TypeMapper::new(view, config);
        let pending: Vec<(DeclId, RefSlot)> = view
            .iter()
            .flat_map(|(id, decl)| RefSlot::all(decl).into_iter().filter(move |s| select(*s)).map(move |s| (id, s)))
            .collect();
        pending
            .par_iter()
            .filter_map(|&(id, slot)| match slot.get(view.decl(id))? {
                TypeReference::Unresolved(unresolved) => {
                    Some((id, slot, resolve_one(&table, &mapper, unresolved, slot.is_base())))
                }
                TypeReference::Resolved(_) => None,
            })
            .collect()
    };
    tracing::debug!(references = results.len(), "resolved type references");

    let mut diagnostics = Vec::new();
    for (id, slot, result) in results {
        match result {
            Ok(resolved) => {
                if let Some(target) = slot.get_mut(model.decl_mut(id)) {
                    *target = TypeReference::Resolved(resolved);
                }
            }
            Err(diagnostic) => diagnostics.push(diagnostic),
        }
    }
    diagnostics
}

fn resolve_one(
    table: &SymbolTable<'_>,
    mapper: &TypeMapper<'_>,
    unresolved: &UnresolvedType,
    base: bool,
) -> Result<ResolvedType, Diagnostic> {
    let location = unresolved.location.clone();
    let source = table
        .resolve(&unresolved.syntax, &unresolved.scope)
        .map_err(|e| e.into_diagnostic(location.clone()))?;
    let target = if base {
        mapper.class_name(&source).map(CppType::new)
    } else {
        mapper.map(&source)
    }
    .map_err(|e| Diagnostic::unsupported_type(format!("`{}`: {e}", unresolved.syntax), location.clone()))?;
    Ok(ResolvedType {
        source,
        target,
        written: unresolved.syntax.to_string(),
        location,
    })
}

/// Checks that need resolved types: base lists, engine registration, signals and exports.
fn validate(model: &ProjectModel, config: &TypeMapConfig) -> Vec<Diagnostic> {
    let mapper = TypeMapper::new(model, config);
    let mut diagnostics = Vec::new();
    for (id, decl) in model.iter() {
        match &decl.kind {
            DeclKind::Class(_) | DeclKind::Interface(_) => {
                check_bases(model, id, &mut diagnostics);
                check_overloads(model, id, &mut diagnostics);
            }
            DeclKind::Enum(e) => {
                let Some(underlying) = e.underlying.as_ref() else {
                    continue;
                };
                let integral = matches!(
                    underlying.source(),
                    Some(SourceType::Primitive(
                        PrimitiveTypeId::Byte
                            | PrimitiveTypeId::SByte
                            | PrimitiveTypeId::Short
                            | PrimitiveTypeId::UShort
                            | PrimitiveTypeId::Int
                            | PrimitiveTypeId::UInt
                            | PrimitiveTypeId::Long
                            | PrimitiveTypeId::ULong
                    )) | None
                );
                if !integral {
                    diagnostics.push(Diagnostic::unsupported_type(
                        format!("enum `{}` must have an integral underlying type", decl.name),
                        underlying.location().clone(),
                    ));
                }
            }
            DeclKind::Signal(signal) => {
                engine_member(model, decl, "signal", &mut diagnostics);
                for param in &signal.params {
                    boundary_type(&mapper, &param.ty, &format!("signal parameter `{}`", param.name), &mut diagnostics);
                }
            }
            DeclKind::Field(field) if field.attributes.contains(&AttributeId::Export) => {
                check_export(model, &mapper, decl, &field.ty, field.modifiers.is_static(), &mut diagnostics);
            }
            DeclKind::Property(property) if property.attributes.contains(&AttributeId::Export) => {
                check_export(model, &mapper, decl, &property.ty, property.modifiers.is_static(), &mut diagnostics);
            }
            _ => {}
        }
    }
    diagnostics
}

fn check_bases(model: &ProjectModel, id: DeclId, diagnostics: &mut Vec<Diagnostic>) {
    let decl = model.decl(id);
    let Some(ty) = decl.as_type() else {
        return;
    };
    let is_interface = matches!(decl.kind, DeclKind::Interface(_));
    let mut class_bases = 0;
    for (i, base) in ty.bases.iter().enumerate() {
        let Some(source) = base.source() else {
            continue;
        };
        let base_kind = match source {
            SourceType::Engine(info) if engine::is_object_class(info) => Some("class"),
            SourceType::Declared { .. } => source.declared_id().map(|b| model.decl(b).kind_name()),
            _ => None,
        };
        let problem = match (base_kind, is_interface) {
            (Some("interface"), _) => None,
            (Some("class"), false) => {
                class_bases += 1;
                if class_bases > 1 {
                    Some("a class can have only one base class".to_string())
                } else if i > 0 {
                    Some("the base class must come first in the base list".to_string())
                } else {
                    None
                }
            }
            (Some(_), true) => Some(format!("interface `{}` can only extend interfaces", decl.name)),
            _ => Some(format!("`{}` cannot be used as a base type", base.written())),
        };
        if let Some(message) = problem {
            diagnostics.push(Diagnostic::unsupported_type(message, base.location().clone()));
        }
    }
    if is_interface {
        return;
    }
    if derives_from_itself(model, id) {
        diagnostics.push(Diagnostic::unsupported_type(
            format!("class `{}` derives from itself", decl.path),
            decl.location.clone(),
        ));
        return;
    }
    if let Some(engine_class) = type_map::engine_base(model, id) {
        if !ty.generic_scope.is_empty() {
            diagnostics.push(Diagnostic::generic_scope(
                format!(
                    "generic class `{}` cannot derive from engine class `{}`: engine classes are registered by name \
                     and cannot be templates",
                    decl.path, engine_class.name
                ),
                decl.location.clone(),
            ));
        }
    }
}

/// Overloads that differ in C# but collapse onto one C++ signature.
///
/// Two methods collide when their emitted names, template arity, mapped parameter types and parameter passing all
/// match. The method's own template parameters are compared by position, so `F<T>(T)` and `F<U>(U)` collide.
fn check_overloads(model: &ProjectModel, id: DeclId, diagnostics: &mut Vec<Diagnostic>) {
    let owner = model.decl(id);
    let mut seen: Vec<(String, DeclId)> = Vec::new();
    for &member in owner.members() {
        let decl = model.decl(member);
        let Some(method) = decl.as_method() else {
            continue;
        };
        let own: Vec<&str> = method
            .generic_scope
            .own(GenericOwner::Method)
            .map(|p| p.emitted.as_str())
            .collect();
        let mut params = Vec::with_capacity(method.params.len());
        for param in &method.params {
            let Some(target) = param.ty.target() else {
                // Already reported as unresolved or unsupported.
                return;
            };
            let passing = match classify::passing(param) {
                Passing::ByReference => " &",
                Passing::ByValue => "",
            };
            params.push(format!("{}{passing}", positional(target.as_str(), &own)));
        }
        let name = classify::classify_member(model, member).map_or_else(|| decl.name.clone(), |s| s.emitted_name);
        let signature = format!("{name}<{}>({})", own.len(), params.join(", "));
        match seen.iter().find(|(s, _)| *s == signature) {
            Some(&(_, first)) => diagnostics.push(
                Diagnostic::duplicate(
                    format!("{}.{}", owner.path, decl.name),
                    model.decl(first).location.clone(),
                    decl.location.clone(),
                )
                .with_note(format!(
                    "both overloads become `{name}({})` in C++",
                    params.join(", ")
                )),
            ),
            None => seen.push((signature, member)),
        }
    }
}

/// `target` with each of `own` replaced by its position, e.g. `godot::Vector<U>` with `[U]` becomes
/// `godot::Vector<$0>`.
fn positional(target: &str, own: &[&str]) -> String {
    let mut out = String::with_capacity(target.len());
    let mut ident = String::new();
    let flush = |ident: &mut String, out: &mut String| {
        match own.iter().position(|p| p == ident) {
            Some(i) => out.push_str(&format!("${i}")),
            None => out.push_str(ident),
        }
        ident.clear();
    };
    for c in target.chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            ident.push(c);
        } else {
            flush(&mut ident, &mut out);
            out.push(c);
        }
    }
    flush(&mut ident, &mut out);
    out
}

fn derives_from_itself(model: &ProjectModel, id: DeclId) -> bool {
    let mut current = id;
    for _ in 0..model.len() {
        let next = model.decl(current).as_type().and_then(|t| {
            t.bases
                .iter()
                .filter_map(|b| b.source()?.declared_id())
                .find(|b| matches!(model.decl(*b).kind, DeclKind::Class(_)))
        });
        match next {
            Some(next) if next == id => return true,
            Some(next) => current = next,
            None => return false,
        }
    }
    false
}

/// Signals and exports only exist on classes registered with the engine.
fn engine_member(model: &ProjectModel, decl: &Declaration, what: &str, diagnostics: &mut Vec<Diagnostic>) {
    let Some(owner) = decl.parent else {
        return;
    };
    if type_map::engine_base(model, owner).is_none() {
        diagnostics.push(Diagnostic::unsupported_type(
            format!(
                "{what} `{}` is declared in `{}`, which does not derive from an engine class",
                decl.name,
                model.decl(owner).path
            ),
            decl.location.clone(),
        ));
    }
}

fn boundary_type(mapper: &TypeMapper<'_>, ty: &TypeReference, what: &str, diagnostics: &mut Vec<Diagnostic>) {
    let Some(source) = ty.source() else {
        return;
    };
    if mapper.variant_type(source).is_none() {
        diagnostics.push(Diagnostic::unsupported_type(
            format!("{what} of type `{}` cannot cross the engine boundary", ty.written()),
            ty.location().clone(),
        ));
    }
}

fn check_export(
    model: &ProjectModel,
    mapper: &TypeMapper<'_>,
    decl: &Declaration,
    ty: &TypeReference,
    is_static: bool,
    diagnostics: &mut Vec<Diagnostic>,
) {
    if is_static {
        diagnostics.push(Diagnostic::structural(
            format!("`[Export]` on static member `{}` is not supported", decl.name),
            decl.location.clone(),
        ));
        return;
    }
    engine_member(model, decl, "exported member", diagnostics);
    boundary_type(mapper, ty, &format!("exported member `{}`", decl.name), diagnostics);
}
