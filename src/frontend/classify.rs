//! Member classifier.
//!
//! Reduces source modifiers to the few distinctions the emitted code keeps: storage, mutability, parameter passing
//! and virtuality. Access modifiers carry no meaning here; every emitted member is public.

use gdunsharp_core::lang::attributes::AttributeId;
use gdunsharp_core::lang::callbacks;
use gdunsharp_core::lang::cpp_keywords;
use gdunsharp_core::lang::modifiers::ModifierId;
use gdunsharp_core::lang::types::EngineTypeInfo;

use crate::frontend::model::{DeclId, DeclKind, GenericOwner, Modifiers, Parameter, ProjectModel, SourceType};
use crate::frontend::type_map::{self, TypeMapper};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Storage {
    Instance,
    Static,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutability {
    Mutable,
    /// `readonly`, or a property without a setter.
    Immutable,
    /// `const`: a compile-time constant shared by all instances.
    Constant,
}

/// `ref`, `out` and `in` all pass by reference; direction is not kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Passing {
    ByValue,
    ByReference,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Virtuality {
    None,
    Virtual,
    /// No implementation: `abstract`, or a bodiless interface member.
    Pure,
    Override,
    FinalOverride,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    Field,
    Property,
    Method,
    Constructor,
    /// Declaration-only engine event; never has a body.
    Signal,
}

/// Canonical form of one member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberShape {
    pub kind: MemberKind,
    pub storage: Storage,
    pub mutability: Mutability,
    pub virtuality: Virtuality,
    /// `[Export]`ed to the editor.
    pub exported: bool,
    /// Identifier in emitted code: keyword-escaped, or the engine spelling of a callback override.
    pub emitted_name: String,
    /// Set when the member overrides an engine virtual callback.
    pub engine_callback: Option<&'static str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Class,
    Interface,
    Enum,
}

/// Canonical form of one type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeShape {
    pub kind: TypeKind,
    /// `sealed`.
    pub is_final: bool,
    /// Class-level `static`: no instances.
    pub is_static: bool,
    pub is_abstract: bool,
    /// Engine object class this type derives from; such classes are registered with the engine.
    pub engine_base: Option<&'static EngineTypeInfo>,
    /// Has generic parameters of its own or from an enclosing type.
    pub is_template: bool,
}

impl TypeShape {
    pub fn is_engine_class(&self) -> bool {
        self.kind == TypeKind::Class && self.engine_base.is_some()
    }
}

pub fn classify_type(model: &ProjectModel, id: DeclId) -> TypeShape {
    let decl = model.decl(id);
    let kind = match decl.kind {
        DeclKind::Interface(_) => TypeKind::Interface,
        DeclKind::Enum(_) => TypeKind::Enum,
        _ => TypeKind::Class,
    };
    let modifiers = decl.modifiers().cloned().unwrap_or_default();
    TypeShape {
        kind,
        is_final: modifiers.has(ModifierId::Sealed),
        is_static: modifiers.has(ModifierId::Static),
        is_abstract: modifiers.has(ModifierId::Abstract),
        engine_base: type_map::engine_base(model, id),
        is_template: decl.generic_scope().is_some_and(|s| !s.is_empty()),
    }
}

/// Canonical shape of a member; `None` for namespaces and types, which are not members.
pub fn classify_member(model: &ProjectModel, id: DeclId) -> Option<MemberShape> {
    let decl = model.decl(id);
    let owner = decl.parent.map(|p| model.decl(p));
    let in_interface = owner.is_some_and(|o| matches!(o.kind, DeclKind::Interface(_)));
    let in_engine_class = decl.parent.is_some_and(|p| type_map::engine_base(model, p).is_some());
    let empty = Modifiers::default();
    let modifiers = decl.modifiers().unwrap_or(&empty);

    let (kind, has_body, mutability, exported) = match &decl.kind {
        DeclKind::Field(f) => (
            MemberKind::Field,
            true,
            if f.modifiers.has(ModifierId::Const) {
                Mutability::Constant
            } else if f.modifiers.has(ModifierId::Readonly) {
                Mutability::Immutable
            } else {
                Mutability::Mutable
            },
            f.attributes.contains(&AttributeId::Export),
        ),
        DeclKind::Property(p) => (
            MemberKind::Property,
            p.getter.iter().chain(p.setter.iter()).any(|a| a.body.is_some()) || !in_interface,
            if p.setter.is_some() {
                Mutability::Mutable
            } else {
                Mutability::Immutable
            },
            p.attributes.contains(&AttributeId::Export),
        ),
        DeclKind::Method(m) => (MemberKind::Method, m.body.is_some(), Mutability::Mutable, false),
        DeclKind::Constructor(_) => (MemberKind::Constructor, true, Mutability::Mutable, false),
        DeclKind::Signal(_) => (MemberKind::Signal, false, Mutability::Immutable, false),
        DeclKind::Namespace(_) | DeclKind::Interface(_) | DeclKind::Class(_) | DeclKind::Enum(_) => return None,
    };

    let virtuality = match kind {
        MemberKind::Method | MemberKind::Property => virtuality(modifiers, in_interface, has_body),
        _ => Virtuality::None,
    };
    let engine_callback = (kind == MemberKind::Method && in_engine_class)
        .then(|| callbacks::engine_name(&decl.name))
        .flatten();
    let emitted_name = match (kind, engine_callback) {
        (_, Some(engine)) => engine.to_string(),
        (MemberKind::Constructor, _) => owner.map_or_else(String::new, |o| cpp_keywords::escape(&o.name)),
        _ => cpp_keywords::escape(&decl.name),
    };
    Some(MemberShape {
        kind,
        storage: if modifiers.is_static() {
            Storage::Static
        } else {
            Storage::Instance
        },
        mutability,
        virtuality,
        exported,
        emitted_name,
        engine_callback,
    })
}

fn virtuality(modifiers: &Modifiers, in_interface: bool, has_body: bool) -> Virtuality {
    if modifiers.has(ModifierId::Abstract) || (in_interface && !has_body) {
        Virtuality::Pure
    } else if modifiers.has(ModifierId::Override) {
        if modifiers.has(ModifierId::Sealed) {
            Virtuality::FinalOverride
        } else {
            Virtuality::Override
        }
    } else if in_interface || modifiers.has(ModifierId::Virtual) {
        Virtuality::Virtual
    } else {
        Virtuality::None
    }
}

pub fn passing(param: &Parameter) -> Passing {
    let by_reference = param
        .modifiers
        .iter()
        .any(|m| matches!(m, ModifierId::Ref | ModifierId::Out | ModifierId::In));
    if by_reference {
        Passing::ByReference
    } else {
        Passing::ByValue
    }
}

/// Whether a method can be registered with `ClassDB::bind_method`.
///
/// Registered methods are instance methods of engine classes that are not templates, not engine callbacks (the
/// engine binds those itself), and whose return and parameter types all cross the engine boundary.
pub fn is_bindable(mapper: &TypeMapper<'_>, model: &ProjectModel, id: DeclId) -> bool {
    let decl = model.decl(id);
    let DeclKind::Method(method) = &decl.kind else {
        return false;
    };
    let Some(shape) = classify_member(model, id) else {
        return false;
    };
    if shape.storage == Storage::Static || shape.engine_callback.is_some() {
        return false;
    }
    if method.generic_scope.own(GenericOwner::Method).next().is_some() {
        return false;
    }
    let Some(owner) = decl.parent else {
        return false;
    };
    if !classify_type(model, owner).is_engine_class() {
        return false;
    }
    if method.params.iter().any(|p| passing(p) == Passing::ByReference) {
        return false;
    }
    let returns_ok = method
        .return_type
        .source()
        .is_some_and(|s| *s == SourceType::Void || mapper.variant_type(s).is_some());
    returns_ok
        && method
            .params
            .iter()
            .all(|p| p.ty.source().is_some_and(|s| mapper.variant_type(s).is_some()))
}
