//! Declarations: the single record type the whole pipeline shares.

use gdunsharp_core::lang::attributes::AttributeId;
use gdunsharp_core::lang::modifiers::{self, ModifierId};
use gdunsharp_syntax::SourceLocation;

use super::path::QualifiedPath;
use super::scope::GenericScope;
use super::types::TypeReference;

/// Index of a declaration in the project model's arena.
pub type DeclId = usize;

/// Modifiers in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Modifiers(pub Vec<ModifierId>);

impl Modifiers {
    pub fn has(&self, id: ModifierId) -> bool {
        self.0.contains(&id)
    }

    pub fn push(&mut self, id: ModifierId) {
        if !self.has(id) {
            self.0.push(id);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = ModifierId> + '_ {
        self.0.iter().copied()
    }

    pub fn is_static(&self) -> bool {
        self.has(ModifierId::Static) || self.has(ModifierId::Const)
    }

    /// Source spelling, e.g. `public static`.
    pub fn spelled(&self) -> String {
        self.0.iter().map(|m| modifiers::as_str(*m)).collect::<Vec<_>>().join(" ")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub path: QualifiedPath,
    /// Simple name; for methods this is the name without the overload signature.
    pub name: String,
    pub location: SourceLocation,
    /// Enclosing type, for members and nested types.
    pub parent: Option<DeclId>,
    pub kind: DeclKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclKind {
    Namespace(NamespaceDecl),
    Interface(TypeDecl),
    Class(TypeDecl),
    Enum(EnumDecl),
    Field(FieldDecl),
    Property(PropertyDecl),
    Method(MethodDecl),
    Constructor(MethodDecl),
    Signal(SignalDecl),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamespaceDecl {
    /// Every place the namespace was opened.
    pub declared_at: Vec<SourceLocation>,
}

/// Payload shared by classes and interfaces.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeDecl {
    pub modifiers: Modifiers,
    pub attributes: Vec<AttributeId>,
    pub generics: Vec<String>,
    pub bases: Vec<TypeReference>,
    /// Members and nested types in declaration order.
    pub members: Vec<DeclId>,
    /// Filled during resolution.
    pub generic_scope: GenericScope,
    /// One location per `partial` part, in merge order.
    pub parts: Vec<SourceLocation>,
}

impl TypeDecl {
    pub fn is_partial(&self) -> bool {
        self.modifiers.has(ModifierId::Partial)
    }

    pub fn is_static(&self) -> bool {
        self.modifiers.has(ModifierId::Static)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumMember {
    pub name: String,
    /// Value expression as written, when given.
    pub value: Option<String>,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnumDecl {
    pub modifiers: Modifiers,
    pub underlying: Option<TypeReference>,
    pub members: Vec<EnumMember>,
}

/// Initial value of a field or auto-property.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Initializer {
    #[default]
    None,
    /// A simple literal, carried into the output.
    Literal(String),
    /// Any other expression; kept only as a comment.
    Dropped(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    pub modifiers: Modifiers,
    pub attributes: Vec<AttributeId>,
    pub ty: TypeReference,
    pub initializer: Initializer,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Accessor {
    /// Body text (block or `=> expr`); `None` for `get;`-style accessors.
    pub body: Option<String>,
    /// `init` rather than `set`.
    pub init_only: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDecl {
    pub modifiers: Modifiers,
    pub attributes: Vec<AttributeId>,
    pub ty: TypeReference,
    pub getter: Option<Accessor>,
    pub setter: Option<Accessor>,
    pub initializer: Initializer,
}

impl PropertyDecl {
    /// `{ get; set; }`: no accessor has a body.
    pub fn is_auto(&self) -> bool {
        self.getter.iter().chain(self.setter.iter()).all(|a| a.body.is_none())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub ty: TypeReference,
    pub modifiers: Modifiers,
    /// Literal default value as written.
    pub default: Option<String>,
    pub location: SourceLocation,
}

/// Methods and constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDecl {
    pub modifiers: Modifiers,
    pub attributes: Vec<AttributeId>,
    /// `void` for constructors.
    pub return_type: TypeReference,
    pub generics: Vec<String>,
    pub params: Vec<Parameter>,
    /// Body text, block or expression form; `None` for abstract and interface members.
    pub body: Option<String>,
    /// Filled during resolution.
    pub generic_scope: GenericScope,
}

/// An engine signal, declared in source as a `[Signal]` delegate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalDecl {
    pub delegate_name: String,
    pub params: Vec<Parameter>,
}

impl Declaration {
    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            DeclKind::Namespace(_) => "namespace",
            DeclKind::Interface(_) => "interface",
            DeclKind::Class(_) => "class",
            DeclKind::Enum(_) => "enum",
            DeclKind::Field(_) => "field",
            DeclKind::Property(_) => "property",
            DeclKind::Method(_) => "method",
            DeclKind::Constructor(_) => "constructor",
            DeclKind::Signal(_) => "signal",
        }
    }

    /// Classes, interfaces and enums.
    pub fn is_type(&self) -> bool {
        matches!(self.kind, DeclKind::Interface(_) | DeclKind::Class(_) | DeclKind::Enum(_))
    }

    /// A type declared inside another type.
    pub fn is_nested_type(&self) -> bool {
        self.is_type() && self.parent.is_some()
    }

    /// Class or interface payload.
    pub fn as_type(&self) -> Option<&TypeDecl> {
        match &self.kind {
            DeclKind::Interface(t) | DeclKind::Class(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_type_mut(&mut self) -> Option<&mut TypeDecl> {
        match &mut self.kind {
            DeclKind::Interface(t) | DeclKind::Class(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_method(&self) -> Option<&MethodDecl> {
        match &self.kind {
            DeclKind::Method(m) | DeclKind::Constructor(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_method_mut(&mut self) -> Option<&mut MethodDecl> {
        match &mut self.kind {
            DeclKind::Method(m) | DeclKind::Constructor(m) => Some(m),
            _ => None,
        }
    }

    /// Own generic parameters of a type or method.
    pub fn generics(&self) -> &[String] {
        match &self.kind {
            DeclKind::Interface(t) | DeclKind::Class(t) => &t.generics,
            DeclKind::Method(m) | DeclKind::Constructor(m) => &m.generics,
            _ => &[],
        }
    }

    /// Generic scope computed for a type or method; `None` for other declarations.
    pub fn generic_scope(&self) -> Option<&GenericScope> {
        match &self.kind {
            DeclKind::Interface(t) | DeclKind::Class(t) => Some(&t.generic_scope),
            DeclKind::Method(m) | DeclKind::Constructor(m) => Some(&m.generic_scope),
            _ => None,
        }
    }

    pub fn modifiers(&self) -> Option<&Modifiers> {
        match &self.kind {
            DeclKind::Interface(t) | DeclKind::Class(t) => Some(&t.modifiers),
            DeclKind::Enum(e) => Some(&e.modifiers),
            DeclKind::Field(f) => Some(&f.modifiers),
            DeclKind::Property(p) => Some(&p.modifiers),
            DeclKind::Method(m) | DeclKind::Constructor(m) => Some(&m.modifiers),
            DeclKind::Namespace(_) | DeclKind::Signal(_) => None,
        }
    }

    /// Member and nested-type ids of a class or interface.
    pub fn members(&self) -> &[DeclId] {
        self.as_type().map(|t| t.members.as_slice()).unwrap_or(&[])
    }
}
