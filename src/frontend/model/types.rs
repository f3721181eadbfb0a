//! Type references: the syntax a declaration wrote, the lexical scope it was written in, and (after resolution) the
//! source type it denotes plus its target spelling.

use std::fmt;

use gdunsharp_core::lang::types::{ContainerTypeId, EngineTypeInfo, PrimitiveTypeId, primitives};
use gdunsharp_syntax::SourceLocation;

use super::decl::DeclId;
use super::path::QualifiedPath;
use crate::config::ContainerRule;

/// A type as written in source, parsed but not resolved.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeSyntax {
    Named(NamedType),
    /// `T[]`
    Array(Box<TypeSyntax>),
    /// `T?`
    Nullable(Box<TypeSyntax>),
}

/// `global::A.B<int>.C`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NamedType {
    pub global: bool,
    pub segments: Vec<NameSegment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NameSegment {
    pub name: String,
    pub args: Vec<TypeSyntax>,
}

impl TypeSyntax {
    /// Single unqualified name without type arguments.
    pub fn simple(name: impl Into<String>) -> Self {
        TypeSyntax::Named(NamedType {
            global: false,
            segments: vec![NameSegment {
                name: name.into(),
                args: Vec::new(),
            }],
        })
    }

    pub fn is_void(&self) -> bool {
        matches!(self, TypeSyntax::Named(named) if !named.global
            && named.segments.len() == 1
            && named.segments[0].name == "void"
            && named.segments[0].args.is_empty())
    }
}

impl NamedType {
    /// Dotted qualifier before the last segment, ignoring type arguments.
    pub fn qualifier(&self) -> String {
        self.segments[..self.segments.len().saturating_sub(1)]
            .iter()
            .map(|s| s.name.as_str())
            .collect::<Vec<_>>()
            .join(".")
    }

    pub fn last(&self) -> Option<&NameSegment> {
        self.segments.last()
    }
}

impl fmt::Display for TypeSyntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeSyntax::Named(named) => write!(f, "{named}"),
            TypeSyntax::Array(element) => write!(f, "{element}[]"),
            TypeSyntax::Nullable(inner) => write!(f, "{inner}?"),
        }
    }
}

impl fmt::Display for NamedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.global {
            write!(f, "global::")?;
        }
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

impl fmt::Display for NameSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.args.is_empty() {
            write!(f, "<")?;
            for (i, arg) in self.args.iter().enumerate() {
                if i > 0 {
                    write!(f, ",")?;
                }
                write!(f, "{arg}")?;
            }
            write!(f, ">")?;
        }
        Ok(())
    }
}

/// Where a type reference was written.
///
/// The namespace, the enclosing type and the `using` directives fix the scope search; `member` names the method
/// (or other member) whose own generic parameters are visible.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LexicalScope {
    pub namespace: QualifiedPath,
    pub enclosing_type: Option<QualifiedPath>,
    pub member: Option<QualifiedPath>,
    pub usings: Vec<QualifiedPath>,
}

/// One segment of a reference to a user-declared type, with the type arguments supplied for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredSegment {
    pub id: DeclId,
    pub args: Vec<SourceType>,
}

/// What a type reference denotes once resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceType {
    Void,
    Primitive(PrimitiveTypeId),
    Engine(&'static EngineTypeInfo),
    Container {
        /// Name as resolved, e.g. `System.Collections.Generic.List`.
        name: String,
        builtin: Option<ContainerTypeId>,
        rule: ContainerRule,
        args: Vec<SourceType>,
    },
    Array(Box<SourceType>),
    Nullable(Box<SourceType>),
    /// A project type. `segments` runs from the outermost enclosing type down to the referenced type, so
    /// arguments of generic outer types travel with nested references.
    Declared { segments: Vec<DeclaredSegment> },
    GenericParam { name: String, emitted: String },
}

impl SourceType {
    /// The referenced project declaration, if any.
    pub fn declared_id(&self) -> Option<DeclId> {
        match self {
            SourceType::Declared { segments } => segments.last().map(|s| s.id),
            _ => None,
        }
    }

    /// Visit this type and every type nested in its arguments.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a SourceType)) {
        visit(self);
        match self {
            SourceType::Container { args, .. } => args.iter().for_each(|a| a.walk(visit)),
            SourceType::Array(inner) | SourceType::Nullable(inner) => inner.walk(visit),
            SourceType::Declared { segments } => segments
                .iter()
                .flat_map(|s| s.args.iter())
                .for_each(|a| a.walk(visit)),
            _ => {}
        }
    }

    /// Short human-readable form for diagnostics.
    pub fn describe(&self) -> String {
        match self {
            SourceType::Void => "void".to_string(),
            SourceType::Primitive(id) => primitives::as_str(*id).to_string(),
            SourceType::Engine(info) => format!("Godot.{}", info.name),
            SourceType::Container { name, args, .. } => {
                let args: Vec<String> = args.iter().map(SourceType::describe).collect();
                format!("{name}<{}>", args.join(", "))
            }
            SourceType::Array(element) => format!("{}[]", element.describe()),
            SourceType::Nullable(inner) => format!("{}?", inner.describe()),
            SourceType::Declared { segments } => format!("declaration #{}", segments.last().map_or(0, |s| s.id)),
            SourceType::GenericParam { name, .. } => name.clone(),
        }
    }
}

/// Target-language type expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CppType(pub String);

impl CppType {
    pub fn new(spelling: impl Into<String>) -> Self {
        Self(spelling.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_void(&self) -> bool {
        self.0 == "void"
    }

    /// Spelling followed by a declarator, keeping `T *name` and `T &name` tight on the name side.
    pub fn declare(&self, name: &str) -> String {
        if self.0.ends_with('*') || self.0.ends_with('&') {
            format!("{}{name}", self.0)
        } else {
            format!("{} {name}", self.0)
        }
    }
}

impl fmt::Display for CppType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedType {
    pub syntax: TypeSyntax,
    pub scope: LexicalScope,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedType {
    pub source: SourceType,
    pub target: CppType,
    /// Source spelling, kept for comments and diagnostics.
    pub written: String,
    pub location: SourceLocation,
}

/// A type slot in a declaration.
///
/// Created `Unresolved` by the outline builder and replaced by `Resolved` exactly once during resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeReference {
    Unresolved(UnresolvedType),
    Resolved(ResolvedType),
}

impl TypeReference {
    pub fn unresolved(syntax: TypeSyntax, scope: LexicalScope, location: SourceLocation) -> Self {
        TypeReference::Unresolved(UnresolvedType {
            syntax,
            scope,
            location,
        })
    }

    pub fn resolved(&self) -> Option<&ResolvedType> {
        match self {
            TypeReference::Resolved(resolved) => Some(resolved),
            TypeReference::Unresolved(_) => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, TypeReference::Resolved(_))
    }

    pub fn location(&self) -> &SourceLocation {
        match self {
            TypeReference::Unresolved(u) => &u.location,
            TypeReference::Resolved(r) => &r.location,
        }
    }

    /// Source spelling of the reference.
    pub fn written(&self) -> String {
        match self {
            TypeReference::Unresolved(u) => u.syntax.to_string(),
            TypeReference::Resolved(r) => r.written.clone(),
        }
    }

    /// Target spelling; `None` before resolution.
    pub fn target(&self) -> Option<&CppType> {
        self.resolved().map(|r| &r.target)
    }

    pub fn source(&self) -> Option<&SourceType> {
        self.resolved().map(|r| &r.source)
    }
}
