//! Outline Builder: one file's syntax tree in, a file-local outline of declarations out.
//!
//! The outline knows nothing about other files. Every type reference is left
//! [`TypeReference::Unresolved`](crate::frontend::model::TypeReference), tagged with the namespace, enclosing type,
//! member and `using` directives in force where it was written.
//!
//! Constructs outside the dialect become structural-unsupported diagnostics on the outline. They never stop the rest
//! of the file (or any other file) from being outlined.
//!
//! ## Notes
//! - Namespace declarations are absolute; only declarations outside every namespace declaration use the file's
//!   namespace context.
//! - A file-scoped namespace applies to everything after it, whether the grammar nests those declarations inside the
//!   namespace node or leaves them as its siblings.

mod checks;
mod members;
pub mod type_syntax;

use std::path::PathBuf;

use gdunsharp_core::lang::attributes::{self, AttributeRole};
use gdunsharp_syntax::node::{children_of_kind, field, named_children};
use gdunsharp_syntax::{Node, SourceLocation, SyntaxTree};

use crate::diagnostics::Diagnostic;
use crate::frontend::model::{
    DeclKind, Declaration, EnumDecl, EnumMember, LexicalScope, QualifiedPath, TypeDecl, TypeReference,
};

/// Outline of one source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutline {
    pub file: PathBuf,
    /// Every namespace opened in the file, with where it was opened.
    pub namespaces: Vec<(QualifiedPath, SourceLocation)>,
    /// Top-level types in source order.
    pub types: Vec<TypeOutline>,
    pub diagnostics: Vec<Diagnostic>,
}

/// A class, interface or enum together with its members and nested types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeOutline {
    /// The type itself; its member list is empty until merged.
    pub decl: Declaration,
    pub items: Vec<OutlineItem>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutlineItem {
    Member(Declaration),
    Type(TypeOutline),
}

/// Namespace and `using` directives in force at one point of a file.
#[derive(Debug, Clone)]
struct Context {
    namespace: QualifiedPath,
    usings: Vec<QualifiedPath>,
    /// Inside a namespace declaration (block or file-scoped).
    in_namespace: bool,
}

impl Context {
    fn scope(&self, enclosing_type: Option<&QualifiedPath>, member: Option<&QualifiedPath>) -> LexicalScope {
        LexicalScope {
            namespace: self.namespace.clone(),
            enclosing_type: enclosing_type.cloned(),
            member: member.cloned(),
            usings: self.usings.clone(),
        }
    }
}

pub(crate) struct OutlineBuilder<'t> {
    tree: &'t SyntaxTree,
    namespaces: Vec<(QualifiedPath, SourceLocation)>,
    diagnostics: Vec<Diagnostic>,
}

/// Build the outline of one parsed file.
///
/// ## Parameters
///
/// - `tree`: the parsed file.
/// - `namespace_context`: namespace for declarations written outside any namespace declaration.
#[tracing::instrument(skip_all, fields(file = %tree.path().display()))]
pub fn build_outline(tree: &SyntaxTree, namespace_context: &QualifiedPath) -> FileOutline {
    let mut builder = OutlineBuilder {
        tree,
        namespaces: Vec::new(),
        diagnostics: Vec::new(),
    };
    let mut context = Context {
        namespace: namespace_context.clone(),
        usings: Vec::new(),
        in_namespace: false,
    };
    let types = builder.container(tree.root(), &mut context);
    tracing::debug!(types = types.len(), diagnostics = builder.diagnostics.len(), "outlined");
    FileOutline {
        file: tree.path().to_path_buf(),
        namespaces: builder.namespaces,
        types,
        diagnostics: builder.diagnostics,
    }
}

impl<'t> OutlineBuilder<'t> {
    fn text(&self, node: &Node<'t>) -> &'t str {
        self.tree.text(node)
    }

    fn location(&self, node: &Node<'t>) -> SourceLocation {
        self.tree.location(node)
    }

    /// Identifier text without the verbatim `@` prefix.
    fn ident(&self, node: &Node<'t>) -> String {
        let text = self.text(node);
        text.strip_prefix('@').unwrap_or(text).to_string()
    }

    fn name_of(&self, node: &Node<'t>) -> Option<String> {
        field(node, &["name"]).map(|n| self.ident(&n))
    }

    fn structural(&mut self, node: &Node<'t>, message: impl Into<String>) {
        let location = self.location(node);
        self.diagnostics.push(Diagnostic::structural(message, location));
    }

    /// Walk a compilation unit, namespace body or file-scoped namespace.
    fn container(&mut self, node: Node<'t>, context: &mut Context) -> Vec<TypeOutline> {
        let mut types = Vec::new();
        for child in named_children(&node) {
            match child.kind() {
                "using_directive" => self.using_directive(&child, context),
                "namespace_declaration" => {
                    let Some(name) = field(&child, &["name"]) else {
                        self.structural(&child, "namespace declaration without a name");
                        continue;
                    };
                    let mut inner = context.clone();
                    inner.namespace = context.namespace_for(&QualifiedPath::parse(self.text(&name)));
                    inner.in_namespace = true;
                    self.namespaces.push((inner.namespace.clone(), self.location(&child)));
                    if let Some(body) = field(&child, &["body"]) {
                        types.extend(self.container(body, &mut inner));
                    }
                }
                "file_scoped_namespace_declaration" => {
                    let Some(name) = field(&child, &["name"]) else {
                        self.structural(&child, "namespace declaration without a name");
                        continue;
                    };
                    context.namespace = QualifiedPath::parse(self.text(&name));
                    context.in_namespace = true;
                    self.namespaces.push((context.namespace.clone(), self.location(&child)));
                    types.extend(self.container(child, context));
                }
                "class_declaration" | "interface_declaration" | "enum_declaration" => {
                    if let Some(outline) = self.type_declaration(child, context, None) {
                        types.push(outline);
                    }
                }
                "comment" | "preproc_region" | "preproc_endregion" | "identifier" | "qualified_name" => {}
                "struct_declaration" | "record_declaration" | "record_struct_declaration" => {
                    self.structural(&child, "structs and records are not supported")
                }
                "delegate_declaration" => self.structural(
                    &child,
                    "delegates are only supported as `[Signal]` declarations inside a class",
                ),
                "global_statement" => self.structural(&child, "top-level statements are not supported"),
                kind if kind.starts_with("preproc") => {
                    self.structural(&child, "preprocessor directives are not supported")
                }
                kind => self.structural(&child, format!("unsupported declaration `{kind}`")),
            }
        }
        types
    }

    fn using_directive(&mut self, node: &Node<'t>, context: &mut Context) {
        let text = self.text(node).trim().trim_end_matches(';').trim();
        let text = text.strip_prefix("global").map(str::trim_start).unwrap_or(text);
        let Some(rest) = text.strip_prefix("using") else {
            self.structural(node, "malformed using directive");
            return;
        };
        let rest = rest.trim();
        if rest.starts_with("static ") {
            self.structural(node, "`using static` is not supported");
        } else if rest.contains('=') {
            self.structural(node, "using aliases are not supported");
        } else if rest == "System.Reflection" || rest.starts_with("System.Reflection.") {
            self.structural(node, "reflection (`System.Reflection`) is not supported");
        } else {
            let rest = rest.strip_prefix("global::").unwrap_or(rest);
            context.usings.push(QualifiedPath::parse(rest));
        }
    }

    /// Outline a class, interface or enum. `enclosing` is the path of the enclosing type for nested declarations.
    fn type_declaration(
        &mut self,
        node: Node<'t>,
        context: &Context,
        enclosing: Option<&QualifiedPath>,
    ) -> Option<TypeOutline> {
        let Some(name) = self.name_of(&node) else {
            self.structural(&node, "type declaration without a name");
            return None;
        };
        let path = match enclosing {
            Some(outer) => outer.child(name.clone()),
            None => context.namespace.child(name.clone()),
        };
        let modifiers = self.modifiers(&node);
        let type_attributes = self.attributes(&node);
        for id in &type_attributes {
            if attributes::role(*id) != AttributeRole::Ignored {
                self.structural(
                    &node,
                    format!("attribute `[{}]` cannot be applied to a type", attributes::info_for(*id).canonical),
                );
            }
        }
        let location = self.location(&node);

        if node.kind() == "enum_declaration" {
            let underlying = children_of_kind(&node, "base_list")
                .first()
                .and_then(|list| named_children(list).into_iter().next())
                .and_then(|ty| self.type_reference(&ty, context.scope(None, None)));
            let members = field(&node, &["body"])
                .map(|body| self.enum_members(&body))
                .unwrap_or_default();
            let decl = Declaration {
                path,
                name,
                location,
                parent: None,
                kind: DeclKind::Enum(EnumDecl {
                    modifiers,
                    underlying,
                    members,
                }),
            };
            return Some(TypeOutline {
                decl,
                items: Vec::new(),
            });
        }

        if field(&node, &["parameters"]).is_some() || !children_of_kind(&node, "parameter_list").is_empty() {
            self.structural(&node, "primary constructors are not supported");
        }
        let generics = self.type_parameters(&node);
        let scope = context.scope(Some(&path), None);
        let mut bases = Vec::new();
        for list in children_of_kind(&node, "base_list") {
            for base in named_children(&list) {
                match base.kind() {
                    "argument_list" | "primary_constructor_base_type" => {
                        self.structural(&base, "primary constructors are not supported")
                    }
                    "comment" => {}
                    _ => bases.extend(self.type_reference(&base, scope.clone())),
                }
            }
        }
        let type_decl = TypeDecl {
            modifiers,
            attributes: type_attributes,
            generics,
            bases,
            members: Vec::new(),
            generic_scope: Default::default(),
            parts: vec![location.clone()],
        };
        let is_interface = node.kind() == "interface_declaration";
        let items = match field(&node, &["body"]) {
            Some(body) => self.members(body, context, &path, is_interface),
            None => Vec::new(),
        };
        let kind = if is_interface {
            DeclKind::Interface(type_decl)
        } else {
            DeclKind::Class(type_decl)
        };
        Some(TypeOutline {
            decl: Declaration {
                path,
                name,
                location,
                parent: None,
                kind,
            },
            items,
        })
    }

    fn type_parameters(&mut self, node: &Node<'t>) -> Vec<String> {
        let Some(list) = field(node, &["type_parameters"])
            .or_else(|| children_of_kind(node, "type_parameter_list").into_iter().next())
        else {
            return Vec::new();
        };
        children_of_kind(&list, "type_parameter")
            .iter()
            .map(|param| match field(param, &["name"]) {
                Some(name) => self.ident(&name),
                None => {
                    let text = self.text(param);
                    let last = text.split_whitespace().last().unwrap_or(text);
                    last.strip_prefix('@').unwrap_or(last).to_string()
                }
            })
            .collect()
    }

    fn enum_members(&mut self, body: &Node<'t>) -> Vec<EnumMember> {
        let mut members = Vec::new();
        for member in children_of_kind(body, "enum_member_declaration") {
            let Some(name) = self.name_of(&member) else {
                continue;
            };
            if !children_of_kind(&member, "attribute_list").is_empty() {
                self.attributes(&member);
            }
            let value = checks::value_after_equals(&member).map(|v| {
                let text = self.text(&v).trim().to_string();
                if !checks::is_constant_expression(&text) {
                    self.structural(&v, format!("enum value `{text}` is not a constant expression"));
                }
                text
            });
            members.push(EnumMember {
                name,
                value,
                location: self.location(&member),
            });
        }
        members
    }

    /// Parse the type written at `node`; structural diagnostics for shapes outside the dialect.
    fn type_reference(&mut self, node: &Node<'t>, scope: LexicalScope) -> Option<TypeReference> {
        match type_syntax::parse_type(self.text(node)) {
            Ok(syntax) => Some(TypeReference::unresolved(syntax, scope, self.location(node))),
            Err(message) => {
                self.structural(node, message);
                None
            }
        }
    }
}

impl Context {
    /// Namespace opened by a `namespace` block in this context: absolute at file level, relative inside another
    /// namespace.
    fn namespace_for(&self, declared: &QualifiedPath) -> QualifiedPath {
        if self.in_namespace {
            self.namespace.join(declared)
        } else {
            declared.clone()
        }
    }
}

#[cfg(test)]
mod tests;
