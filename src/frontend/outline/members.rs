//! Member outlining: fields, properties, methods, constructors, signals and nested types.

use gdunsharp_core::lang::attributes::{AttributeId, AttributeRole};
use gdunsharp_core::lang::modifiers::{self, ModifierId};
use gdunsharp_core::lang::{attributes, conventions};
use gdunsharp_syntax::Node;
use gdunsharp_syntax::node::{children_of_kind, field, named_children};

use super::checks::{is_simple_literal, value_after_equals};
use super::{Context, OutlineBuilder, OutlineItem};
use crate::frontend::model::{
    Accessor, DeclKind, Declaration, FieldDecl, MethodDecl, Parameter, PropertyDecl, QualifiedPath, SignalDecl,
    TypeReference, TypeSyntax,
};

impl<'t> OutlineBuilder<'t> {
    pub(super) fn members(
        &mut self,
        body: Node<'t>,
        context: &Context,
        owner: &QualifiedPath,
        in_interface: bool,
    ) -> Vec<OutlineItem> {
        let mut items = Vec::new();
        for child in named_children(&body) {
            match child.kind() {
                "field_declaration" => {
                    let fields = self.field_members(&child, context, owner);
                    items.extend(fields.into_iter().map(OutlineItem::Member));
                }
                "property_declaration" => items.extend(self.property(&child, context, owner).map(OutlineItem::Member)),
                "method_declaration" => {
                    let method = self.method(&child, context, owner, in_interface);
                    items.extend(method.map(OutlineItem::Member));
                }
                "constructor_declaration" => {
                    items.extend(self.constructor(&child, context, owner).map(OutlineItem::Member))
                }
                "delegate_declaration" => items.extend(self.signal(&child, context, owner).map(OutlineItem::Member)),
                "class_declaration" | "interface_declaration" | "enum_declaration" => {
                    if let Some(nested) = self.type_declaration(child, context, Some(owner)) {
                        items.push(OutlineItem::Type(nested));
                    }
                }
                "comment" | "preproc_region" | "preproc_endregion" => {}
                "event_field_declaration" | "event_declaration" => {
                    self.structural(&child, "events outside the engine signal system are not supported")
                }
                "operator_declaration" | "conversion_operator_declaration" => {
                    self.structural(&child, "operator overloads are not supported")
                }
                "indexer_declaration" => self.structural(&child, "indexers are not supported"),
                "destructor_declaration" => self.structural(&child, "finalizers are not supported"),
                "struct_declaration" | "record_declaration" | "record_struct_declaration" => {
                    self.structural(&child, "structs and records are not supported")
                }
                kind if kind.starts_with("preproc") => {
                    self.structural(&child, "preprocessor directives are not supported")
                }
                kind => self.structural(&child, format!("unsupported member `{kind}`")),
            }
        }
        items
    }

    /// Attributes allowed on a member with the given role; others are reported.
    fn member_attributes(&mut self, node: &Node<'t>, allowed: &[AttributeRole]) -> Vec<AttributeId> {
        let found = self.attributes(node);
        for id in &found {
            let role = attributes::role(*id);
            if role != AttributeRole::Ignored && !allowed.contains(&role) {
                self.structural(
                    node,
                    format!("attribute `[{}]` is not valid here", attributes::info_for(*id).canonical),
                );
            }
        }
        found
    }

    fn reject_explicit_interface(&mut self, node: &Node<'t>) -> bool {
        if !children_of_kind(node, "explicit_interface_specifier").is_empty() {
            self.structural(node, "explicit interface implementations are not supported");
            return true;
        }
        false
    }

    /// One declaration per declarator: `int a, b;` declares two fields.
    fn field_members(&mut self, node: &Node<'t>, context: &Context, owner: &QualifiedPath) -> Vec<Declaration> {
        let modifiers = self.modifiers(node);
        let attributes = self.member_attributes(node, &[AttributeRole::Export]);
        let Some(declaration) = children_of_kind(node, "variable_declaration").into_iter().next() else {
            self.structural(node, "malformed field declaration");
            return Vec::new();
        };
        let Some(type_node) = field(&declaration, &["type"]) else {
            self.structural(node, "field without a type");
            return Vec::new();
        };
        let scope = context.scope(Some(owner), None);
        let mut fields = Vec::new();
        for declarator in children_of_kind(&declaration, "variable_declarator") {
            let name = match field(&declarator, &["name"])
                .or_else(|| children_of_kind(&declarator, "identifier").into_iter().next())
            {
                Some(name) => self.ident(&name),
                None => continue,
            };
            if !children_of_kind(&declarator, "bracketed_argument_list").is_empty() {
                self.structural(&declarator, "fixed-size buffers are not supported");
                continue;
            }
            let Some(ty) = self.type_reference(&type_node, scope.clone()) else {
                continue;
            };
            let initializer = self.initializer(value_after_equals(&declarator));
            fields.push(Declaration {
                path: owner.child(name.clone()),
                name,
                location: self.location(&declarator),
                parent: None,
                kind: DeclKind::Field(FieldDecl {
                    modifiers: modifiers.clone(),
                    attributes: attributes.clone(),
                    ty,
                    initializer,
                }),
            });
        }
        fields
    }

    fn property(&mut self, node: &Node<'t>, context: &Context, owner: &QualifiedPath) -> Option<Declaration> {
        if self.reject_explicit_interface(node) {
            return None;
        }
        let modifiers = self.modifiers(node);
        let attributes = self.member_attributes(node, &[AttributeRole::Export]);
        let name = self.name_of(node)?;
        let type_node = field(node, &["type"])?;
        let ty = self.type_reference(&type_node, context.scope(Some(owner), None))?;

        let mut getter = None;
        let mut setter = None;
        let mut initializer_node = None;
        let value = field(node, &["value"]);
        match value {
            Some(arrow) if arrow.kind() == "arrow_expression_clause" => {
                self.scan_body(&arrow);
                getter = Some(Accessor {
                    body: Some(self.text(&arrow).to_string()),
                    init_only: false,
                });
            }
            other => initializer_node = other,
        }
        let accessors = field(node, &["accessors"]).or_else(|| children_of_kind(node, "accessor_list").into_iter().next());
        if let Some(list) = accessors {
            for accessor in children_of_kind(&list, "accessor_declaration") {
                let body = field(&accessor, &["body"])
                    .or_else(|| children_of_kind(&accessor, "block").into_iter().next())
                    .or_else(|| children_of_kind(&accessor, "arrow_expression_clause").into_iter().next());
                if let Some(body) = &body {
                    self.scan_body(body);
                }
                let body = body.map(|b| self.text(&b).to_string());
                match self.accessor_keyword(&accessor) {
                    Some("get") => getter = Some(Accessor { body, init_only: false }),
                    Some("set") => setter = Some(Accessor { body, init_only: false }),
                    Some("init") => setter = Some(Accessor { body, init_only: true }),
                    _ => self.structural(&accessor, "unsupported property accessor"),
                }
            }
        }
        let initializer = self.initializer(initializer_node);
        Some(Declaration {
            path: owner.child(name.clone()),
            name,
            location: self.location(node),
            parent: None,
            kind: DeclKind::Property(PropertyDecl {
                modifiers,
                attributes,
                ty,
                getter,
                setter,
                initializer,
            }),
        })
    }

    /// `get`, `set` or `init`, whether the grammar exposes it as a field or an anonymous token.
    fn accessor_keyword(&self, accessor: &Node<'t>) -> Option<&'static str> {
        let mut cursor = accessor.walk();
        let children: Vec<Node<'t>> = accessor.children(&mut cursor).collect();
        let keyword = field(accessor, &["name"]).map(|n| self.text(&n)).or_else(|| {
            children
                .iter()
                .map(|c| c.kind())
                .find(|k| matches!(*k, "get" | "set" | "init" | "add" | "remove"))
        })?;
        ["get", "set", "init"].into_iter().find(|k| *k == keyword)
    }

    fn method(
        &mut self,
        node: &Node<'t>,
        context: &Context,
        owner: &QualifiedPath,
        in_interface: bool,
    ) -> Option<Declaration> {
        if self.reject_explicit_interface(node) {
            return None;
        }
        let modifiers = self.modifiers(node);
        let attributes = self.member_attributes(node, &[]);
        let name = self.name_of(node)?;
        let generics = self.type_parameters(node);
        let return_node = field(node, &["returns", "type"])?;
        let body = self.body(node);
        if in_interface && modifiers.has(ModifierId::Static) {
            self.structural(node, "static interface members are not supported");
        }
        let (path, params) = self.signature(node, context, owner, &name, generics.len());
        let scope = context.scope(Some(owner), Some(&path));
        let return_type = self.type_reference(&return_node, scope)?;
        Some(Declaration {
            path,
            name,
            location: self.location(node),
            parent: None,
            kind: DeclKind::Method(MethodDecl {
                modifiers,
                attributes,
                return_type,
                generics,
                params,
                body,
                generic_scope: Default::default(),
            }),
        })
    }

    fn constructor(&mut self, node: &Node<'t>, context: &Context, owner: &QualifiedPath) -> Option<Declaration> {
        let modifiers = self.modifiers(node);
        if modifiers.has(ModifierId::Static) {
            self.structural(node, "static constructors are not supported");
            return None;
        }
        let attributes = self.member_attributes(node, &[]);
        let name = owner.simple_name().to_string();
        let (path, params) = self.signature(node, context, owner, &name, 0);
        let mut body = self.body(node);
        if let Some(initializer) = children_of_kind(node, "constructor_initializer").into_iter().next() {
            self.scan_body(&initializer);
            let chained = self.text(&initializer).to_string();
            body = Some(match body {
                Some(body) => format!("{chained}\n{body}"),
                None => chained,
            });
        }
        let return_type = TypeReference::unresolved(
            TypeSyntax::simple("void"),
            context.scope(Some(owner), Some(&path)),
            self.location(node),
        );
        Some(Declaration {
            path,
            name,
            location: self.location(node),
            parent: None,
            kind: DeclKind::Constructor(MethodDecl {
                modifiers,
                attributes,
                return_type,
                generics: Vec::new(),
                params,
                body,
                generic_scope: Default::default(),
            }),
        })
    }

    /// `[Signal] delegate void HitEventHandler(int damage);`
    fn signal(&mut self, node: &Node<'t>, context: &Context, owner: &QualifiedPath) -> Option<Declaration> {
        let attributes = self.member_attributes(node, &[AttributeRole::Signal]);
        if !attributes.contains(&AttributeId::Signal) {
            self.structural(node, "delegates are only supported as `[Signal]` declarations");
            return None;
        }
        self.modifiers(node);
        let delegate_name = self.name_of(node)?;
        let stripped = delegate_name
            .strip_suffix(conventions::SIGNAL_DELEGATE_SUFFIX)
            .filter(|n| !n.is_empty());
        let Some(name) = stripped else {
            self.structural(
                node,
                format!("signal delegate `{delegate_name}` must end in `{}`", conventions::SIGNAL_DELEGATE_SUFFIX),
            );
            return None;
        };
        let name = name.to_string();
        if let Some(returns) = field(node, &["returns", "type"]) {
            if self.text(&returns).trim() != "void" {
                self.structural(&returns, "signals must return `void`");
            }
        }
        if !self.type_parameters(node).is_empty() {
            self.structural(node, "generic signals are not supported");
        }
        let path = owner.child(name.clone());
        let params = self.parameters(node, context, owner, &path);
        Some(Declaration {
            path,
            name,
            location: self.location(node),
            parent: None,
            kind: DeclKind::Signal(SignalDecl { delegate_name, params }),
        })
    }

    /// Method body (block or expression form), scanned for refused constructs.
    fn body(&mut self, node: &Node<'t>) -> Option<String> {
        let body = field(node, &["body"])
            .or_else(|| children_of_kind(node, "block").into_iter().next())
            .or_else(|| children_of_kind(node, "arrow_expression_clause").into_iter().next())?;
        self.scan_body(&body);
        Some(self.text(&body).to_string())
    }

    /// Identity path (`Owner.Name(int,ref string)`) and parameters of a method or constructor.
    fn signature(
        &mut self,
        node: &Node<'t>,
        context: &Context,
        owner: &QualifiedPath,
        name: &str,
        arity: usize,
    ) -> (QualifiedPath, Vec<Parameter>) {
        let provisional = owner.child(name.to_string());
        let mut params = self.parameters(node, context, owner, &provisional);
        let signature: Vec<String> = params
            .iter()
            .map(|p| {
                let prefix = p
                    .modifiers
                    .iter()
                    .filter(|m| matches!(m, ModifierId::Ref | ModifierId::Out | ModifierId::In))
                    .map(|m| format!("{} ", modifiers::as_str(m)))
                    .collect::<String>();
                format!("{prefix}{}", p.ty.written())
            })
            .collect();
        let generic_suffix = if arity > 0 { format!("`{arity}") } else { String::new() };
        let path = owner.child(format!("{name}{generic_suffix}({})", signature.join(",")));
        // Parameter types were scoped to the provisional path; point them at the final one.
        for param in &mut params {
            if let TypeReference::Unresolved(unresolved) = &mut param.ty {
                unresolved.scope.member = Some(path.clone());
            }
        }
        (path, params)
    }

    fn parameters(
        &mut self,
        node: &Node<'t>,
        context: &Context,
        owner: &QualifiedPath,
        member: &QualifiedPath,
    ) -> Vec<Parameter> {
        let list = field(node, &["parameters"]).or_else(|| children_of_kind(node, "parameter_list").into_iter().next());
        let Some(list) = list else {
            return Vec::new();
        };
        let scope = context.scope(Some(owner), Some(member));
        let mut params = Vec::new();
        for param in named_children(&list) {
            if param.kind() == "comment" {
                continue;
            }
            if param.kind() != "parameter" {
                self.structural(&param, "unsupported parameter form");
                continue;
            }
            self.member_attributes(&param, &[]);
            let modifiers = self.modifiers(&param);
            let Some(name) = self.name_of(&param) else {
                continue;
            };
            let Some(type_node) = field(&param, &["type"]) else {
                self.structural(&param, "parameters without a type are not supported");
                continue;
            };
            let Some(ty) = self.type_reference(&type_node, scope.clone()) else {
                continue;
            };
            let default = match value_after_equals(&param) {
                Some(value) if is_simple_literal(&value) => Some(self.text(&value).to_string()),
                Some(value) => {
                    self.structural(&value, "only literal default values are supported");
                    None
                }
                None => None,
            };
            params.push(Parameter {
                name,
                ty,
                modifiers,
                default,
                location: self.location(&param),
            });
        }
        params
    }
}
