//! Symbol table and namespace resolver.
//!
//! Answers "what does this written type name denote at this position" against the merged [`ProjectModel`]. The
//! table is read-only, so lookups for different references can run in parallel.
//!
//! ## Search order
//! 1. Generic parameters in scope (innermost first).
//! 2. Nested types of the enclosing type, then of each outer enclosing type.
//! 3. The enclosing namespaces, innermost to outermost.
//! 4. The global namespace.
//! 5. Namespaces imported with `using`, in source order.
//! 6. Builtin types: primitives, engine types and generic containers (dispatching on argument count).
//!
//! A `global::` name starts at the global namespace. A qualified name walks from its first segment, which is found
//! with the order above. Spelling a C# keyword type (`int`, `string`) always means the builtin.

use gdunsharp_core::lang::types::{self as builtin_types, PrimitiveTypeId, containers, engine, primitives};
use gdunsharp_syntax::SourceLocation;

use crate::config::TypeMapConfig;
use crate::diagnostics::Diagnostic;
use crate::frontend::generics;
use crate::frontend::model::{
    DeclId, DeclaredSegment, LexicalScope, NameSegment, NamedType, ProjectModel, QualifiedPath, SourceType,
    TypeSyntax,
};

/// Why a lookup failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error("cannot resolve type `{name}`")]
    Unresolved { name: String, searched: Vec<String> },
    #[error("{0}")]
    GenericScope(String),
}

impl LookupError {
    pub fn into_diagnostic(self, location: SourceLocation) -> Diagnostic {
        match self {
            LookupError::Unresolved { name, searched } => Diagnostic::unresolved(name, &searched, location),
            LookupError::GenericScope(message) => Diagnostic::generic_scope(message, location),
        }
    }
}

/// What the first segment of a name found.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Found {
    Type(DeclId),
    Namespace(QualifiedPath),
}

/// Read-only lookup view over a merged project.
#[derive(Debug, Clone, Copy)]
pub struct SymbolTable<'m> {
    model: &'m ProjectModel,
    config: &'m TypeMapConfig,
}

impl<'m> SymbolTable<'m> {
    pub fn new(model: &'m ProjectModel, config: &'m TypeMapConfig) -> Self {
        Self { model, config }
    }

    pub fn model(&self) -> &'m ProjectModel {
        self.model
    }

    /// Resolve a written type at a reference site.
    ///
    /// ## Errors
    ///
    /// - [`LookupError::Unresolved`] when no scope declares the name; it lists every scope searched.
    /// - [`LookupError::GenericScope`] for argument-count mismatches and misuse of generic parameters.
    pub fn resolve(&self, syntax: &TypeSyntax, scope: &LexicalScope) -> Result<SourceType, LookupError> {
        match syntax {
            TypeSyntax::Array(element) => Ok(SourceType::Array(Box::new(self.resolve(element, scope)?))),
            TypeSyntax::Nullable(inner) => Ok(SourceType::Nullable(Box::new(self.resolve(inner, scope)?))),
            TypeSyntax::Named(named) => self.named(named, scope),
        }
    }

    fn named(&self, named: &NamedType, scope: &LexicalScope) -> Result<SourceType, LookupError> {
        let Some(first) = named.segments.first() else {
            return Err(LookupError::Unresolved {
                name: String::new(),
                searched: Vec::new(),
            });
        };
        if !named.global && named.segments.len() == 1 {
            if let Some(keyword) = keyword_type(first) {
                return Ok(keyword);
            }
            if let Some(param) = generics::lookup_param(self.model, scope, &first.name) {
                if !first.args.is_empty() {
                    return Err(LookupError::GenericScope(format!(
                        "generic parameter `{}` does not take type arguments",
                        first.name
                    )));
                }
                return Ok(SourceType::GenericParam {
                    name: param.name.clone(),
                    emitted: param.emitted.clone(),
                });
            }
        }

        let mut searched = Vec::new();
        let declared = match self.find_first(&first.name, named.global, scope, &mut searched) {
            Some(found) => self.walk(found, named),
            None => None,
        };
        if let Some(written) = declared {
            return self.declared(&written, named, scope);
        }
        if let Some(builtin) = self.builtin(named, scope)? {
            return Ok(builtin);
        }
        searched.push("builtin types".to_string());
        Err(LookupError::Unresolved {
            name: named.to_string(),
            searched,
        })
    }

    /// Find the first segment of a name, recording each scope searched.
    fn find_first(&self, name: &str, global: bool, scope: &LexicalScope, searched: &mut Vec<String>) -> Option<Found> {
        if global {
            searched.push("global namespace".to_string());
            return self.in_namespace(&QualifiedPath::root(), name);
        }
        if let Some(enclosing) = scope.enclosing_type.as_ref().and_then(|p| self.model.lookup(p)) {
            for ty in self.model.type_chain(enclosing).into_iter().rev() {
                searched.push(format!("nested types of `{}`", self.model.decl(ty).path));
                if let Some(found) = self.model.nested_type(ty, name) {
                    return Some(Found::Type(found));
                }
            }
        }
        for namespace in scope.namespace.ancestors() {
            searched.push(if namespace.is_root() {
                "global namespace".to_string()
            } else {
                format!("namespace `{namespace}`")
            });
            if let Some(found) = self.in_namespace(&namespace, name) {
                return Some(found);
            }
        }
        for using in &scope.usings {
            searched.push(format!("using `{using}`"));
            if let Some(found) = self.model.type_in_namespace(using, name) {
                return Some(Found::Type(found));
            }
        }
        None
    }

    fn in_namespace(&self, namespace: &QualifiedPath, name: &str) -> Option<Found> {
        if let Some(id) = self.model.type_in_namespace(namespace, name) {
            return Some(Found::Type(id));
        }
        let child = namespace.child(name);
        self.model.namespace(&child).map(|_| Found::Namespace(child))
    }

    /// Follow the remaining segments of a name. Returns the type segments written, outermost first.
    fn walk<'n>(&self, found: Found, named: &'n NamedType) -> Option<Vec<(DeclId, &'n NameSegment)>> {
        let mut written = Vec::new();
        let mut current = found;
        for (i, segment) in named.segments.iter().enumerate() {
            if i > 0 {
                current = match current {
                    Found::Type(owner) => Found::Type(self.model.nested_type(owner, &segment.name)?),
                    Found::Namespace(namespace) => self.in_namespace(&namespace, &segment.name)?,
                };
            }
            match &current {
                Found::Type(id) => written.push((*id, segment)),
                Found::Namespace(_) if !segment.args.is_empty() => return None,
                Found::Namespace(_) => {}
            }
        }
        matches!(current, Found::Type(_)).then_some(written)
    }

    /// Build a declared type, threading implicit outer type arguments and checking argument counts.
    fn declared(
        &self,
        written: &[(DeclId, &NameSegment)],
        named: &NamedType,
        scope: &LexicalScope,
    ) -> Result<SourceType, LookupError> {
        let Some(&(target, _)) = written.last() else {
            return Err(LookupError::Unresolved {
                name: named.to_string(),
                searched: Vec::new(),
            });
        };
        let chain = self.model.type_chain(target);
        let first_written = written[0].0;
        let implicit = chain.iter().take_while(|&&id| id != first_written);

        let text = named.to_string();
        let mut segments = Vec::with_capacity(chain.len());
        for &outer in implicit {
            let args = generics::implicit_outer_args(self.model, outer, scope, &text).map_err(LookupError::GenericScope)?;
            segments.push(DeclaredSegment { id: outer, args });
        }
        for &(id, segment) in written {
            let args = self.args(&segment.args, scope)?;
            generics::check_arity(self.model, id, args.len()).map_err(LookupError::GenericScope)?;
            segments.push(DeclaredSegment { id, args });
        }
        Ok(SourceType::Declared { segments })
    }

    fn args(&self, args: &[TypeSyntax], scope: &LexicalScope) -> Result<Vec<SourceType>, LookupError> {
        args.iter().map(|arg| self.resolve(arg, scope)).collect()
    }

    /// Builtin lookup, the last step of the search.
    fn builtin(&self, named: &NamedType, scope: &LexicalScope) -> Result<Option<SourceType>, LookupError> {
        let Some(last) = named.last() else {
            return Ok(None);
        };
        if named.segments[..named.segments.len() - 1]
            .iter()
            .any(|s| !s.args.is_empty())
        {
            return Ok(None);
        }
        let qualifier = named.qualifier();
        let dotted = if qualifier.is_empty() {
            last.name.clone()
        } else {
            format!("{qualifier}.{}", last.name)
        };
        let builtin_namespace = qualifier.is_empty() || builtin_types::is_builtin_namespace(&qualifier);
        let arity = last.args.len();

        if arity > 0 {
            let registered = if !builtin_namespace {
                None
            } else if qualifier.is_empty() {
                containers::from_str(&last.name, arity)
            } else {
                containers::from_qualified(&qualifier, &last.name, arity)
            };
            if let Some(id) = registered {
                return Ok(Some(SourceType::Container {
                    name: containers::qualified_name(id),
                    builtin: Some(id),
                    rule: self.config.container_rule(id),
                    args: self.args(&last.args, scope)?,
                }));
            }
            if let Some(rule) = self.config.custom_container(&dotted) {
                return Ok(Some(SourceType::Container {
                    name: dotted,
                    builtin: None,
                    rule,
                    args: self.args(&last.args, scope)?,
                }));
            }
        }
        if !builtin_namespace {
            return Ok(None);
        }
        if arity == 0 {
            let primitive = match qualifier.as_str() {
                "" => primitives::from_str(&last.name),
                "System" => primitives::from_str(&dotted),
                _ => None,
            };
            if let Some(id) = primitive {
                return Ok(Some(primitive_type(id)));
            }
            if qualifier.is_empty() || qualifier == "Godot" {
                if let Some(info) = engine::from_str(&last.name) {
                    return Ok(Some(SourceType::Engine(info)));
                }
            }
        }
        self.arity_mismatch(&last.name, arity)?;
        Ok(None)
    }

    /// A builtin name used with the wrong number of type arguments; `Ok` when the name is not builtin at all.
    fn arity_mismatch(&self, name: &str, arity: usize) -> Result<(), LookupError> {
        let mut expected: Vec<usize> = containers::CONTAINER_TYPES
            .iter()
            .filter(|t| t.canonical == name || t.aliases.contains(&name))
            .map(|t| t.rule.arity())
            .chain(
                (primitives::from_str(name).is_some() || engine::from_str(name).is_some())
                    .then_some(0),
            )
            .collect();
        if expected.is_empty() {
            return Ok(());
        }
        expected.sort_unstable();
        expected.dedup();
        let expected: Vec<String> = expected.iter().map(usize::to_string).collect();
        Err(LookupError::GenericScope(format!(
            "`{name}` takes {} type argument(s), found {arity}",
            expected.join(" or ")
        )))
    }
}

/// C# keyword types cannot be shadowed by declarations.
fn keyword_type(segment: &NameSegment) -> Option<SourceType> {
    if !segment.args.is_empty() {
        return None;
    }
    primitives::PRIMITIVE_TYPES
        .iter()
        .find(|t| t.canonical == segment.name)
        .map(|t| primitive_type(t.id))
}

fn primitive_type(id: PrimitiveTypeId) -> SourceType {
    match id {
        PrimitiveTypeId::Void => SourceType::Void,
        id => SourceType::Primitive(id),
    }
}

#[cfg(test)]
mod tests {
    use gdunsharp_core::lang::types::ContainerTypeId;
    use gdunsharp_syntax::parser::parse;

    use super::*;
    use crate::config::ContainerRule;
    use crate::frontend::merge::merge;
    use crate::frontend::outline::{build_outline, type_syntax::parse_type};

    fn model(files: &[&str]) -> ProjectModel {
        let outlines = files
            .iter()
            .enumerate()
            .map(|(i, source)| build_outline(&parse(format!("F{i}.cs"), source).unwrap(), &QualifiedPath::root()))
            .collect();
        let mut model = merge(outlines).unwrap();
        generics::build_scopes(&mut model);
        model
    }

    fn scope(namespace: &str, enclosing: Option<&str>) -> LexicalScope {
        LexicalScope {
            namespace: QualifiedPath::parse(namespace),
            enclosing_type: enclosing.map(QualifiedPath::parse),
            ..Default::default()
        }
    }

    fn resolve(model: &ProjectModel, text: &str, at: &LexicalScope) -> Result<SourceType, LookupError> {
        let config = TypeMapConfig::default();
        SymbolTable::new(model, &config).resolve(&parse_type(text).unwrap(), at)
    }

    fn path_of(model: &ProjectModel, ty: &SourceType) -> String {
        model.decl(ty.declared_id().unwrap()).path.to_string()
    }

    #[test]
    fn sibling_namespaces_resolve_through_the_global_namespace() {
        let m = model(&["namespace A { class Foo { } }", "namespace B { class Bar { } }"]);
        let found = resolve(&m, "B.Bar", &scope("A", Some("A.Foo"))).unwrap();
        assert_eq!(path_of(&m, &found), "B.Bar");
    }

    #[test]
    fn nested_types_win_over_namespace_types() {
        let m = model(&["namespace N { class Item { } class Bag { class Item { } Item held; } }"]);
        let found = resolve(&m, "Item", &scope("N", Some("N.Bag"))).unwrap();
        assert_eq!(path_of(&m, &found), "N.Bag.Item");
        let outside = resolve(&m, "Item", &scope("N", None)).unwrap();
        assert_eq!(path_of(&m, &outside), "N.Item");
    }

    #[test]
    fn inner_namespaces_are_searched_before_outer_ones() {
        let m = model(&["namespace Game { class Util { } } namespace Game.Ui { class Util { } class Menu { } }"]);
        let found = resolve(&m, "Util", &scope("Game.Ui", Some("Game.Ui.Menu"))).unwrap();
        assert_eq!(path_of(&m, &found), "Game.Ui.Util");
    }

    #[test]
    fn project_types_shadow_engine_types_but_not_keywords() {
        let m = model(&["namespace N { class Timer { } class String { } }"]);
        let at = scope("N", None);
        assert_eq!(path_of(&m, &resolve(&m, "Timer", &at).unwrap()), "N.Timer");
        assert_eq!(path_of(&m, &resolve(&m, "String", &at).unwrap()), "N.String");
        assert_eq!(resolve(&m, "string", &at).unwrap(), SourceType::Primitive(PrimitiveTypeId::String));
        assert!(matches!(resolve(&m, "Godot.Timer", &at).unwrap(), SourceType::Engine(info) if info.name == "Timer"));
    }

    #[test]
    fn using_directives_are_searched_after_the_global_namespace() {
        let m = model(&["namespace Lib { class Helper { } }", "namespace App { class Main { } }"]);
        let mut at = scope("App", Some("App.Main"));
        assert!(resolve(&m, "Helper", &at).is_err());
        at.usings.push(QualifiedPath::parse("Lib"));
        assert_eq!(path_of(&m, &resolve(&m, "Helper", &at).unwrap()), "Lib.Helper");
    }

    #[test]
    fn unresolved_names_list_every_scope_searched() {
        let m = model(&["namespace NamespaceA { class Foo { } }"]);
        let err = resolve(&m, "Quux", &scope("NamespaceA", Some("NamespaceA.Foo"))).unwrap_err();
        assert_eq!(
            err,
            LookupError::Unresolved {
                name: "Quux".into(),
                searched: vec![
                    "nested types of `NamespaceA.Foo`".into(),
                    "namespace `NamespaceA`".into(),
                    "global namespace".into(),
                    "builtin types".into(),
                ],
            }
        );
    }

    #[test]
    fn builtin_containers_dispatch_on_argument_count() {
        let m = model(&["namespace N { class C { } }"]);
        let at = scope("N", None);
        let Ok(SourceType::Container { builtin, args, .. }) = resolve(&m, "Dictionary<string, C>", &at) else {
            panic!("expected a container");
        };
        assert_eq!(builtin, Some(ContainerTypeId::Dictionary));
        assert_eq!(path_of(&m, &args[1]), "N.C");
        assert!(matches!(resolve(&m, "Godot.Collections.Array<int>", &at), Ok(SourceType::Container { builtin: Some(ContainerTypeId::GodotArray), .. })));
        assert!(matches!(resolve(&m, "Array", &at), Ok(SourceType::Engine(_))));
        assert!(matches!(resolve(&m, "List<int, int>", &at), Err(LookupError::GenericScope(_))));
        assert!(matches!(resolve(&m, "int<string>", &at), Err(LookupError::Unresolved { .. }) | Err(LookupError::GenericScope(_))));
    }

    #[test]
    fn configured_custom_containers_resolve() {
        let m = model(&["namespace N { class C { } }"]);
        let config = TypeMapConfig::default().with_container("Queue", ContainerRule::Sequence);
        let table = SymbolTable::new(&m, &config);
        let found = table.resolve(&parse_type("Queue<int>").unwrap(), &scope("N", None)).unwrap();
        assert!(matches!(found, SourceType::Container { builtin: None, rule: ContainerRule::Sequence, .. }));
    }

    #[test]
    fn generic_parameters_are_found_first_and_reject_arguments() {
        let m = model(&["namespace N { class T { } class Box<T> { T item; } }"]);
        let at = scope("N", Some("N.Box"));
        assert!(matches!(resolve(&m, "T", &at), Ok(SourceType::GenericParam { .. })));
        assert!(matches!(resolve(&m, "T<int>", &at), Err(LookupError::GenericScope(_))));
        assert!(matches!(resolve(&m, "Box", &at), Err(LookupError::GenericScope(_))));
        assert!(resolve(&m, "Box<int>", &at).is_ok());
    }

    #[test]
    fn nested_references_carry_outer_arguments() {
        let m = model(&["namespace N { class Outer<T> { class Inner { } Inner a; } class Other { } }"]);
        let inside = resolve(&m, "Inner", &scope("N", Some("N.Outer"))).unwrap();
        let SourceType::Declared { segments } = &inside else {
            panic!("expected a declared type");
        };
        assert_eq!(segments.len(), 2);
        assert_eq!(
            segments[0].args,
            vec![SourceType::GenericParam {
                name: "T".into(),
                emitted: "T".into()
            }]
        );
        let spelled = resolve(&m, "Outer<int>.Inner", &scope("N", Some("N.Other"))).unwrap();
        let SourceType::Declared { segments } = &spelled else {
            panic!("expected a declared type");
        };
        assert_eq!(segments[0].args, vec![SourceType::Primitive(PrimitiveTypeId::Int)]);
        assert!(matches!(resolve(&m, "Outer.Inner", &scope("N", Some("N.Other"))), Err(LookupError::GenericScope(_))));
    }

    #[test]
    fn global_qualifier_skips_enclosing_scopes() {
        let m = model(&["class Foo { } namespace N { class Foo { } class User { } }"]);
        let at = scope("N", Some("N.User"));
        assert_eq!(path_of(&m, &resolve(&m, "Foo", &at).unwrap()), "N.Foo");
        assert_eq!(path_of(&m, &resolve(&m, "global::Foo", &at).unwrap()), "Foo");
    }
}
