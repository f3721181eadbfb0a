//! Type mapper: resolved source types to target type spellings.
//!
//! The mapper is pure given the configuration and a model whose base types are already resolved (it needs them to
//! tell reference-counted user classes from plain ones).

use std::collections::HashSet;

use gdunsharp_core::lang::conventions::ENGINE_CPP_NAMESPACE;
use gdunsharp_core::lang::cpp_keywords;
use gdunsharp_core::lang::types::{ContainerTypeId, EngineTypeInfo, EngineTypeKind, StructuralRule, engine, primitives};

use crate::config::{ContainerRule, TypeMapConfig};
use crate::frontend::model::{CppType, DeclId, DeclKind, DeclaredSegment, ProjectModel, SourceType};

/// A resolved type the target cannot express.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct MapError(pub String);

#[derive(Debug, Clone, Copy)]
pub struct TypeMapper<'m> {
    model: &'m ProjectModel,
    config: &'m TypeMapConfig,
}

impl<'m> TypeMapper<'m> {
    pub fn new(model: &'m ProjectModel, config: &'m TypeMapConfig) -> Self {
        Self { model, config }
    }

    /// Target type a value of `ty` is held as: by value, through a pointer, or through `godot::Ref<>`.
    pub fn map(&self, ty: &SourceType) -> Result<CppType, MapError> {
        let spelled = match ty {
            SourceType::Void => "void".to_string(),
            SourceType::Primitive(id) => self
                .config
                .primitive_target(*id)
                .map(str::to_string)
                .ok_or_else(|| {
                    MapError(format!(
                        "type `{}` has no target mapping; map it under [type_map.primitives]",
                        primitives::as_str(*id)
                    ))
                })?,
            SourceType::Engine(info) => engine_handle(info),
            SourceType::Container { name, rule, args, .. } => self.container(name, *rule, args)?,
            SourceType::Array(element) => {
                self.template(StructuralRule::Sequence, std::slice::from_ref(element.as_ref()))?
            }
            SourceType::Nullable(inner) => {
                if !self.is_handle(inner) {
                    return Err(MapError(format!(
                        "nullable value type `{}?` is not supported",
                        self.describe(inner)
                    )));
                }
                return self.map(inner);
            }
            SourceType::Declared { segments } => {
                let name = self.declared_name(segments)?;
                let Some(id) = ty.declared_id() else {
                    return Err(MapError("empty type reference".to_string()));
                };
                match &self.model.decl(id).kind {
                    DeclKind::Enum(_) => name,
                    DeclKind::Class(_) => match engine_base(self.model, id) {
                        Some(base) if base.kind == EngineTypeKind::RefCounted => format!("godot::Ref<{name}>"),
                        _ => format!("{name} *"),
                    },
                    _ => format!("{name} *"),
                }
            }
            SourceType::GenericParam { emitted, .. } => emitted.clone(),
        };
        Ok(CppType::new(spelled))
    }

    /// Bare class name, as used in a base-specifier or inside `Ref<>`.
    pub fn class_name(&self, ty: &SourceType) -> Result<String, MapError> {
        match ty {
            SourceType::Engine(info) => Ok(info.cpp_name.to_string()),
            SourceType::Declared { segments } => self.declared_name(segments),
            other => Err(MapError(format!("`{}` cannot be used as a base type", self.describe(other)))),
        }
    }

    /// Fully qualified spelling of a project type, `typename`-prefixed when it depends on a template parameter.
    pub fn declared_name(&self, segments: &[DeclaredSegment]) -> Result<String, MapError> {
        let Some(first) = segments.first() else {
            return Err(MapError("empty type reference".to_string()));
        };
        let namespace = self.model.namespace_of(first.id);
        let mut parts: Vec<String> = namespace.segments().iter().map(|s| cpp_keywords::escape(s)).collect();
        for segment in segments {
            let mut part = cpp_keywords::escape(&self.model.decl(segment.id).name);
            if !segment.args.is_empty() {
                let args = segment
                    .args
                    .iter()
                    .map(|a| self.argument(a))
                    .collect::<Result<Vec<_>, _>>()?;
                part = format!("{part}<{}>", args.join(", "));
            }
            parts.push(part);
        }
        let dependent = segments[..segments.len() - 1]
            .iter()
            .flat_map(|s| s.args.iter())
            .any(is_dependent);
        let name = parts.join("::");
        Ok(if dependent { format!("typename {name}") } else { name })
    }

    fn container(&self, name: &str, rule: ContainerRule, args: &[SourceType]) -> Result<String, MapError> {
        let Some(structural) = rule.structural() else {
            return Err(MapError(format!(
                "container `{name}` is not mapped; give it a rule under [type_map.containers]"
            )));
        };
        if structural.arity() != args.len() {
            return Err(MapError(format!(
                "container `{name}` is mapped as a {} but has {} type argument(s)",
                rule_name(structural),
                args.len()
            )));
        }
        self.template(structural, args)
    }

    fn template(&self, rule: StructuralRule, args: &[SourceType]) -> Result<String, MapError> {
        let spec = self.config.template(rule);
        let args = args.iter().map(|a| self.argument(a)).collect::<Result<Vec<_>, _>>()?;
        Ok(format!("{}<{}>", spec.name, args.join(", ")))
    }

    fn argument(&self, arg: &SourceType) -> Result<String, MapError> {
        if *arg == SourceType::Void {
            return Err(MapError("`void` cannot be a type argument".to_string()));
        }
        Ok(self.map(arg)?.0)
    }

    /// Whether a type is held through a pointer or `Ref<>`, so a null state exists.
    pub fn is_handle(&self, ty: &SourceType) -> bool {
        match ty {
            SourceType::Engine(info) => engine::is_object_class(info),
            SourceType::Declared { .. } => ty
                .declared_id()
                .is_some_and(|id| !matches!(self.model.decl(id).kind, DeclKind::Enum(_))),
            _ => false,
        }
    }

    /// `godot::Variant::Type` tag for a type crossing the engine boundary, if it can.
    pub fn variant_type(&self, ty: &SourceType) -> Option<&'static str> {
        match ty {
            SourceType::Primitive(id) => primitives::info_for(*id).variant_type,
            SourceType::Engine(info) => Some(info.variant_type),
            SourceType::Container {
                builtin: Some(ContainerTypeId::GodotArray),
                ..
            } => Some("ARRAY"),
            SourceType::Container {
                builtin: Some(ContainerTypeId::GodotDictionary),
                ..
            } => Some("DICTIONARY"),
            SourceType::Nullable(inner) => self.variant_type(inner),
            SourceType::Declared { .. } => {
                let id = ty.declared_id()?;
                match &self.model.decl(id).kind {
                    DeclKind::Enum(_) => Some("INT"),
                    DeclKind::Class(_) => engine_base(self.model, id).map(|_| "OBJECT"),
                    _ => None,
                }
            }
            _ => None,
        }
    }

    /// Source spelling for messages; project types are shown by path.
    pub fn describe(&self, ty: &SourceType) -> String {
        match ty {
            SourceType::Declared { .. } => ty
                .declared_id()
                .map(|id| self.model.decl(id).path.to_string())
                .unwrap_or_default(),
            other => other.describe(),
        }
    }
}

fn engine_handle(info: &EngineTypeInfo) -> String {
    let name = info.cpp_name;
    match info.kind {
        EngineTypeKind::Value => name.to_string(),
        EngineTypeKind::Object => format!("{name} *"),
        EngineTypeKind::RefCounted => format!("{ENGINE_CPP_NAMESPACE}::Ref<{name}>"),
    }
}

fn rule_name(rule: StructuralRule) -> &'static str {
    match rule {
        StructuralRule::Sequence => "sequence",
        StructuralRule::Map => "map",
        StructuralRule::Set => "set",
    }
}

/// Whether a type mentions a template parameter.
pub fn is_dependent(ty: &SourceType) -> bool {
    let mut dependent = false;
    ty.walk(&mut |t| dependent |= matches!(t, SourceType::GenericParam { .. }));
    dependent
}

/// The engine object class a project class derives from, directly or through other project classes.
///
/// Only resolved bases are followed; a cycle yields `None`.
pub fn engine_base(model: &ProjectModel, id: DeclId) -> Option<&'static EngineTypeInfo> {
    let mut seen = HashSet::new();
    let mut current = id;
    while seen.insert(current) {
        let DeclKind::Class(ty) = &model.decl(current).kind else {
            return None;
        };
        let next = ty.bases.iter().find_map(|base| match base.source()? {
            SourceType::Engine(info) if engine::is_object_class(info) => Some(Err(*info)),
            SourceType::Declared { .. } => {
                let base_id = base.source()?.declared_id()?;
                matches!(model.decl(base_id).kind, DeclKind::Class(_)).then_some(Ok(base_id))
            }
            _ => None,
        })?;
        match next {
            Err(info) => return Some(info),
            Ok(base_id) => current = base_id,
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use gdunsharp_core::lang::types::PrimitiveTypeId;

    use super::*;
    use crate::config::MapImplementation;

    fn map(config: &TypeMapConfig, ty: &SourceType) -> Result<String, MapError> {
        let model = ProjectModel::new();
        TypeMapper::new(&model, config).map(ty).map(|t| t.0)
    }

    fn container(name: &str, builtin: Option<ContainerTypeId>, rule: ContainerRule, args: Vec<SourceType>) -> SourceType {
        SourceType::Container {
            name: name.into(),
            builtin,
            rule,
            args,
        }
    }

    const INT: SourceType = SourceType::Primitive(PrimitiveTypeId::Int);
    const STRING: SourceType = SourceType::Primitive(PrimitiveTypeId::String);

    #[test]
    fn primitives_use_defaults_and_overrides() {
        let config = TypeMapConfig::default();
        assert_eq!(map(&config, &INT).unwrap(), "int32_t");
        assert_eq!(map(&config, &STRING).unwrap(), "godot::String");
        let decimal = SourceType::Primitive(PrimitiveTypeId::Decimal);
        assert!(map(&config, &decimal).is_err());
        let config = config.with_primitive("decimal", "double");
        assert_eq!(map(&config, &decimal).unwrap(), "double");
    }

    #[test]
    fn engine_types_are_held_by_kind() {
        let config = TypeMapConfig::default();
        let node = SourceType::Engine(engine::from_str("Node2D").unwrap());
        let resource = SourceType::Engine(engine::from_str("Resource").unwrap());
        let vector = SourceType::Engine(engine::from_str("Vector2").unwrap());
        assert_eq!(map(&config, &node).unwrap(), "godot::Node2D *");
        assert_eq!(map(&config, &resource).unwrap(), "godot::Ref<godot::Resource>");
        assert_eq!(map(&config, &vector).unwrap(), "godot::Vector2");
        assert_eq!(map(&config, &SourceType::Nullable(Box::new(node))).unwrap(), "godot::Node2D *");
        assert!(map(&config, &SourceType::Nullable(Box::new(vector))).is_err());
    }

    #[test]
    fn containers_follow_rules_and_templates() {
        let config = TypeMapConfig::default();
        let dict = container(
            "System.Collections.Generic.Dictionary",
            Some(ContainerTypeId::Dictionary),
            ContainerRule::Map,
            vec![STRING, SourceType::Array(Box::new(INT))],
        );
        assert_eq!(
            map(&config, &dict).unwrap(),
            "godot::RBMap<godot::String, godot::Vector<int32_t>>"
        );
        let unordered = config.clone().with_map_implementation(MapImplementation::Unordered);
        assert!(map(&unordered, &dict).unwrap().starts_with("godot::HashMap<"));

        let remapped = container("Dictionary", None, ContainerRule::Sequence, vec![STRING, INT]);
        assert!(map(&config, &remapped).is_err());
        let unmapped = container("Queue", None, ContainerRule::Unmapped, vec![INT]);
        assert!(map(&config, &unmapped).is_err());
        let of_void = container("List", None, ContainerRule::Sequence, vec![SourceType::Void]);
        assert!(map(&config, &of_void).is_err());
    }

    #[test]
    fn variant_tags() {
        let model = ProjectModel::new();
        let config = TypeMapConfig::default();
        let mapper = TypeMapper::new(&model, &config);
        assert_eq!(mapper.variant_type(&INT), Some("INT"));
        let godot_array = container("Godot.Collections.Array", Some(ContainerTypeId::GodotArray), ContainerRule::Sequence, vec![INT]);
        assert_eq!(mapper.variant_type(&godot_array), Some("ARRAY"));
        let list = container("List", Some(ContainerTypeId::List), ContainerRule::Sequence, vec![INT]);
        assert_eq!(mapper.variant_type(&list), None);
        assert_eq!(mapper.variant_type(&SourceType::Primitive(PrimitiveTypeId::Decimal)), None);
    }

    #[test]
    fn dependence_is_detected_through_arguments() {
        let param = SourceType::GenericParam {
            name: "T".into(),
            emitted: "T".into(),
        };
        assert!(is_dependent(&SourceType::Array(Box::new(param))));
        assert!(!is_dependent(&INT));
    }
}
