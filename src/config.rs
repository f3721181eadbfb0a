//! Translator configuration.
//!
//! Everything here has a default, so an empty TOML file (or no file at all) is a valid configuration. The type-map
//! section is the only one that changes translation semantics; the output section only changes file naming and
//! decoration.
//!
//! ## Examples
//!
//! ```rust
//! use gdunsharp::config::{MapImplementation, TranslatorConfig};
//!
//! let config = TranslatorConfig::from_toml_str(
//!     r#"
//!     [type_map]
//!     map_implementation = "unordered"
//!
//!     [type_map.primitives]
//!     decimal = "double"
//!     "#,
//! )
//! .unwrap();
//! assert_eq!(config.type_map.map_implementation, MapImplementation::Unordered);
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use gdunsharp_core::lang::types::containers::{self, ContainerTypeId};
use gdunsharp_core::lang::types::primitives::{self, PrimitiveTypeId};
use gdunsharp_core::lang::types::StructuralRule;
use serde::{Deserialize, Serialize};

/// Error loading a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TranslatorConfig {
    pub type_map: TypeMapConfig,
    pub output: OutputConfig,
}

impl TranslatorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn with_type_map(mut self, type_map: TypeMapConfig) -> Self {
        self.type_map = type_map;
        self
    }

    pub fn with_output(mut self, output: OutputConfig) -> Self {
        self.output = output;
        self
    }
}

/// Structural rule a container name maps through, as written in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerRule {
    Sequence,
    Map,
    Set,
    /// Known to the resolver but deliberately left without a mapping.
    Unmapped,
}

impl ContainerRule {
    pub fn structural(self) -> Option<StructuralRule> {
        match self {
            ContainerRule::Sequence => Some(StructuralRule::Sequence),
            ContainerRule::Map => Some(StructuralRule::Map),
            ContainerRule::Set => Some(StructuralRule::Set),
            ContainerRule::Unmapped => None,
        }
    }

    /// Type arguments the rule expects; unmapped containers accept any arity.
    pub fn arity(self) -> Option<usize> {
        self.structural().map(StructuralRule::arity)
    }
}

impl From<StructuralRule> for ContainerRule {
    fn from(rule: StructuralRule) -> Self {
        match rule {
            StructuralRule::Sequence => ContainerRule::Sequence,
            StructuralRule::Map => ContainerRule::Map,
            StructuralRule::Set => ContainerRule::Set,
        }
    }
}

/// Which target map template `Map` containers use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MapImplementation {
    #[default]
    Ordered,
    Unordered,
}

/// A target-language template and the header that declares it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateSpec {
    pub name: String,
    pub header: String,
}

impl TemplateSpec {
    pub fn new(name: impl Into<String>, header: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            header: header.into(),
        }
    }
}

/// Templates used by the structural container rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TemplateConfig {
    pub sequence: TemplateSpec,
    pub ordered_map: TemplateSpec,
    pub unordered_map: TemplateSpec,
    pub set: TemplateSpec,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            sequence: TemplateSpec::new("godot::Vector", "godot_cpp/templates/vector.hpp"),
            ordered_map: TemplateSpec::new("godot::RBMap", "godot_cpp/templates/rb_map.hpp"),
            unordered_map: TemplateSpec::new("godot::HashMap", "godot_cpp/templates/hash_map.hpp"),
            set: TemplateSpec::new("godot::HashSet", "godot_cpp/templates/hash_set.hpp"),
        }
    }
}

/// Options consumed by the type mapper.
///
/// ## Notes
/// - `primitives` is layered over the builtin registry: an entry overrides (or supplies) the target spelling for a
///   primitive keyword or its `System` alias. Primitives with neither a registry default nor an entry here stay
///   unmappable.
/// - `containers` keys are either simple (`List`) or namespace-qualified (`Godot.Collections.Array`) generic names.
///   A key that names no builtin container adds a new one, so `Queue = "sequence"` makes `Queue<T>` resolvable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TypeMapConfig {
    pub primitives: BTreeMap<String, String>,
    pub containers: BTreeMap<String, ContainerRule>,
    pub map_implementation: MapImplementation,
    pub templates: TemplateConfig,
}

impl TypeMapConfig {
    /// Target spelling for a primitive, after configuration overrides.
    pub fn primitive_target(&self, id: PrimitiveTypeId) -> Option<&str> {
        let info = primitives::info_for(id);
        std::iter::once(info.canonical)
            .chain(info.aliases.iter().copied())
            .find_map(|name| {
                self.primitives
                    .get(name)
                    .or_else(|| self.primitives.get(&format!("System.{name}")))
            })
            .map(String::as_str)
            .or(info.default_target)
    }

    /// Rule for a builtin container, after configuration overrides.
    pub fn container_rule(&self, id: ContainerTypeId) -> ContainerRule {
        let info = containers::info_for(id);
        self.containers
            .get(&containers::qualified_name(id))
            .or_else(|| self.containers.get(info.canonical))
            .copied()
            .unwrap_or_else(|| info.rule.into())
    }

    /// Rule for a generic name the builtin registry does not know.
    pub fn custom_container(&self, name: &str) -> Option<ContainerRule> {
        self.containers.get(name).copied()
    }

    /// Template for a structural rule.
    pub fn template(&self, rule: StructuralRule) -> &TemplateSpec {
        match (rule, self.map_implementation) {
            (StructuralRule::Sequence, _) => &self.templates.sequence,
            (StructuralRule::Set, _) => &self.templates.set,
            (StructuralRule::Map, MapImplementation::Ordered) => &self.templates.ordered_map,
            (StructuralRule::Map, MapImplementation::Unordered) => &self.templates.unordered_map,
        }
    }

    pub fn with_primitive(mut self, source: impl Into<String>, target: impl Into<String>) -> Self {
        self.primitives.insert(source.into(), target.into());
        self
    }

    pub fn with_container(mut self, name: impl Into<String>, rule: ContainerRule) -> Self {
        self.containers.insert(name.into(), rule);
        self
    }

    pub fn with_map_implementation(mut self, implementation: MapImplementation) -> Self {
        self.map_implementation = implementation;
        self
    }
}

/// Artifact naming and decoration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub header_extension: String,
    pub source_extension: String,
    pub inline_extension: String,
    /// File stem of the per-namespace forward-declaration header.
    pub forward_header: String,
    /// Emit the "generated from" banner comment.
    pub banner: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            header_extension: "hpp".to_string(),
            source_extension: "cpp".to_string(),
            inline_extension: "inl".to_string(),
            forward_header: gdunsharp_core::lang::conventions::FORWARD_HEADER_STEM.to_string(),
            banner: true,
        }
    }
}

impl OutputConfig {
    pub fn with_banner(mut self, banner: bool) -> Self {
        self.banner = banner;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_default() {
        let config = TranslatorConfig::from_toml_str("").unwrap();
        assert_eq!(config, TranslatorConfig::default());
    }

    #[test]
    fn default_primitives_come_from_registry() {
        let config = TypeMapConfig::default();
        assert_eq!(config.primitive_target(PrimitiveTypeId::Int), Some("int32_t"));
        assert_eq!(config.primitive_target(PrimitiveTypeId::Decimal), None);
    }

    #[test]
    fn primitive_override_matches_keyword_or_alias() {
        let config = TypeMapConfig::default()
            .with_primitive("decimal", "double")
            .with_primitive("System.Int32", "int");
        assert_eq!(config.primitive_target(PrimitiveTypeId::Decimal), Some("double"));
        assert_eq!(config.primitive_target(PrimitiveTypeId::Int), Some("int"));
    }

    #[test]
    fn container_rules_and_templates() {
        let config = TypeMapConfig::default()
            .with_container("HashSet", ContainerRule::Unmapped)
            .with_container("Queue", ContainerRule::Sequence)
            .with_map_implementation(MapImplementation::Unordered);
        assert_eq!(config.container_rule(ContainerTypeId::List), ContainerRule::Sequence);
        assert_eq!(config.container_rule(ContainerTypeId::HashSet), ContainerRule::Unmapped);
        assert_eq!(config.custom_container("Queue"), Some(ContainerRule::Sequence));
        assert_eq!(config.template(StructuralRule::Map).name, "godot::HashMap");
    }

    #[test]
    fn parses_full_file() {
        let config = TranslatorConfig::from_toml_str(
            r#"
            [type_map.containers]
            "Godot.Collections.Array" = "unmapped"

            [type_map.templates.sequence]
            name = "std::vector"
            header = "vector"

            [output]
            banner = false
            "#,
        )
        .unwrap();
        assert_eq!(config.type_map.container_rule(ContainerTypeId::GodotArray), ContainerRule::Unmapped);
        assert_eq!(config.type_map.templates.sequence.name, "std::vector");
        assert!(!config.output.banner);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(TranslatorConfig::from_toml_str("[type_map]\nbogus = 1\n").is_err());
    }
}
