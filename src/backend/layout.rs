//! Artifact paths.
//!
//! Paths mirror the namespace hierarchy (`Game.Ui.Menu` → `Game/Ui/Menu.hpp`) and are spelled with `/` so the same
//! string serves as an include path relative to the output root.

use crate::config::OutputConfig;
use crate::frontend::model::{DeclId, ProjectModel, QualifiedPath};

#[derive(Debug, Clone, Copy)]
pub struct Layout<'a> {
    model: &'a ProjectModel,
    output: &'a OutputConfig,
}

impl<'a> Layout<'a> {
    pub fn new(model: &'a ProjectModel, output: &'a OutputConfig) -> Self {
        Self { model, output }
    }

    fn in_namespace(namespace: &QualifiedPath, file: &str) -> String {
        if namespace.is_root() {
            file.to_string()
        } else {
            format!("{}/{file}", namespace.join_with("/"))
        }
    }

    /// Path stem of a top-level type's artifacts.
    fn stem(&self, top: DeclId) -> String {
        let decl = self.model.decl(top);
        Self::in_namespace(&self.model.namespace_of(top), &decl.name)
    }

    pub fn header(&self, top: DeclId) -> String {
        format!("{}.{}", self.stem(top), self.output.header_extension)
    }

    pub fn source(&self, top: DeclId) -> String {
        format!("{}.{}", self.stem(top), self.output.source_extension)
    }

    pub fn inline(&self, top: DeclId) -> String {
        format!("{}.{}", self.stem(top), self.output.inline_extension)
    }

    pub fn forward(&self, namespace: &QualifiedPath) -> String {
        Self::in_namespace(
            namespace,
            &format!("{}.{}", self.output.forward_header, self.output.header_extension),
        )
    }
}
