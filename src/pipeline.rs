//! The translation pipeline: source files in, C++ artifacts out.
//!
//! ## Phases
//! 1. Parse and outline every file in parallel.
//! 2. Merge the outlines into one project model.
//! 3. Resolve every type reference (bases first) and validate the result.
//! 4. Emit artifacts for every top-level type and namespace.
//!
//! A run is all-or-nothing: if any phase reports a diagnostic no artifact is produced. Each phase still finishes its
//! own work first, so one run reports every problem the phase can see.

use std::path::PathBuf;

use rayon::prelude::*;

use crate::backend::{self, Artifact};
use crate::config::TranslatorConfig;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::frontend::merge::merge;
use crate::frontend::model::{ProjectModel, QualifiedPath};
use crate::frontend::outline::{FileOutline, build_outline};
use crate::frontend::resolve::resolve;

/// One source file handed to the translator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUnit {
    pub path: PathBuf,
    pub source: String,
    /// Namespace for declarations outside any `namespace` block.
    pub namespace_context: QualifiedPath,
}

impl SourceUnit {
    pub fn new(path: impl Into<PathBuf>, source: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            source: source.into(),
            namespace_context: QualifiedPath::root(),
        }
    }

    pub fn with_namespace_context(mut self, namespace: QualifiedPath) -> Self {
        self.namespace_context = namespace;
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct Translator {
    config: TranslatorConfig,
}

impl Translator {
    pub fn new(config: TranslatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TranslatorConfig {
        &self.config
    }

    /// Parse and outline every file. Parse failures are reported together with the other files' outline
    /// diagnostics.
    pub fn outline(&self, units: &[SourceUnit]) -> Result<Vec<FileOutline>, Diagnostics> {
        let (outlines, mut errors) = self.parse_and_outline(units);
        if !errors.is_empty() {
            errors.extend(outlines.iter().flat_map(|o| o.diagnostics.iter().cloned()));
        }
        match Diagnostics::from_vec(errors) {
            Some(errors) => Err(errors),
            None => Ok(outlines),
        }
    }

    /// Outline, merge and resolve: the fully resolved project model.
    ///
    /// Files that fail to parse still let the others merge, so collisions among them are reported in the same run.
    pub fn analyze(&self, units: &[SourceUnit]) -> Result<ProjectModel, Diagnostics> {
        let (outlines, parse_errors) = self.parse_and_outline(units);
        let merged = merge(outlines);
        if let Some(mut errors) = Diagnostics::from_vec(parse_errors) {
            if let Err(merge_errors) = merged {
                errors.append(merge_errors);
            }
            return Err(errors);
        }
        let mut model = merged?;
        resolve(&mut model, &self.config.type_map)?;
        Ok(model)
    }

    /// Outlines of every file that parsed, plus one diagnostic per file that did not.
    #[tracing::instrument(skip_all, fields(files = units.len()))]
    fn parse_and_outline(&self, units: &[SourceUnit]) -> (Vec<FileOutline>, Vec<Diagnostic>) {
        let results: Vec<Result<FileOutline, Diagnostic>> = units
            .par_iter()
            .map(|unit| {
                let tree = gdunsharp_syntax::parser::parse(&unit.path, &unit.source)?;
                tracing::debug!(file = %unit.path.display(), "outlining");
                Ok(build_outline(&tree, &unit.namespace_context))
            })
            .collect();

        let mut outlines = Vec::with_capacity(results.len());
        let mut parse_errors = Vec::new();
        for result in results {
            match result {
                Ok(outline) => outlines.push(outline),
                Err(diagnostic) => parse_errors.push(diagnostic),
            }
        }
        (outlines, parse_errors)
    }

    /// Translate a whole project.
    #[tracing::instrument(skip_all, fields(files = units.len()))]
    pub fn translate(&self, units: &[SourceUnit]) -> Result<Vec<Artifact>, Diagnostics> {
        let model = self.analyze(units)?;
        let artifacts = backend::emit_project(&model, &self.config)?;
        tracing::info!(artifacts = artifacts.len(), "translation finished");
        Ok(artifacts)
    }
}
