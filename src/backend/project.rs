//! Project emission: every top-level type and every namespace forward header.

use std::fs;
use std::io;
use std::path::Path;

use rayon::prelude::*;

use crate::backend::emission::{self, EmitContext};
use crate::backend::render::{self, forward};
use crate::config::TranslatorConfig;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::frontend::model::{DeclId, ProjectModel};

/// One output file. `path` is relative to the output root and uses `/` separators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub path: String,
    pub contents: String,
}

/// Emit all artifacts of a resolved model, sorted by path.
#[tracing::instrument(skip_all, fields(types = tracing::field::Empty))]
pub fn emit_project(model: &ProjectModel, config: &TranslatorConfig) -> Result<Vec<Artifact>, Diagnostics> {
    let ctx = EmitContext::new(model, config);
    let tops = model.top_level_types();
    tracing::Span::current().record("types", tops.len());

    let results: Vec<Result<Vec<Artifact>, Diagnostic>> = tops.par_iter().map(|&top| emit_type(&ctx, top)).collect();
    let mut artifacts = Vec::new();
    let mut errors = Vec::new();
    for result in results {
        match result {
            Ok(unit) => artifacts.extend(unit),
            Err(diagnostic) => errors.push(diagnostic),
        }
    }
    if let Some(errors) = Diagnostics::from_vec(errors) {
        return Err(errors);
    }

    for namespace in model.root().walk() {
        if let Some(contents) = forward::render(&ctx, namespace) {
            artifacts.push(Artifact {
                path: ctx.layout.forward(&namespace.path),
                contents,
            });
        }
    }
    artifacts.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(artifacts)
}

fn emit_type(ctx: &EmitContext<'_>, top: DeclId) -> Result<Vec<Artifact>, Diagnostic> {
    let unit = emission::build_unit(ctx, top)?;
    tracing::debug!(path = %unit.header_path, inline = unit.inline, "emitting type");
    let rendered = render::render_unit(ctx, &unit);
    let mut artifacts = vec![Artifact {
        path: unit.header_path,
        contents: rendered.header,
    }];
    if let Some(contents) = rendered.definitions {
        artifacts.push(Artifact {
            path: unit.definition_path,
            contents,
        });
    }
    Ok(artifacts)
}

/// Write artifacts under `root`, creating directories as needed.
pub fn write_artifacts(root: &Path, artifacts: &[Artifact]) -> io::Result<()> {
    for artifact in artifacts {
        let path = root.join(&artifact.path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, &artifact.contents)?;
    }
    Ok(())
}
