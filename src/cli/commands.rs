//! Command implementations.

use std::fs;
use std::path::{Component, Path, PathBuf};

use walkdir::WalkDir;

use super::report::{self, SourceMap};
use super::{CliError, CliResult, ExitCode, Options, OutputFormat};
use crate::backend::write_artifacts;
use crate::config::TranslatorConfig;
use crate::diagnostics::Diagnostics;
use crate::frontend::model::QualifiedPath;
use crate::pipeline::{SourceUnit, Translator};

/// Maximum source file size (100 MB)
const MAX_SOURCE_SIZE: u64 = 100 * 1024 * 1024;

/// `.cs` files under `dir`, sorted by path.
pub fn discover(dir: &Path) -> CliResult<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(CliError::failure(format!("'{}' is not a directory", dir.display())));
    }
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).follow_links(true) {
        let entry = entry.map_err(|e| CliError::failure(format!("Cannot walk '{}': {e}", dir.display())))?;
        let path = entry.path();
        if entry.file_type().is_file() && path.extension().is_some_and(|ext| ext == "cs") {
            files.push(path.to_path_buf());
        }
    }
    files.sort();
    tracing::debug!(files = files.len(), dir = %dir.display(), "discovered sources");
    Ok(files)
}

/// Namespace for a file with no namespace declaration: `root` plus the file's directory relative to `dir`.
///
/// Directory names that are not identifiers (`my-ui`, `2D`) are escaped into one: other characters become `_`, and
/// a leading digit gets a `_` prefix.
pub fn namespace_context(dir: &Path, file: &Path, root: &QualifiedPath) -> QualifiedPath {
    let relative = file.strip_prefix(dir).unwrap_or(file);
    let mut namespace = root.clone();
    if let Some(parent) = relative.parent() {
        for component in parent.components() {
            if let Component::Normal(segment) = component {
                namespace = namespace.child(namespace_segment(&segment.to_string_lossy()));
            }
        }
    }
    namespace
}

fn namespace_segment(directory: &str) -> String {
    let mut segment: String = directory
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if !segment.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_') {
        segment.insert(0, '_');
    }
    if segment != directory {
        tracing::debug!(directory, namespace = %segment, "escaped directory name");
    }
    segment
}

/// `[A-Za-z_][A-Za-z0-9_]*`
fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Read source file contents.
pub fn read_source(path: &Path) -> CliResult<String> {
    let metadata =
        fs::metadata(path).map_err(|e| CliError::failure(format!("Cannot access file '{}': {e}", path.display())))?;
    if metadata.len() > MAX_SOURCE_SIZE {
        return Err(CliError::failure(format!(
            "File '{}' is too large ({} bytes, max {MAX_SOURCE_SIZE} bytes)",
            path.display(),
            metadata.len()
        )));
    }
    fs::read_to_string(path).map_err(|e| CliError::failure(format!("Cannot read file '{}': {e}", path.display())))
}

pub fn load_config(path: Option<&Path>) -> CliResult<TranslatorConfig> {
    match path {
        Some(path) => TranslatorConfig::load(path).map_err(|e| CliError::failure(format!("{e}"))),
        None => Ok(TranslatorConfig::default()),
    }
}

pub fn load_units(dir: &Path, options: &Options) -> CliResult<Vec<SourceUnit>> {
    let root = match options.root_namespace.as_deref() {
        Some(root) if !root.split('.').all(is_identifier) => {
            return Err(CliError::failure(format!("'{root}' is not a valid root namespace")));
        }
        Some(root) => QualifiedPath::parse(root),
        None => QualifiedPath::root(),
    };
    discover(dir)?
        .into_iter()
        .map(|path| {
            let source = read_source(&path)?;
            let namespace = namespace_context(dir, &path, &root);
            Ok(SourceUnit::new(path, source).with_namespace_context(namespace))
        })
        .collect()
}

/// Reject output paths that climb out of the working tree.
fn validate_output_dir(out: &Path) -> CliResult<()> {
    if out.components().any(|c| c == Component::ParentDir) {
        return Err(CliError::failure(format!(
            "Output directory '{}' contains path traversal (..)",
            out.display()
        )));
    }
    if out.is_absolute() {
        tracing::warn!("Using absolute output path: {}", out.display());
    }
    Ok(())
}

fn failure(diagnostics: Diagnostics, units: &[SourceUnit], format: OutputFormat) -> CliError {
    match format {
        OutputFormat::Json => {
            println!("{}", report::json(&diagnostics.into_vec()));
            CliError::new("", ExitCode::FAILURE)
        }
        OutputFormat::Human => {
            let sources: SourceMap = units.iter().map(|u| (u.path.clone(), u.source.clone())).collect();
            CliError::failure(report::human(&diagnostics, &sources))
        }
    }
}

pub fn translate(dir: &Path, out: &Path, options: &Options) -> CliResult<ExitCode> {
    validate_output_dir(out)?;
    let config = load_config(options.config.as_deref())?;
    let units = load_units(dir, options)?;
    if units.is_empty() {
        tracing::warn!("no .cs files found under {}", dir.display());
    }
    let artifacts = Translator::new(config)
        .translate(&units)
        .map_err(|diagnostics| failure(diagnostics, &units, options.format))?;
    write_artifacts(out, &artifacts)
        .map_err(|e| CliError::failure(format!("Cannot write output to '{}': {e}", out.display())))?;
    match options.format {
        OutputFormat::Json => println!("[]"),
        OutputFormat::Human => println!(
            "✓ Translated {} file(s) into {} artifact(s) in {}",
            units.len(),
            artifacts.len(),
            out.display()
        ),
    }
    Ok(ExitCode::SUCCESS)
}

pub fn check(dir: &Path, options: &Options) -> CliResult<ExitCode> {
    let config = load_config(options.config.as_deref())?;
    let units = load_units(dir, options)?;
    let artifacts = Translator::new(config)
        .translate(&units)
        .map_err(|diagnostics| failure(diagnostics, &units, options.format))?;
    match options.format {
        OutputFormat::Json => println!("[]"),
        OutputFormat::Human => println!(
            "✓ Check passed: {} file(s), {} artifact(s)",
            units.len(),
            artifacts.len()
        ),
    }
    Ok(ExitCode::SUCCESS)
}

pub fn dump_tree(file: &Path) -> CliResult<ExitCode> {
    let source = read_source(file)?;
    let tree = gdunsharp_syntax::parser::parse(file, &source).map_err(|e| CliError::failure(format!("{e}")))?;
    print!("{}", gdunsharp_syntax::dump::dump_tree(&tree));
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn namespace_context_appends_directories() {
        let root = QualifiedPath::parse("Game");
        let ns = namespace_context(Path::new("proj"), Path::new("proj/Ui/Menus/Main.cs"), &root);
        assert_eq!(ns, QualifiedPath::parse("Game.Ui.Menus"));
        let top = namespace_context(Path::new("proj"), Path::new("proj/Main.cs"), &QualifiedPath::root());
        assert!(top.is_root());
    }

    #[test]
    fn directories_that_are_not_identifiers_are_escaped() {
        let root = QualifiedPath::root();
        let ns = namespace_context(Path::new("proj"), Path::new("proj/my-ui/2D/Menu.cs"), &root);
        assert_eq!(ns, QualifiedPath::parse("my_ui._2D"));
        let kept = namespace_context(Path::new("proj"), Path::new("proj/_Shared/Ui2/A.cs"), &root);
        assert_eq!(kept, QualifiedPath::parse("_Shared.Ui2"));
    }

    #[test]
    fn output_dir_rejects_parent_components() {
        assert!(validate_output_dir(Path::new("../out")).is_err());
        assert!(validate_output_dir(Path::new("build/cpp")).is_ok());
    }
}
