//! Diagnostic rendering for the terminal (miette) and for tools (JSON).

use std::collections::HashMap;
use std::path::PathBuf;

use miette::{LabeledSpan, MietteDiagnostic, NamedSource, Report, Severity};

use crate::diagnostics::{Diagnostic, Diagnostics};

/// Source text by path, for snippets.
pub type SourceMap = HashMap<PathBuf, String>;

/// Every diagnostic as an annotated snippet, in presentation order.
pub fn human(diagnostics: &Diagnostics, sources: &SourceMap) -> String {
    let mut out = String::new();
    for diagnostic in diagnostics.iter() {
        out.push_str(&format!("{:?}\n", snippet(diagnostic, sources)));
    }
    out.push_str(&summary(diagnostics));
    out
}

fn snippet(diagnostic: &Diagnostic, sources: &SourceMap) -> Report {
    let location = &diagnostic.location;
    let text = sources.get(&location.file).filter(|_| location.line > 0);
    let message = match text {
        Some(_) => diagnostic.message.clone(),
        None => format!("{location}: {}", diagnostic.message),
    };
    let mut report = MietteDiagnostic::new(message)
        .with_code(diagnostic.kind.code())
        .with_severity(Severity::Error);
    if !diagnostic.notes.is_empty() {
        report = report.with_help(diagnostic.notes.join("\n"));
    }
    let Some(text) = text else {
        return Report::new(report);
    };
    let mut labels = vec![LabeledSpan::at(
        location.span.start..location.span.end,
        diagnostic.kind.to_string(),
    )];
    labels.extend(
        diagnostic
            .related
            .iter()
            .filter(|r| r.file == location.file && r.line > 0)
            .map(|r| LabeledSpan::at(r.span.start..r.span.end, "related declaration")),
    );
    Report::new(report.with_labels(labels))
        .with_source_code(NamedSource::new(location.file.display().to_string(), text.clone()))
}

fn summary(diagnostics: &Diagnostics) -> String {
    match diagnostics.len() {
        1 => "error: translation failed with 1 diagnostic".to_string(),
        n => format!("error: translation failed with {n} diagnostics"),
    }
}

/// Diagnostics as a JSON array.
pub fn json(diagnostics: &[Diagnostic]) -> String {
    let items: Vec<serde_json::Value> = diagnostics
        .iter()
        .map(|d| {
            serde_json::json!({
                "kind": d.kind.code(),
                "message": d.message,
                "file": d.location.file.display().to_string(),
                "line": d.location.line,
                "column": d.location.column,
                "notes": d.notes,
                "related": d.related.iter().map(ToString::to_string).collect::<Vec<_>>(),
            })
        })
        .collect();
    serde_json::to_string_pretty(&items).unwrap_or_else(|_| "[]".to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use gdunsharp_syntax::{SourceLocation, Span};

    #[test]
    fn json_lists_every_field() {
        let d = Diagnostic::unresolved(
            "Quux",
            &["global namespace".to_string(), "builtin types".to_string()],
            SourceLocation::new("A.cs", 3, 5, Span::new(20, 24)),
        );
        let value: serde_json::Value = serde_json::from_str(&json(&[d])).unwrap();
        assert_eq!(value[0]["kind"], "unresolved-type");
        assert_eq!(value[0]["line"], 3);
        assert_eq!(value[0]["notes"][0], "searched: global namespace, builtin types");
    }
}
