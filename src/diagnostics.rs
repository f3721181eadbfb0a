//! Structured diagnostics produced by the translation pipeline.
//!
//! Every phase accumulates [`Diagnostic`]s instead of stopping at the first problem and returns them as one
//! [`Diagnostics`] collection, so a single run reports every problem in the project. The core never prints: turning a
//! diagnostic into terminal output (or JSON) is the CLI's job.
//!
//! ## Notes
//! - [`DiagnosticKind`] is the whole error taxonomy. `Parse` covers files the parser adapter could not turn into a
//!   clean tree; the other five kinds are the translator's own.
//! - `related` carries secondary locations, such as the first declaration in a duplicate pair.

use std::fmt;

use gdunsharp_syntax::{ParseError, SourceLocation};

/// Category of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DiagnosticKind {
    /// The file could not be parsed cleanly.
    Parse,
    /// A construct deliberately outside the translatable dialect (tuples, `async`, reflection, ...).
    StructuralUnsupported,
    /// Two declarations share one qualified path.
    DuplicateDeclaration,
    /// A type name was not found in any scope.
    UnresolvedType,
    /// A type resolved but has no mapping into the target language.
    UnsupportedType,
    /// A generic substitution is ambiguous or cannot be satisfied.
    GenericScope,
}

impl DiagnosticKind {
    /// Stable machine-readable code.
    pub fn code(self) -> &'static str {
        match self {
            DiagnosticKind::Parse => "parse",
            DiagnosticKind::StructuralUnsupported => "structural-unsupported",
            DiagnosticKind::DuplicateDeclaration => "duplicate-declaration",
            DiagnosticKind::UnresolvedType => "unresolved-type",
            DiagnosticKind::UnsupportedType => "unsupported-type",
            DiagnosticKind::GenericScope => "generic-scope",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::Parse => write!(f, "parse error"),
            DiagnosticKind::StructuralUnsupported => write!(f, "unsupported construct"),
            DiagnosticKind::DuplicateDeclaration => write!(f, "duplicate declaration"),
            DiagnosticKind::UnresolvedType => write!(f, "unresolved type"),
            DiagnosticKind::UnsupportedType => write!(f, "unsupported type"),
            DiagnosticKind::GenericScope => write!(f, "generic scope error"),
        }
    }
}

/// One problem found during translation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{location}: {kind}: {message}")]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    pub location: SourceLocation,
    pub related: Vec<SourceLocation>,
    pub notes: Vec<String>,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, message: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            kind,
            message: message.into(),
            location,
            related: Vec::new(),
            notes: Vec::new(),
        }
    }

    pub fn structural(message: impl Into<String>, location: SourceLocation) -> Self {
        Self::new(DiagnosticKind::StructuralUnsupported, message, location)
    }

    /// Collision between two declarations of `path`; `second` is reported, `first` is attached as related.
    pub fn duplicate(path: impl fmt::Display, first: SourceLocation, second: SourceLocation) -> Self {
        Self::new(
            DiagnosticKind::DuplicateDeclaration,
            format!("`{path}` is declared more than once"),
            second,
        )
        .with_note(format!("first declared at {first}"))
        .with_related(first)
    }

    /// A type name that no scope could resolve; every scope searched is listed in the notes.
    pub fn unresolved(name: impl fmt::Display, searched: &[String], location: SourceLocation) -> Self {
        let mut diagnostic = Self::new(
            DiagnosticKind::UnresolvedType,
            format!("cannot resolve type `{name}`"),
            location,
        );
        diagnostic
            .notes
            .push(format!("searched: {}", searched.join(", ")));
        diagnostic
    }

    pub fn unsupported_type(message: impl Into<String>, location: SourceLocation) -> Self {
        Self::new(DiagnosticKind::UnsupportedType, message, location)
    }

    pub fn generic_scope(message: impl Into<String>, location: SourceLocation) -> Self {
        Self::new(DiagnosticKind::GenericScope, message, location)
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_related(mut self, location: SourceLocation) -> Self {
        self.related.push(location);
        self
    }

    /// Presentation order: by location, then kind, then message.
    fn sort_key(&self) -> (&SourceLocation, DiagnosticKind, &str) {
        (&self.location, self.kind, &self.message)
    }
}

impl From<ParseError> for Diagnostic {
    fn from(error: ParseError) -> Self {
        let location = match &error {
            ParseError::Syntax { location, .. } => location.clone(),
            ParseError::NoTree(path) => SourceLocation::synthetic(path.clone()),
            ParseError::Grammar(_) => SourceLocation::default(),
        };
        let message = match &error {
            ParseError::Syntax { snippet, .. } => format!("syntax error near `{snippet}`"),
            other => other.to_string(),
        };
        Diagnostic::new(DiagnosticKind::Parse, message, location)
    }
}

/// Non-empty, ordered collection of diagnostics returned by a failing phase.
///
/// ## Examples
///
/// ```rust
/// use gdunsharp::diagnostics::{Diagnostic, Diagnostics, DiagnosticKind};
/// use gdunsharp_syntax::SourceLocation;
///
/// let errors = Diagnostics::from_vec(vec![Diagnostic::structural(
///     "tuple types are not supported",
///     SourceLocation::synthetic("A.cs"),
/// )])
/// .unwrap();
/// assert_eq!(errors.len(), 1);
/// assert_eq!(errors.first().unwrap().kind, DiagnosticKind::StructuralUnsupported);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    /// Wrap a single diagnostic.
    pub fn single(diagnostic: Diagnostic) -> Self {
        Self(vec![diagnostic])
    }

    /// Collect diagnostics, sorted into presentation order.
    ///
    /// ## Returns
    ///
    /// `None` when `diagnostics` is empty.
    pub fn from_vec(mut diagnostics: Vec<Diagnostic>) -> Option<Self> {
        if diagnostics.is_empty() {
            return None;
        }
        diagnostics.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
        diagnostics.dedup();
        Some(Self(diagnostics))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter()
    }

    pub fn first(&self) -> Option<&Diagnostic> {
        self.0.first()
    }

    /// Number of diagnostics of `kind`.
    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.0.iter().filter(|d| d.kind == kind).count()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.0
    }

    /// Add `other`, keeping presentation order.
    pub fn append(&mut self, other: Diagnostics) {
        self.0.extend(other.0);
        self.0.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
        self.0.dedup();
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.len() == 1 {
            write!(f, "{}", self.0[0])
        } else {
            writeln!(f, "{} errors:", self.0.len())?;
            for (i, diagnostic) in self.0.iter().enumerate() {
                writeln!(f, "  {}: {}", i + 1, diagnostic)?;
            }
            Ok(())
        }
    }
}

impl std::error::Error for Diagnostics {}

impl From<Diagnostic> for Diagnostics {
    fn from(diagnostic: Diagnostic) -> Self {
        Diagnostics::single(diagnostic)
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gdunsharp_syntax::Span;

    fn at(file: &str, line: usize) -> SourceLocation {
        SourceLocation::new(file, line, 1, Span::new(line * 10, line * 10 + 1))
    }

    #[test]
    fn from_vec_rejects_empty() {
        assert!(Diagnostics::from_vec(Vec::new()).is_none());
    }

    #[test]
    fn from_vec_sorts_by_location() {
        let errors = Diagnostics::from_vec(vec![
            Diagnostic::structural("b", at("B.cs", 1)),
            Diagnostic::structural("a2", at("A.cs", 7)),
            Diagnostic::structural("a1", at("A.cs", 2)),
        ])
        .unwrap();
        let messages: Vec<_> = errors.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(messages, vec!["a1", "a2", "b"]);
    }

    #[test]
    fn duplicate_names_both_locations() {
        let d = Diagnostic::duplicate("Game.Foo", at("A.cs", 1), at("B.cs", 3));
        assert_eq!(d.kind, DiagnosticKind::DuplicateDeclaration);
        assert_eq!(d.location, at("B.cs", 3));
        assert_eq!(d.related, vec![at("A.cs", 1)]);
        assert!(d.to_string().contains("`Game.Foo`"));
    }

    #[test]
    fn unresolved_lists_scopes() {
        let searched = vec!["namespace Game".to_string(), "builtin types".to_string()];
        let d = Diagnostic::unresolved("Quux", &searched, at("A.cs", 4));
        assert!(d.message.contains("Quux"));
        assert_eq!(d.notes, vec!["searched: namespace Game, builtin types".to_string()]);
    }

    #[test]
    fn display_single_vs_many() {
        let one = Diagnostics::single(Diagnostic::structural("x", at("A.cs", 1)));
        assert_eq!(one.to_string(), "A.cs:1:1: unsupported construct: x");
        let two = Diagnostics::from_vec(vec![
            Diagnostic::structural("x", at("A.cs", 1)),
            Diagnostic::generic_scope("y", at("A.cs", 2)),
        ])
        .unwrap();
        assert!(two.to_string().starts_with("2 errors:"));
        assert_eq!(two.count(DiagnosticKind::GenericScope), 1);
    }
}
