//! Byte spans and human-facing source locations.

use std::fmt;
use std::path::{Path, PathBuf};

/// Half-open byte range into a source file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Where a declaration or diagnostic lives: file, 1-based line and column, and byte span.
///
/// Ordering is by file, then position, which gives diagnostics a stable presentation order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceLocation {
    pub file: PathBuf,
    pub line: usize,
    pub column: usize,
    pub span: Span,
}

impl SourceLocation {
    pub fn new(file: impl Into<PathBuf>, line: usize, column: usize, span: Span) -> Self {
        Self {
            file: file.into(),
            line,
            column,
            span,
        }
    }

    /// Location for declarations that have no source (builtins, synthesized members).
    pub fn synthetic(file: impl Into<PathBuf>) -> Self {
        Self {
            file: file.into(),
            line: 0,
            column: 0,
            span: Span::default(),
        }
    }

    pub fn file(&self) -> &Path {
        &self.file
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file.display(), self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_file_line_column() {
        let loc = SourceLocation::new("Game/Player.cs", 3, 14, Span::new(40, 52));
        assert_eq!(loc.to_string(), "Game/Player.cs:3:14");
        assert_eq!(loc.span.len(), 12);
    }

    #[test]
    fn ordering_is_file_then_position() {
        let a = SourceLocation::new("A.cs", 10, 1, Span::new(100, 101));
        let b = SourceLocation::new("B.cs", 1, 1, Span::new(0, 1));
        let c = SourceLocation::new("A.cs", 2, 1, Span::new(20, 21));
        let mut all = vec![b.clone(), a.clone(), c.clone()];
        all.sort();
        assert_eq!(all, vec![c, a, b]);
    }
}
