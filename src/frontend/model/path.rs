//! Fully qualified declaration paths.

use std::fmt;

/// Dotted identity of a declaration: namespaces, then enclosing types, then the declaration's own segment.
///
/// Method segments carry their overload signature (`Jump(float)`), so a segment may itself contain dots; the path
/// is stored as segments and only joined for display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QualifiedPath {
    segments: Vec<String>,
}

impl QualifiedPath {
    /// The global namespace.
    pub fn root() -> Self {
        Self::default()
    }

    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// Split a dotted name (`Game.Enemies`). Empty input gives the root.
    pub fn parse(dotted: &str) -> Self {
        Self::from_segments(dotted.split('.').map(str::trim).filter(|s| !s.is_empty()))
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Last segment; empty for the root.
    pub fn simple_name(&self) -> &str {
        self.segments.last().map(String::as_str).unwrap_or("")
    }

    pub fn parent(&self) -> Option<QualifiedPath> {
        if self.segments.is_empty() {
            return None;
        }
        Some(Self {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    pub fn child(&self, segment: impl Into<String>) -> QualifiedPath {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        Self { segments }
    }

    pub fn join(&self, other: &QualifiedPath) -> QualifiedPath {
        let mut segments = self.segments.clone();
        segments.extend(other.segments.iter().cloned());
        Self { segments }
    }

    pub fn starts_with(&self, prefix: &QualifiedPath) -> bool {
        self.segments.starts_with(&prefix.segments)
    }

    /// This path and each ancestor, innermost first, ending with the root.
    pub fn ancestors(&self) -> impl Iterator<Item = QualifiedPath> + '_ {
        (0..=self.segments.len())
            .rev()
            .map(move |len| Self::from_segments(self.segments[..len].iter().cloned()))
    }

    /// Join with a separator other than `.` (C++ uses `::`, file paths use `/`).
    pub fn join_with(&self, separator: &str) -> String {
        self.segments.join(separator)
    }
}

impl fmt::Display for QualifiedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            write!(f, "<global>")
        } else {
            write!(f, "{}", self.segments.join("."))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_display() {
        let path = QualifiedPath::parse("Game.Enemies.Slime");
        assert_eq!(path.len(), 3);
        assert_eq!(path.simple_name(), "Slime");
        assert_eq!(path.to_string(), "Game.Enemies.Slime");
        assert_eq!(QualifiedPath::parse("").to_string(), "<global>");
    }

    #[test]
    fn method_segments_keep_their_dots() {
        let method = QualifiedPath::parse("Game.Player").child("Hit(Godot.Node)");
        assert_eq!(method.len(), 3);
        assert_eq!(method.simple_name(), "Hit(Godot.Node)");
    }

    #[test]
    fn ancestors_run_innermost_to_root() {
        let names: Vec<String> = QualifiedPath::parse("A.B").ancestors().map(|p| p.to_string()).collect();
        assert_eq!(names, vec!["A.B", "A", "<global>"]);
    }
}
