//! Parse C# source into a [`SyntaxTree`].
//!
//! tree-sitter always produces a tree, recovering around bad input with `ERROR` and missing nodes. The translator
//! cannot outline a file whose structure had to be guessed, so any recovery node turns into
//! [`ParseError::Syntax`] pointing at the first one.

use std::path::{Path, PathBuf};

use miette::Diagnostic;
use thiserror::Error;
use tree_sitter::{Node, Parser, Tree};

use crate::span::{SourceLocation, Span};

/// Error while turning source text into a syntax tree.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum ParseError {
    #[error("{location}: syntax error near `{snippet}`")]
    #[diagnostic(code(gdunsharp::parse::syntax))]
    Syntax { location: SourceLocation, snippet: String },

    #[error("failed to load the C# grammar: {0}")]
    #[diagnostic(code(gdunsharp::parse::grammar))]
    Grammar(String),

    #[error("{}: parser produced no tree", .0.display())]
    #[diagnostic(code(gdunsharp::parse::no_tree))]
    NoTree(PathBuf),
}

impl ParseError {
    /// Location of the error, when it has one.
    pub fn location(&self) -> Option<&SourceLocation> {
        match self {
            ParseError::Syntax { location, .. } => Some(location),
            ParseError::Grammar(_) | ParseError::NoTree(_) => None,
        }
    }
}

/// One parsed source file: its path, its text and the concrete syntax tree over that text.
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    path: PathBuf,
    source: String,
    tree: Tree,
}

impl SyntaxTree {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Root node (`compilation_unit`).
    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// Source text covered by `node`.
    pub fn text(&self, node: &Node<'_>) -> &str {
        self.source.get(node.byte_range()).unwrap_or("")
    }

    /// Location of `node` in this file.
    pub fn location(&self, node: &Node<'_>) -> SourceLocation {
        let start = node.start_position();
        SourceLocation::new(
            self.path.clone(),
            start.row + 1,
            start.column + 1,
            Span::new(node.start_byte(), node.end_byte()),
        )
    }

    /// First `ERROR` or missing node in document order, if the parser had to recover.
    pub fn first_error(&self) -> Option<Node<'_>> {
        let root = self.root();
        if !root.has_error() {
            return None;
        }
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            if node.is_error() || node.is_missing() {
                return Some(node);
            }
            if !node.has_error() {
                continue;
            }
            let mut cursor = node.walk();
            let children: Vec<Node<'_>> = node.children(&mut cursor).collect();
            // Reverse so the leftmost child is visited first.
            stack.extend(children.into_iter().rev());
        }
        None
    }
}

/// Parse one C# file.
///
/// ## Errors
///
/// - [`ParseError::Syntax`] if tree-sitter had to recover from malformed input.
/// - [`ParseError::Grammar`] if the bundled grammar is incompatible with the tree-sitter runtime.
/// - [`ParseError::NoTree`] if the parser gave up entirely.
#[tracing::instrument(skip_all, fields(path = %path.as_ref().display(), source_len = source.as_ref().len()))]
pub fn parse(path: impl AsRef<Path>, source: impl AsRef<str>) -> Result<SyntaxTree, ParseError> {
    let path = path.as_ref().to_path_buf();
    let source = source.as_ref().to_string();

    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_c_sharp::LANGUAGE.into())
        .map_err(|e| ParseError::Grammar(e.to_string()))?;
    let tree = parser
        .parse(&source, None)
        .ok_or_else(|| ParseError::NoTree(path.clone()))?;

    let parsed = SyntaxTree { path, source, tree };
    if let Some(node) = parsed.first_error() {
        let snippet: String = parsed.text(&node).chars().take(40).collect();
        return Err(ParseError::Syntax {
            location: parsed.location(&node),
            snippet,
        });
    }
    tracing::debug!("parsed");
    Ok(parsed)
}
