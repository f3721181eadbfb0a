//! Parser adapter for the gdunsharp translator: C# source in, concrete syntax tree out.
//!
//! This crate is dependency-light and wraps the tree-sitter C# grammar behind a small surface so the translator
//! core never touches the parsing library directly.
//!
//! ## Notes
//! - This crate is intentionally "syntax-only": it does not build outlines, resolve names, or map types.
//! - Source locations ([`SourceLocation`]) are defined here because every later diagnostic points back into a
//!   parsed file.
//!
//! ## Examples
//! ```rust,no_run
//! use gdunsharp_syntax::parser;
//!
//! let tree = parser::parse("Player.cs", "namespace Game; public partial class Player {}").unwrap();
//! assert_eq!(tree.root().kind(), "compilation_unit");
//! ```

pub mod dump;
pub mod node;
pub mod parser;
pub mod span;

pub use parser::{ParseError, SyntaxTree};
pub use span::{SourceLocation, Span};
pub use tree_sitter::Node;
