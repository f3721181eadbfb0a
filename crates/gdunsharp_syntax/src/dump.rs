//! Human-readable dump of a parsed tree, used by `gdunsharp dump-tree` when working out which node kinds a
//! construct produces.
//!
//! Only named nodes are shown. Leaf-like kinds print their source text next to the kind.

use std::fmt::Write;

use tree_sitter::Node;

use crate::node::named_children;
use crate::parser::SyntaxTree;

/// Kinds whose text is printed inline.
const TEXT_KINDS: &[&str] = &[
    "identifier",
    "modifier",
    "comment",
    "qualified_name",
    "integer_literal",
    "predefined_type",
    "array_rank_specifier",
];

/// Render the whole tree, one node per line.
pub fn dump_tree(tree: &SyntaxTree) -> String {
    let mut out = String::new();
    dump_node(tree, tree.root(), "", false, &mut out);
    out
}

fn shows_text(node: &Node<'_>) -> bool {
    if TEXT_KINDS.contains(&node.kind()) {
        return true;
    }
    // Bodiless accessors (`get;`) are short enough to print whole.
    node.kind() == "accessor_declaration"
        && named_children(node)
            .first()
            .is_none_or(|first| first.kind() != "block")
}

fn dump_node(tree: &SyntaxTree, node: Node<'_>, prefix: &str, is_last: bool, out: &mut String) {
    if !prefix.is_empty() {
        out.push_str(&prefix[..prefix.len() - 1]);
        out.push('-');
    }
    if shows_text(&node) {
        let _ = writeln!(out, "{}: '{}'", node.kind(), tree.text(&node));
    } else {
        let _ = writeln!(out, "{}", node.kind());
    }

    let children = named_children(&node);
    let count = children.len();
    let base = if is_last {
        format!("{}  ", &prefix[..prefix.len().saturating_sub(2)])
    } else {
        prefix.to_string()
    };
    let child_prefix = format!("{base}| ");
    for (index, child) in children.into_iter().enumerate() {
        dump_node(tree, child, &child_prefix, index + 1 >= count, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn dump_shows_kinds_and_leaf_text() {
        let tree = parse("A.cs", "namespace Game { class A { int x; } }").unwrap();
        let dump = dump_tree(&tree);
        let mut lines = dump.lines();
        assert_eq!(lines.next(), Some("compilation_unit"));
        assert_eq!(lines.next(), Some("|-namespace_declaration"));
        assert!(dump.contains("identifier: 'Game'"));
        assert!(dump.contains("predefined_type: 'int'"));
        assert!(dump.contains("identifier: 'x'"));
    }
}
