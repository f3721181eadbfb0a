//! Small conveniences over [`tree_sitter::Node`] that the outline builder leans on.

use tree_sitter::Node;

/// Named children of `node`, in source order.
pub fn named_children<'t>(node: &Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).collect()
}

/// Named children of `node` whose kind is `kind`.
pub fn children_of_kind<'t>(node: &Node<'t>, kind: &str) -> Vec<Node<'t>> {
    named_children(node)
        .into_iter()
        .filter(|child| child.kind() == kind)
        .collect()
}

/// First child reachable through any of `fields`, trying them in order.
///
/// Grammar revisions have renamed some fields (`type` vs `returns` on methods), so callers pass every spelling
/// they accept.
pub fn field<'t>(node: &Node<'t>, fields: &[&str]) -> Option<Node<'t>> {
    fields.iter().find_map(|name| node.child_by_field_name(name))
}

/// Depth-first search for the first descendant (including `node` itself) of the given kind.
pub fn find_descendant<'t>(node: &Node<'t>, kind: &str) -> Option<Node<'t>> {
    if node.kind() == kind {
        return Some(*node);
    }
    named_children(node)
        .iter()
        .find_map(|child| find_descendant(child, kind))
}

/// Every descendant (including `node`) of any of the given kinds, in document order.
pub fn descendants_of_kinds<'t>(node: &Node<'t>, kinds: &[&str]) -> Vec<Node<'t>> {
    let mut found = Vec::new();
    collect(node, kinds, &mut found);
    found
}

fn collect<'t>(node: &Node<'t>, kinds: &[&str], found: &mut Vec<Node<'t>>) {
    if kinds.contains(&node.kind()) {
        found.push(*node);
    }
    for child in named_children(node) {
        collect(&child, kinds, found);
    }
}
