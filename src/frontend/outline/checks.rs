//! Dialect checks shared by type and member outlining: modifiers, attributes, literals, and the scan of bodies for
//! constructs the translator refuses.

use gdunsharp_core::lang::attributes::{self, AttributeId};
use gdunsharp_core::lang::modifiers::{self, ModifierCategory};
use gdunsharp_syntax::Node;
use gdunsharp_syntax::node::{children_of_kind, descendants_of_kinds, field, named_children};

use super::OutlineBuilder;
use crate::frontend::model::{Initializer, Modifiers};

/// Node kinds that are simple literals on their own.
const LITERAL_KINDS: &[&str] = &[
    "integer_literal",
    "real_literal",
    "boolean_literal",
    "character_literal",
    "null_literal",
    "string_literal",
];

/// Node kinds inside bodies that put a member outside the dialect.
const REFUSED_BODY_KINDS: &[&str] = &[
    "await_expression",
    "yield_statement",
    "goto_statement",
    "unsafe_statement",
    "fixed_statement",
    "typeof_expression",
    "stackalloc_expression",
    "modifier",
    "identifier",
];

impl<'t> OutlineBuilder<'t> {
    /// Modifiers written on a declaration or parameter.
    ///
    /// Out-of-dialect modifiers (`async`, `unsafe`, `extern`, ...) are reported and dropped.
    pub(super) fn modifiers(&mut self, node: &Node<'t>) -> Modifiers {
        let mut found = Modifiers::default();
        let mut cursor = node.walk();
        let children: Vec<Node<'t>> = node.children(&mut cursor).collect();
        for child in children {
            let spelling = match child.kind() {
                "modifier" | "parameter_modifier" => self.text(&child).trim(),
                "ref" | "out" | "in" | "this" | "params" => child.kind(),
                _ => continue,
            };
            if spelling == "scoped" {
                continue;
            }
            match modifiers::from_str(spelling) {
                Some(id) if modifiers::info_for(id).category == ModifierCategory::Unsupported => {
                    self.structural(&child, format!("`{spelling}` members are not supported"));
                }
                Some(id) => found.push(id),
                None => self.structural(&child, format!("modifier `{spelling}` is not supported")),
            }
        }
        found
    }

    /// Engine attributes written on a declaration; anything else is reported.
    pub(super) fn attributes(&mut self, node: &Node<'t>) -> Vec<AttributeId> {
        let mut found = Vec::new();
        for list in children_of_kind(node, "attribute_list") {
            for attribute in descendants_of_kinds(&list, &["attribute"]) {
                let name = field(&attribute, &["name"])
                    .map(|n| self.text(&n))
                    .unwrap_or_else(|| self.text(&attribute));
                match attributes::from_str(name.trim()) {
                    Some(id) => {
                        if !found.contains(&id) {
                            found.push(id);
                        }
                    }
                    None => self.structural(&attribute, format!("attribute `[{}]` is not supported", name.trim())),
                }
            }
        }
        found
    }

    /// Report refused constructs anywhere inside `node`.
    pub(super) fn scan_body(&mut self, node: &Node<'t>) {
        for found in descendants_of_kinds(node, REFUSED_BODY_KINDS) {
            let message = match found.kind() {
                "await_expression" => "`await` is not supported",
                "yield_statement" => "iterators (`yield`) are not supported",
                "goto_statement" => "`goto` is not supported",
                "unsafe_statement" | "fixed_statement" | "stackalloc_expression" => "unsafe code is not supported",
                "typeof_expression" => "reflection (`typeof`) is not supported",
                "modifier" => match self.text(&found) {
                    "async" => "async lambdas are not supported",
                    "unsafe" => "unsafe code is not supported",
                    _ => continue,
                },
                _ => match self.text(&found) {
                    "GetType" => "reflection (`GetType`) is not supported",
                    "Activator" => "reflection (`Activator`) is not supported",
                    "Reflection" => "reflection (`System.Reflection`) is not supported",
                    "dynamic" => "`dynamic` is not supported",
                    _ => continue,
                },
            };
            self.structural(&found, message);
        }
    }

    /// Classify a field or property initializer.
    pub(super) fn initializer(&mut self, value: Option<Node<'t>>) -> Initializer {
        match value {
            None => Initializer::None,
            Some(value) if is_simple_literal(&value) => Initializer::Literal(self.text(&value).to_string()),
            Some(value) => {
                self.scan_body(&value);
                Initializer::Dropped(self.text(&value).to_string())
            }
        }
    }
}

/// The expression after `=` in a declarator, enum member or parameter.
pub(super) fn value_after_equals<'t>(node: &Node<'t>) -> Option<Node<'t>> {
    if let Some(clause) = children_of_kind(node, "equals_value_clause").into_iter().next() {
        return named_children(&clause).into_iter().next();
    }
    if let Some(value) = field(node, &["value"]) {
        return Some(value);
    }
    let mut cursor = node.walk();
    let children: Vec<Node<'t>> = node.children(&mut cursor).collect();
    let equals = children.iter().position(|c| c.kind() == "=")?;
    children[equals + 1..].iter().find(|c| c.is_named()).copied()
}

/// Numeric, boolean, string, char and `null` literals, negated numbers, and `default`.
pub(super) fn is_simple_literal(node: &Node<'_>) -> bool {
    match node.kind() {
        kind if LITERAL_KINDS.contains(&kind) => true,
        "default_expression" => named_children(node).is_empty(),
        "prefix_unary_expression" => {
            let children = named_children(node);
            children.len() == 1 && matches!(children[0].kind(), "integer_literal" | "real_literal")
        }
        _ => false,
    }
}

/// Enum values the target accepts verbatim: literals, sibling names and integer operators.
pub(super) fn is_constant_expression(text: &str) -> bool {
    !text.is_empty()
        && text
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || " _|&^~<>()+-*".contains(c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_expressions() {
        assert!(is_constant_expression("1 << 3"));
        assert!(is_constant_expression("Read | Write"));
        assert!(is_constant_expression("0x10"));
        assert!(!is_constant_expression("Compute()."));
        assert!(!is_constant_expression("\"a\""));
    }
}
