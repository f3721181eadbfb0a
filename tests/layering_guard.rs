//! Layering guardrails for the workspace.
//!
//! - `gdunsharp_core` is a vocabulary crate and must stay dependency-free.
//! - Only `gdunsharp_syntax` talks to tree-sitter; the translator crate must not depend on it directly.

/// Dependency names listed in the `[dependencies]` table of a manifest.
fn dependencies(manifest: &str) -> Vec<String> {
    let mut in_dependencies = false;
    let mut names = Vec::new();
    for raw_line in manifest.lines() {
        let line = raw_line.trim();
        if line.starts_with('[') {
            in_dependencies = line == "[dependencies]";
            continue;
        }
        if !in_dependencies || line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line_no_comment = line.split('#').next().unwrap_or("").trim();
        if let Some((name, _)) = line_no_comment.split_once('=') {
            names.push(name.trim().to_string());
        }
    }
    names
}

#[test]
fn core_vocabulary_has_no_dependencies() {
    let manifest = include_str!("../crates/gdunsharp_core/Cargo.toml");
    assert_eq!(dependencies(manifest), Vec::<String>::new());
}

#[test]
fn translator_does_not_depend_on_tree_sitter_directly() {
    let manifest = include_str!("../Cargo.toml");
    let deps = dependencies(manifest);
    assert!(deps.iter().any(|d| d == "gdunsharp_syntax"));
    if let Some(offender) = deps.iter().find(|d| d.starts_with("tree-sitter")) {
        panic!("`{offender}` must not appear in the root [dependencies]; go through gdunsharp_syntax");
    }
}
