use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use gdunsharp_core::lang::attributes;
use gdunsharp_core::lang::types::{containers, engine};

/// Guardrail against matching C# vocabulary by string outside the registries.
///
/// A coarse net: it flags `== "List"` or `"Export" =>` style checks on container, engine-type and attribute
/// spellings in Rust sources, where callers are expected to go through `gdunsharp_core::lang` lookups.
///
/// Registries themselves and tests may spell the names directly.
#[test]
fn no_stringly_vocab_checks_in_rust_sources() {
    let root = repo_root();
    let spellings = spellings();
    let mut offenders: Vec<(PathBuf, usize, String)> = Vec::new();

    for dir in [root.join("src"), root.join("crates")] {
        if dir.exists() {
            scan_dir(&root, &dir, &spellings, &mut offenders);
        }
    }

    if !offenders.is_empty() {
        let mut msg = String::new();
        msg.push_str("Found stringly-typed vocabulary checks. Use the gdunsharp_core registries.\n\n");
        for (path, line_no, line) in offenders.into_iter().take(80) {
            msg.push_str(&format!(
                "- {}:{}: {}\n",
                path.strip_prefix(&root).unwrap_or(&path).display(),
                line_no,
                line.trim()
            ));
        }
        panic!("{msg}");
    }
}

#[test]
fn registry_spellings_are_unique() {
    let mut seen = BTreeSet::new();
    for t in containers::CONTAINER_TYPES {
        // `List<T>` and `Godot.Collections.Array<T>` are distinct by namespace, not by name.
        assert!(seen.insert((t.namespace, t.canonical)), "duplicate container {}", t.canonical);
    }
    let mut names = BTreeSet::new();
    for t in engine::ENGINE_TYPES {
        assert!(names.insert(t.name), "duplicate engine type {}", t.name);
    }
    let mut attrs = BTreeSet::new();
    for a in attributes::ATTRIBUTES {
        assert!(attrs.insert(a.canonical), "duplicate attribute {}", a.canonical);
    }
}

fn repo_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

fn spellings() -> Vec<&'static str> {
    let mut set: BTreeSet<&'static str> = BTreeSet::new();
    for t in containers::CONTAINER_TYPES {
        set.insert(t.canonical);
        for &a in t.aliases {
            set.insert(a);
        }
    }
    for t in engine::ENGINE_TYPES {
        set.insert(t.name);
    }
    for a in attributes::ATTRIBUTES {
        set.insert(a.canonical);
    }
    set.into_iter().collect()
}

fn is_allowed_file(root: &Path, path: &Path) -> bool {
    let rel = path.strip_prefix(root).unwrap_or(path).to_string_lossy();
    if !rel.ends_with(".rs") {
        return true;
    }
    if rel.starts_with("crates/gdunsharp_core/src/lang/") {
        return true;
    }
    rel.starts_with("tests/")
}

fn scan_dir(root: &Path, dir: &Path, spellings: &[&'static str], offenders: &mut Vec<(PathBuf, usize, String)>) {
    let Ok(entries) = fs::read_dir(dir) else { return };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            scan_dir(root, &path, spellings, offenders);
            continue;
        }
        if is_allowed_file(root, &path) {
            continue;
        }
        let Ok(contents) = fs::read_to_string(&path) else {
            continue;
        };
        for (idx, line) in contents.lines().enumerate() {
            if is_suspicious_line(line, spellings) {
                offenders.push((path.clone(), idx + 1, line.to_string()));
            }
        }
    }
}

fn is_suspicious_line(line: &str, spellings: &[&'static str]) -> bool {
    let trimmed = line.trim_start();
    if trimmed.starts_with("//") {
        return false;
    }
    spellings.iter().any(|s| {
        let eq = format!("== \"{s}\"");
        let arm = format!("\"{s}\" =>");
        line.contains(&eq) || line.contains(&arm)
    })
}
