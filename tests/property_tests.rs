//! Property-based tests for the translator
//!
//! Output must depend only on the set of input files: not on the order they are handed over in, and not on how many
//! times the translation runs.

use gdunsharp::{Artifact, SourceUnit, Translator};
use proptest::prelude::*;

/// Class `C{i}` in namespace `Ns{i % 3}`, holding a reference to the next class (wrapping around).
fn class_source(i: usize, n: usize) -> String {
    let next = (i + 1) % n;
    format!(
        r#"
using System.Collections.Generic;

namespace Ns{ns}
{{
    public partial class C{i}
    {{
        public Ns{next_ns}.C{next} Next;
        public List<int> Items;
        public int Value {{ get; set; }} = {i};

        public virtual int Sum(int bonus)
        {{
            return Value + bonus;
        }}
    }}
}}
"#,
        ns = i % 3,
        next_ns = next % 3,
    )
}

fn project() -> impl Strategy<Value = Vec<SourceUnit>> {
    (1usize..7).prop_flat_map(|n| {
        let units: Vec<SourceUnit> = (0..n)
            .map(|i| SourceUnit::new(format!("src/F{i}.cs"), class_source(i, n)))
            .collect();
        Just(units).prop_shuffle()
    })
}

fn translate(units: &[SourceUnit]) -> Vec<Artifact> {
    Translator::default().translate(units).expect("project should translate")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// Property: any permutation of the input files yields identical artifacts
    #[test]
    fn output_is_independent_of_file_order(units in project()) {
        let mut sorted = units.clone();
        sorted.sort_by(|a, b| a.path.cmp(&b.path));
        prop_assert_eq!(translate(&units), translate(&sorted));
    }

    /// Property: translating twice gives byte-identical output
    #[test]
    fn translation_is_idempotent(units in project()) {
        prop_assert_eq!(translate(&units), translate(&units));
    }

    /// Property: every top-level type gets a header and paths come out sorted
    #[test]
    fn one_header_per_type_in_path_order(units in project()) {
        let artifacts = translate(&units);
        let headers = artifacts
            .iter()
            .filter(|a| a.path.ends_with(".hpp") && !a.path.ends_with("_forward.hpp"))
            .count();
        prop_assert_eq!(headers, units.len());
        let paths: Vec<&String> = artifacts.iter().map(|a| &a.path).collect();
        let mut sorted = paths.clone();
        sorted.sort();
        prop_assert_eq!(paths, sorted);
    }
}
