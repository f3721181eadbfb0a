//! End-to-end pipeline tests: C# text through tree-sitter, merging, resolution and emission.

use gdunsharp::{Artifact, DiagnosticKind, Diagnostics, SourceUnit, Translator};

fn translate(units: &[SourceUnit]) -> Result<Vec<Artifact>, Diagnostics> {
    Translator::default().translate(units)
}

fn artifact<'a>(artifacts: &'a [Artifact], path: &str) -> &'a str {
    artifacts
        .iter()
        .find(|a| a.path == path)
        .map(|a| a.contents.as_str())
        .unwrap_or_else(|| {
            let paths: Vec<&str> = artifacts.iter().map(|a| a.path.as_str()).collect();
            panic!("no artifact {path}; have {paths:?}")
        })
}

fn errors(units: &[SourceUnit]) -> Diagnostics {
    match translate(units) {
        Ok(artifacts) => panic!("expected diagnostics, got {} artifacts", artifacts.len()),
        Err(errors) => errors,
    }
}

const FOO: &str = r#"
namespace NamespaceA
{
    public class Foo
    {
        public NamespaceB.Bar Other;
    }
}
"#;

const BAR: &str = r#"
namespace NamespaceB
{
    public class Bar
    {
        public NamespaceA.Foo Back;
    }
}
"#;

// ============================================================================
// Resolution
// ============================================================================

#[test]
fn cross_namespace_references_resolve_in_either_file_order() {
    let forward = translate(&[SourceUnit::new("A.cs", FOO), SourceUnit::new("B.cs", BAR)]).unwrap();
    let backward = translate(&[SourceUnit::new("B.cs", BAR), SourceUnit::new("A.cs", FOO)]).unwrap();
    assert_eq!(forward, backward);

    let foo = artifact(&forward, "NamespaceA/Foo.hpp");
    assert!(foo.contains("NamespaceB::Bar *Other{};"), "{foo}");
    assert!(foo.contains("#include \"NamespaceB/_forward.hpp\""), "{foo}");
    let bar = artifact(&forward, "NamespaceB/Bar.hpp");
    assert!(bar.contains("NamespaceA::Foo *Back{};"), "{bar}");
}

#[test]
fn unknown_type_reports_every_scope_searched() {
    let source = r#"
namespace NamespaceA
{
    public class Foo
    {
        public Quux Missing;
    }
}
"#;
    let errors = errors(&[SourceUnit::new("A.cs", source)]);
    assert_eq!(errors.len(), 1);
    let error = errors.first().unwrap();
    assert_eq!(error.kind, DiagnosticKind::UnresolvedType);
    assert!(error.message.contains("Quux"));
    let notes = error.notes.join("\n");
    assert!(notes.contains("global namespace"), "{notes}");
    assert!(notes.contains("builtin types"), "{notes}");
    assert_eq!(error.location.line, 6);
}

#[test]
fn type_declared_later_in_the_same_file_resolves() {
    let source = r#"
namespace Game
{
    public class Early
    {
        public Late Next;
    }

    public class Late
    {
    }
}
"#;
    let artifacts = translate(&[SourceUnit::new("Game.cs", source)]).unwrap();
    assert!(artifact(&artifacts, "Game/Early.hpp").contains("Game::Late *Next{};"));
}

#[test]
fn nested_types_resolve_from_inside_their_owner() {
    let source = r#"
namespace Game
{
    public class Inventory
    {
        public enum Slot { Head, Hands = 4 }

        public class Entry
        {
            public Slot Where;
        }

        public Entry First;
    }
}
"#;
    let artifacts = translate(&[SourceUnit::new("Inventory.cs", source)]).unwrap();
    let header = artifact(&artifacts, "Game/Inventory.hpp");
    assert!(header.contains("class Entry;"), "{header}");
    assert!(header.contains("enum class Slot : int64_t {"), "{header}");
    assert!(header.contains("Hands = 4,"), "{header}");
    assert!(header.contains("Game::Inventory::Slot Where{};"), "{header}");
    assert!(header.contains("Game::Inventory::Entry *First{};"), "{header}");
}

#[test]
fn method_generic_shadowing_a_class_generic_is_renamed() {
    let source = r#"
namespace Game
{
    public class Box<T>
    {
        public T Pick<T>(T other) => other;
    }
}
"#;
    let artifacts = translate(&[SourceUnit::new("Box.cs", source)]).unwrap();
    let header = artifact(&artifacts, "Game/Box.hpp");
    assert!(header.contains("template <typename T_>\n    T_ Pick(T_ other);"), "{header}");
    let inline = artifact(&artifacts, "Game/Box.inl");
    assert!(inline.contains("template <typename T>\ntemplate <typename T_>\nT_ Box<T>::Pick(T_ other) {"), "{inline}");
}

#[test]
fn using_directives_extend_the_search() {
    let utils = r#"
namespace Game.Utils
{
    public class Timer
    {
    }
}
"#;
    let player = r#"
using Game.Utils;

namespace Game.Actors
{
    public class Player
    {
        public Timer Cooldown;
    }
}
"#;
    let artifacts = translate(&[SourceUnit::new("Timer.cs", utils), SourceUnit::new("Player.cs", player)]).unwrap();
    let header = artifact(&artifacts, "Game/Actors/Player.hpp");
    assert!(header.contains("Game::Utils::Timer *Cooldown{};"), "{header}");
    assert!(header.contains("#include \"Game/Utils/_forward.hpp\""), "{header}");
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn duplicate_declarations_across_files() {
    let source = "namespace Game { public class Foo { } }";
    let errors = errors(&[SourceUnit::new("A.cs", source), SourceUnit::new("B.cs", source)]);
    assert_eq!(errors.count(DiagnosticKind::DuplicateDeclaration), 1);
    let error = errors.first().unwrap();
    assert_eq!(error.related.len(), 1);
}

#[test]
fn structural_constructs_are_refused() {
    let source = r#"
namespace Game
{
    public struct Point
    {
        public int X;
    }
}
"#;
    let errors = errors(&[SourceUnit::new("Point.cs", source)]);
    assert_eq!(errors.count(DiagnosticKind::StructuralUnsupported), 1);
}

#[test]
fn one_bad_file_blocks_every_artifact() {
    let good = "namespace Game { public class Good { public int X; } }";
    let bad = "namespace Game { public class Bad { public Missing Y; } }";
    let errors = errors(&[SourceUnit::new("Good.cs", good), SourceUnit::new("Bad.cs", bad)]);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.first().unwrap().location.file.to_str(), Some("Bad.cs"));
}

#[test]
fn errors_from_every_file_are_reported_together() {
    let a = "namespace Game { public class A { public Nope X; } }";
    let b = "namespace Game { public class B { public Nada Y; } }";
    let errors = errors(&[SourceUnit::new("A.cs", a), SourceUnit::new("B.cs", b)]);
    assert_eq!(errors.count(DiagnosticKind::UnresolvedType), 2);
}

#[test]
fn nullable_value_types_are_unsupported() {
    let source = "namespace Game { public class Foo { public int? Maybe; } }";
    let errors = errors(&[SourceUnit::new("Foo.cs", source)]);
    assert_eq!(errors.count(DiagnosticKind::UnsupportedType), 1);
}

#[test]
fn parse_errors_are_reported_as_parse_diagnostics() {
    let errors = errors(&[SourceUnit::new("Broken.cs", "namespace Game { public class { }")]);
    assert!(errors.count(DiagnosticKind::Parse) >= 1);
}

// ============================================================================
// Emission
// ============================================================================

#[test]
fn partial_parts_merge_into_one_unit() {
    let a = r#"
namespace Game
{
    public partial class Player
    {
        public int Health;
    }
}
"#;
    let b = r#"
namespace Game
{
    public partial class Player
    {
        public int Mana;
    }
}
"#;
    let artifacts = translate(&[SourceUnit::new("B.cs", b), SourceUnit::new("A.cs", a)]).unwrap();
    let header = artifact(&artifacts, "Game/Player.hpp");
    assert!(header.starts_with("// Generated by gdunsharp from A.cs, B.cs. Do not edit.\n"), "{header}");
    let health = header.find("int32_t Health{};").unwrap();
    let mana = header.find("int32_t Mana{};").unwrap();
    assert!(health < mana);
}

#[test]
fn ref_counted_user_classes_are_held_through_ref() {
    let stats = r#"
using Godot;

namespace G
{
    public partial class Stats : Resource
    {
    }
}
"#;
    let player = r#"
using Godot;

namespace G
{
    public partial class Player : Node2D
    {
        public Stats Data;
    }
}
"#;
    let artifacts = translate(&[SourceUnit::new("Stats.cs", stats), SourceUnit::new("Player.cs", player)]).unwrap();
    let header = artifact(&artifacts, "G/Player.hpp");
    assert!(header.contains("godot::Ref<G::Stats> Data{};"), "{header}");
    assert!(header.contains("#include \"G/Stats.hpp\""), "{header}");
    assert!(header.contains("#include <godot_cpp/classes/ref.hpp>"), "{header}");
    assert!(header.contains("GDCLASS(Player, godot::Node2D)"), "{header}");
}

#[test]
fn member_shapes_follow_the_source_modifiers() {
    let source = r#"
namespace Game
{
    public interface IDamageable
    {
        void TakeDamage(int amount);
        int Armor { get; }
    }

    public abstract class Unit : IDamageable
    {
        public readonly string Name = "unit";
        public const int MaxLevel = 99;
        public int register;

        public abstract void TakeDamage(int amount);
        public virtual int Armor => 0;
        public void Swap(ref int a, out int b) { b = a; }
    }

    public sealed class Knight : Unit
    {
        public sealed override void TakeDamage(int amount) { }
    }

    public static class Rules
    {
        public static int Turns;
    }
}
"#;
    let artifacts = translate(&[SourceUnit::new("Units.cs", source)]).unwrap();

    let interface = artifact(&artifacts, "Game/IDamageable.hpp");
    assert!(interface.contains("virtual ~IDamageable() = default;"), "{interface}");
    assert!(interface.contains("virtual void TakeDamage(int32_t amount) = 0;"), "{interface}");
    assert!(interface.contains("virtual int32_t get_Armor() const = 0;"), "{interface}");

    let unit = artifact(&artifacts, "Game/Unit.hpp");
    assert!(unit.contains("class Unit : public Game::IDamageable {"), "{unit}");
    assert!(unit.contains("const godot::String Name = \"unit\";"), "{unit}");
    assert!(unit.contains("static constexpr int32_t MaxLevel = 99;"), "{unit}");
    assert!(unit.contains("int32_t register_{};"), "{unit}");
    assert!(unit.contains("virtual void TakeDamage(int32_t amount) = 0;"), "{unit}");
    assert!(unit.contains("virtual int32_t get_Armor() const;"), "{unit}");
    assert!(unit.contains("void Swap(int32_t &a, int32_t &b);"), "{unit}");

    let knight = artifact(&artifacts, "Game/Knight.hpp");
    assert!(knight.contains("class Knight final : public Game::Unit {"), "{knight}");
    assert!(knight.contains("void TakeDamage(int32_t amount) override final;"), "{knight}");

    let rules = artifact(&artifacts, "Game/Rules.hpp");
    assert!(rules.contains("Rules() = delete;"), "{rules}");
    assert!(rules.contains("static int32_t Turns;"), "{rules}");
    let rules_cpp = artifact(&artifacts, "Game/Rules.cpp");
    assert!(rules_cpp.contains("int32_t Rules::Turns{};"), "{rules_cpp}");
}

#[test]
fn containers_map_to_configured_templates() {
    let source = r#"
using System.Collections.Generic;
using Godot;

namespace Game
{
    public class Bag
    {
        public List<int> Counts;
        public Dictionary<string, Node> Named;
        public float[] Weights;
    }
}
"#;
    let artifacts = translate(&[SourceUnit::new("Bag.cs", source)]).unwrap();
    let header = artifact(&artifacts, "Game/Bag.hpp");
    assert!(header.contains("godot::Vector<int32_t> Counts{};"), "{header}");
    assert!(header.contains("godot::RBMap<godot::String, godot::Node *> Named{};"), "{header}");
    assert!(header.contains("godot::Vector<float> Weights{};"), "{header}");
    assert!(header.contains("#include <godot_cpp/templates/vector.hpp>"), "{header}");
    assert!(header.contains("#include <godot_cpp/templates/rb_map.hpp>"), "{header}");
}

#[test]
fn forward_headers_cover_each_namespace() {
    let source = r#"
namespace Game
{
    public class Foo { }
    public class Box<T> { }
    public enum Team { Red, Blue }
}
"#;
    let artifacts = translate(&[SourceUnit::new("Game.cs", source)]).unwrap();
    let forward = artifact(&artifacts, "Game/_forward.hpp");
    assert!(forward.contains("class Foo;"), "{forward}");
    assert!(forward.contains("template <typename T>\nclass Box;"), "{forward}");
    assert!(forward.contains("enum class Team : int64_t;"), "{forward}");
    assert!(forward.contains("#include <cstdint>"), "{forward}");

    let paths: Vec<&str> = artifacts.iter().map(|a| a.path.as_str()).collect();
    let mut sorted = paths.clone();
    sorted.sort();
    assert_eq!(paths, sorted);
}

// ============================================================================
// Templates without out-of-class definitions
// ============================================================================

fn assert_includes_exist(artifacts: &[Artifact]) {
    let paths: Vec<&str> = artifacts.iter().map(|a| a.path.as_str()).collect();
    for a in artifacts {
        for line in a.contents.lines() {
            let Some(local) = line.strip_prefix("#include \"").and_then(|l| l.strip_suffix('"')) else {
                continue;
            };
            assert!(paths.contains(&local), "{} includes {local}, which is not among {paths:?}", a.path);
        }
    }
}

#[test]
fn generic_interface_has_no_inline_file() {
    let artifacts = translate(&[SourceUnit::new("IRepo.cs", "namespace N { interface IRepo<T> { T Get(); } }")]).unwrap();
    let header = artifact(&artifacts, "N/IRepo.hpp");
    assert!(header.contains("virtual T Get() = 0;"), "{header}");
    assert!(!header.contains(".inl"), "{header}");
    assert_includes_exist(&artifacts);
}

#[test]
fn field_only_generic_classes_have_no_inline_file() {
    let source = r#"
namespace N
{
    public class Box<T>
    {
        public T Item;
    }

    public class Outer<T>
    {
        public class Inner
        {
            public T Val;
        }
    }
}
"#;
    let artifacts = translate(&[SourceUnit::new("Box.cs", source)]).unwrap();
    for path in ["N/Box.hpp", "N/Outer.hpp"] {
        assert!(!artifact(&artifacts, path).contains(".inl"), "{path}");
    }
    assert!(artifacts.iter().all(|a| !a.path.ends_with(".inl")));
    assert_includes_exist(&artifacts);
}

#[test]
fn generic_class_with_methods_keeps_its_inline_file() {
    let source = "namespace N { public class Box<T> { public T Get() { return default; } } }";
    let artifacts = translate(&[SourceUnit::new("Box.cs", source)]).unwrap();
    assert!(artifact(&artifacts, "N/Box.hpp").ends_with("#include \"N/Box.inl\"\n"));
    artifact(&artifacts, "N/Box.inl");
    assert_includes_exist(&artifacts);
}

// ============================================================================
// Overloads after mapping
// ============================================================================

#[test]
fn overloads_that_map_to_one_signature_are_duplicates() {
    let source = r#"
using System.Collections.Generic;

namespace Game
{
    public class Scores
    {
        public void Add(List<int> values) { }
        public void Add(int[] values) { }
    }
}
"#;
    let errors = errors(&[SourceUnit::new("Scores.cs", source)]);
    assert_eq!(errors.count(DiagnosticKind::DuplicateDeclaration), 1);
    let error = errors.first().unwrap();
    assert_eq!((error.location.line, error.related[0].line), (9, 8));
    assert!(error.notes.iter().any(|n| n.contains("godot::Vector<int32_t>")), "{:?}", error.notes);
}

// ============================================================================
// Include minimality
// ============================================================================

#[test]
fn defining_header_replaces_the_forward_header_of_its_namespace() {
    let source = r#"
namespace N
{
    public interface I { }

    public class C : I
    {
        public I Other;
    }
}
"#;
    let artifacts = translate(&[SourceUnit::new("N.cs", source)]).unwrap();
    let header = artifact(&artifacts, "N/C.hpp");
    assert!(header.contains("#include \"N/I.hpp\""), "{header}");
    assert!(!header.contains("_forward.hpp"), "{header}");
}

#[test]
fn forward_header_stays_for_types_the_full_headers_do_not_cover() {
    let source = r#"
namespace N
{
    public interface I { }
    public class D { }

    public class C : I
    {
        public D Next;
    }
}
"#;
    let artifacts = translate(&[SourceUnit::new("N.cs", source)]).unwrap();
    let header = artifact(&artifacts, "N/C.hpp");
    assert!(header.contains("#include \"N/I.hpp\""), "{header}");
    assert!(header.contains("#include \"N/_forward.hpp\""), "{header}");
}

// ============================================================================
// Complete diagnostic set
// ============================================================================

#[test]
fn parse_errors_do_not_hide_duplicates_in_other_files() {
    let foo = "namespace Game { public class Foo { } }";
    let errors = errors(&[
        SourceUnit::new("A.cs", foo),
        SourceUnit::new("B.cs", foo),
        SourceUnit::new("Broken.cs", "namespace Game { public class { }"),
    ]);
    assert!(errors.count(DiagnosticKind::Parse) >= 1);
    assert_eq!(errors.count(DiagnosticKind::DuplicateDeclaration), 1);
}
