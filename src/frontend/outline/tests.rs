use gdunsharp_core::lang::attributes::AttributeId;
use gdunsharp_core::lang::modifiers::ModifierId;
use gdunsharp_syntax::parser::parse;

use super::*;
use crate::diagnostics::DiagnosticKind;
use crate::frontend::model::Initializer;

fn outline(source: &str) -> FileOutline {
    let tree = parse("Game/Player.cs", source).unwrap();
    build_outline(&tree, &QualifiedPath::parse("Fallback"))
}

fn members(outline: &TypeOutline) -> Vec<&Declaration> {
    outline
        .items
        .iter()
        .filter_map(|item| match item {
            OutlineItem::Member(decl) => Some(decl),
            OutlineItem::Type(_) => None,
        })
        .collect()
}

#[test]
fn block_namespace_and_members() {
    let file = outline(
        r#"
using Godot;

namespace Game
{
    public partial class Player : CharacterBody2D
    {
        [Export] public float Speed = 200.0f;
        private readonly int _lives;
        public void Jump(float height, int times = 1) { }
    }
}
"#,
    );
    assert!(file.diagnostics.is_empty(), "{:?}", file.diagnostics);
    assert_eq!(file.types.len(), 1);
    let player = &file.types[0];
    assert_eq!(player.decl.path.to_string(), "Game.Player");
    let DeclKind::Class(class) = &player.decl.kind else {
        panic!("expected class");
    };
    assert!(class.is_partial());
    assert_eq!(class.bases.len(), 1);
    assert_eq!(class.bases[0].written(), "CharacterBody2D");

    let members = members(player);
    assert_eq!(members.len(), 3);
    let DeclKind::Field(speed) = &members[0].kind else {
        panic!("expected field");
    };
    assert_eq!(speed.attributes, vec![AttributeId::Export]);
    assert_eq!(speed.initializer, Initializer::Literal("200.0f".into()));
    let DeclKind::Field(lives) = &members[1].kind else {
        panic!("expected field");
    };
    assert!(lives.modifiers.has(ModifierId::Readonly));
    assert_eq!(members[2].path.to_string(), "Game.Player.Jump(float,int)");
    let DeclKind::Method(jump) = &members[2].kind else {
        panic!("expected method");
    };
    assert_eq!(jump.params[1].default.as_deref(), Some("1"));
    let TypeReference::Unresolved(ty) = &jump.params[0].ty else {
        panic!("expected unresolved");
    };
    assert_eq!(ty.scope.namespace.to_string(), "Game");
    assert_eq!(ty.scope.usings, vec![QualifiedPath::parse("Godot")]);
    assert_eq!(ty.scope.member.as_ref(), Some(&members[2].path));
}

#[test]
fn file_scoped_namespace_applies_to_following_types() {
    let file = outline("namespace Game.Enemies;\n\npublic class Slime { }\npublic enum Mood { Calm, Angry = 4 }\n");
    let paths: Vec<String> = file.types.iter().map(|t| t.decl.path.to_string()).collect();
    assert_eq!(paths, vec!["Game.Enemies.Slime", "Game.Enemies.Mood"]);
    let DeclKind::Enum(mood) = &file.types[1].decl.kind else {
        panic!("expected enum");
    };
    assert_eq!(mood.members[1].value.as_deref(), Some("4"));
}

#[test]
fn types_outside_namespaces_use_the_context() {
    let file = outline("class Loose { }");
    assert_eq!(file.types[0].decl.path.to_string(), "Fallback.Loose");
}

#[test]
fn nested_types_extend_the_enclosing_path() {
    let file = outline("namespace A { class Outer<T> { class Inner { T value; } } }");
    let outer = &file.types[0];
    assert_eq!(outer.decl.generics(), ["T".to_string()]);
    let OutlineItem::Type(inner) = &outer.items[0] else {
        panic!("expected nested type");
    };
    assert_eq!(inner.decl.path.to_string(), "A.Outer.Inner");
    let field = members(inner)[0];
    assert_eq!(field.path.to_string(), "A.Outer.Inner.value");
}

#[test]
fn properties_and_signals() {
    let file = outline(
        r#"
namespace Game {
    public partial class Hud : Control {
        [Signal] public delegate void ScoreChangedEventHandler(int score);
        public int Score { get; private set; } = 3;
        public string Title => "hud";
    }
}
"#,
    );
    assert!(file.diagnostics.is_empty(), "{:?}", file.diagnostics);
    let members = members(&file.types[0]);
    let DeclKind::Signal(signal) = &members[0].kind else {
        panic!("expected signal");
    };
    assert_eq!(members[0].name, "ScoreChanged");
    assert_eq!(signal.params.len(), 1);
    let DeclKind::Property(score) = &members[1].kind else {
        panic!("expected property");
    };
    assert!(score.is_auto());
    assert!(score.setter.is_some());
    assert_eq!(score.initializer, Initializer::Literal("3".into()));
    let DeclKind::Property(title) = &members[2].kind else {
        panic!("expected property");
    };
    assert!(!title.is_auto());
    assert!(title.setter.is_none());
}

#[test]
fn overloads_get_distinct_paths() {
    let file = outline("namespace N { class C { void M(int a) {} void M(ref string s) {} void M<T>(T t) {} } }");
    let paths: Vec<String> = members(&file.types[0]).iter().map(|m| m.path.to_string()).collect();
    assert_eq!(paths, vec!["N.C.M(int)", "N.C.M(ref string)", "N.C.M`1(T)"]);
}

#[test]
fn out_of_dialect_constructs_are_structural_errors() {
    let file = outline(
        r#"
namespace N {
    class C {
        (int, int) pair;
        public async void Load() { }
        public event System.Action Fired;
        public int this[int i] => i;
        public void Reflect() { var t = GetType(); }
        [Obsolete] public void Old() { }
        public static C operator +(C a, C b) => a;
        public int Kept;
    }
    struct S { }
}
"#,
    );
    let messages: Vec<&str> = file.diagnostics.iter().map(|d| d.message.as_str()).collect();
    assert!(file.diagnostics.iter().all(|d| d.kind == DiagnosticKind::StructuralUnsupported));
    assert!(messages.contains(&"tuple types are not supported"), "{messages:?}");
    assert!(messages.contains(&"`async` members are not supported"), "{messages:?}");
    assert!(messages.iter().any(|m| m.contains("events")), "{messages:?}");
    assert!(messages.contains(&"indexers are not supported"), "{messages:?}");
    assert!(messages.contains(&"reflection (`GetType`) is not supported"), "{messages:?}");
    assert!(messages.contains(&"attribute `[Obsolete]` is not supported"), "{messages:?}");
    assert!(messages.contains(&"operator overloads are not supported"), "{messages:?}");
    assert!(messages.contains(&"structs and records are not supported"), "{messages:?}");
    // The rest of the file is still outlined.
    let names: Vec<&str> = members(&file.types[0]).iter().map(|m| m.name.as_str()).collect();
    assert!(names.contains(&"Kept"));
}

#[test]
fn non_literal_initializers_are_dropped_but_defaults_are_refused() {
    let file = outline("namespace N { class C { int a = 1 + 2; void M(int x = Compute()) {} } }");
    let DeclKind::Field(a) = &members(&file.types[0])[0].kind else {
        panic!("expected field");
    };
    assert_eq!(a.initializer, Initializer::Dropped("1 + 2".into()));
    assert_eq!(file.diagnostics.len(), 1);
    assert_eq!(file.diagnostics[0].message, "only literal default values are supported");
}

#[test]
fn using_forms() {
    let file = outline("using static System.Math;\nusing Col = System.Collections.Generic;\nusing Godot;\nclass C {}\n");
    let messages: Vec<&str> = file.diagnostics.iter().map(|d| d.message.as_str()).collect();
    assert_eq!(messages, vec!["`using static` is not supported", "using aliases are not supported"]);
}
