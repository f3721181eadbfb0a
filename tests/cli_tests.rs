//! CLI tests: argument parsing and whole-directory translation on a temporary project.

use std::fs;

use clap::Parser;
use gdunsharp::cli::{Cli, ExitCode, execute};

fn run(args: &[&str]) -> Result<ExitCode, String> {
    let cli = Cli::try_parse_from(std::iter::once("gdunsharp").chain(args.iter().copied())).map_err(|e| e.to_string())?;
    execute(cli).map_err(|e| e.message)
}

#[test]
fn translate_writes_namespace_tree() {
    let project = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    fs::create_dir_all(project.path().join("Ui")).unwrap();
    fs::write(
        project.path().join("Ui/Menu.cs"),
        "public class Menu { public int Selected; }",
    )
    .unwrap();
    fs::write(
        project.path().join("Player.cs"),
        "namespace Game { public class Player { public Game.Ui.Menu Current; } }",
    )
    .unwrap();

    let code = run(&[
        "translate",
        project.path().to_str().unwrap(),
        "-o",
        out.path().to_str().unwrap(),
        "--root-namespace",
        "Game",
    ])
    .unwrap();
    assert_eq!(code, ExitCode::SUCCESS);

    let menu = fs::read_to_string(out.path().join("Game/Ui/Menu.hpp")).unwrap();
    assert!(menu.contains("namespace Ui {"), "{menu}");
    let player = fs::read_to_string(out.path().join("Game/Player.hpp")).unwrap();
    assert!(player.contains("Game::Ui::Menu *Current{};"), "{player}");
    assert!(out.path().join("Game/Ui/_forward.hpp").exists());
}

#[test]
fn check_reports_failures_without_writing() {
    let project = tempfile::tempdir().unwrap();
    fs::write(
        project.path().join("Bad.cs"),
        "namespace Game { public class Bad { public Missing Field; } }",
    )
    .unwrap();
    let err = run(&["check", project.path().to_str().unwrap()]).unwrap_err();
    assert!(err.contains("Missing"), "{err}");
    assert!(err.contains("1 diagnostic"), "{err}");
}

#[test]
fn config_file_overrides_type_mapping() {
    let project = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    fs::write(
        project.path().join("Money.cs"),
        "namespace Game { public class Wallet { public decimal Coins; } }",
    )
    .unwrap();
    let config = project.path().join("gdunsharp.toml");
    fs::write(&config, "[type_map.primitives]\ndecimal = \"double\"\n").unwrap();

    let project_dir = project.path().to_str().unwrap();
    let out_dir = out.path().to_str().unwrap();
    assert!(run(&["translate", project_dir, "-o", out_dir]).is_err());
    run(&["translate", project_dir, "-o", out_dir, "--config", config.to_str().unwrap()]).unwrap();
    let wallet = fs::read_to_string(out.path().join("Game/Wallet.hpp")).unwrap();
    assert!(wallet.contains("double Coins{};"), "{wallet}");
}

#[test]
fn unknown_subcommand_is_rejected() {
    assert!(run(&["frobnicate"]).is_err());
}

#[test]
fn invalid_root_namespace_is_rejected() {
    let project = tempfile::tempdir().unwrap();
    fs::write(project.path().join("A.cs"), "public class A { }").unwrap();
    let err = run(&["check", project.path().to_str().unwrap(), "--root-namespace", "my-game"]).unwrap_err();
    assert!(err.contains("not a valid root namespace"), "{err}");
}

#[test]
fn directory_names_are_escaped_into_namespaces() {
    let project = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    fs::create_dir_all(project.path().join("my-ui")).unwrap();
    fs::write(project.path().join("my-ui/Menu.cs"), "public class Menu { }").unwrap();
    run(&["translate", project.path().to_str().unwrap(), "-o", out.path().to_str().unwrap()]).unwrap();
    let menu = fs::read_to_string(out.path().join("my_ui/Menu.hpp")).unwrap();
    assert!(menu.contains("namespace my_ui {"), "{menu}");
}
