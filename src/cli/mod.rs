//! Command-line interface for the translator.
//!
//! ## Commands
//!
//! - `translate <dir> -o <out>` - translate every `.cs` file under `dir` and write the C++ artifacts to `out`
//! - `check <dir>` - run the whole pipeline without writing anything
//! - `dump-tree <file>` - print the parse tree of one file (debug)
//!
//! ## Design
//!
//! Command functions return `CliResult<T>` instead of calling `process::exit`. Only [`run`] handles errors and
//! exits. Diagnostics are rendered here (with miette, or as JSON); the library never prints.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;
mod report;

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Carries a user-facing message (already rendered) and an exit code.
#[derive(Debug)]
pub struct CliError {
    pub message: String,
    pub exit_code: ExitCode,
}

impl CliError {
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub type CliResult<T> = Result<T, CliError>;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// How diagnostics are printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Annotated source snippets.
    #[default]
    Human,
    /// One JSON array of diagnostic objects on stdout.
    Json,
}

/// Translate Godot C# scripts into godot-cpp C++ sources
#[derive(Parser, Debug)]
#[command(name = "gdunsharp")]
#[command(version = VERSION)]
#[command(about = "Translate Godot C# scripts into godot-cpp C++ sources", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Translator configuration file (TOML)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Namespace for files that declare none; their directory path is appended to it
    #[arg(long = "root-namespace", global = true, value_name = "NAMESPACE")]
    pub root_namespace: Option<String>,

    /// Diagnostic output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Translate a project directory
    Translate {
        /// Directory searched recursively for `.cs` files
        #[arg(value_name = "DIR")]
        dir: PathBuf,
        /// Output directory
        #[arg(short, long, value_name = "OUT")]
        output: PathBuf,
    },

    /// Check that a project directory translates, without writing output
    Check {
        #[arg(value_name = "DIR")]
        dir: PathBuf,
    },

    /// Print the parse tree of a source file (debug)
    DumpTree {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

/// Options shared by every project command.
#[derive(Debug, Clone, Default)]
pub struct Options {
    pub config: Option<PathBuf>,
    pub root_namespace: Option<String>,
    pub format: OutputFormat,
}

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called.
pub fn run() {
    let cli = Cli::parse();
    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute a parsed command line.
pub fn execute(cli: Cli) -> CliResult<ExitCode> {
    let options = Options {
        config: cli.config,
        root_namespace: cli.root_namespace,
        format: cli.format,
    };
    match cli.command {
        Command::Translate { dir, output } => commands::translate(&dir, &output, &options),
        Command::Check { dir } => commands::check(&dir, &options),
        Command::DumpTree { file } => commands::dump_tree(&file),
    }
}
