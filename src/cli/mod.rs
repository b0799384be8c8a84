//! CLI module for codeir
//!
//! Provides command-line interface using clap derive macros.

pub mod commands;
pub mod output;
pub mod response;

pub use output::{OutputContext, OutputFormat};

use clap::{Parser, Subcommand};

use commands::{
    apply::ApplyArgs, config::ConfigArgs, map::MapArgs, missing::MissingArgs, nodes::NodesArgs,
    symbols::SymbolsArgs,
};

const LONG_ABOUT: &str = r#"
codeir - Declaration IR for C, C++, JavaScript, TypeScript and Python

codeir parses source files into a declaration-level IR (functions, classes,
types with byte-exact spans), reports missing type annotations, and applies
functions from generated responses back onto source files.

QUICK START:
  1. List declarations:       codeir symbols src/
  2. Outline a project:       codeir map --format text
  3. Find missing types:      codeir missing src/app.py
  4. Apply a response:        codeir apply src/app.py --response answer.md

APPLY EXAMPLES:
  codeir apply main.c --response fix.md               # Replace whole functions
  codeir apply app.py -r - --signature-only           # Keep bodies, read stdin
  codeir apply app.py -r out.md --only-missing --dry-run

Logging: RUST_LOG=codeir=debug codeir ...
"#;

/// codeir - Declaration IR and code reconciliation
#[derive(Parser, Debug)]
#[command(name = "codeir")]
#[command(author, version, about, long_about = LONG_ABOUT)]
#[command(propagate_version = true)]
#[command(after_help = "Use 'codeir <COMMAND> --help' for more information about a command.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (json, text); defaults to the configured format
    #[arg(long, global = true)]
    pub format: Option<String>,

    /// Verbose output (show debug info)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Dump symbol tables of files or directories
    Symbols(SymbolsArgs),

    /// Outline declarations without bodies
    Map(MapArgs),

    /// Report functions missing type annotations
    Missing(MissingArgs),

    /// Apply functions from a generated response to a file
    Apply(ApplyArgs),

    /// List declaration node types for a language
    Nodes(NodesArgs),

    /// Configuration management
    Config(ConfigArgs),
}
