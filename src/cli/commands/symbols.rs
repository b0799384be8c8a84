//! Symbols command implementation
//!
//! Parses files or directories and dumps their symbol tables.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::app::App;
use crate::cli::response::{FileSymbolsOutput, SymbolsResponse};

#[derive(Args, Debug)]
pub struct SymbolsArgs {
    /// Files or directories to parse (defaults to project root)
    pub paths: Vec<PathBuf>,
}

pub async fn execute(args: SymbolsArgs, app: &App) -> Result<()> {
    let ctx = &app.output;
    let project = app.parse(&args.paths).await?;

    let files: Vec<FileSymbolsOutput> = project.files().iter().map(FileSymbolsOutput::from).collect();
    let response = SymbolsResponse {
        files_count: files.len(),
        symbol_count: files.iter().map(|f| f.count).sum(),
        files,
    };

    ctx.print_either(response, || {
        let mut lines = Vec::new();
        for file in project.files() {
            lines.push(format!("=== file: {} ===", file.path.display()));
            file.dump_symbol_table(&mut lines);
        }
        lines
    });
    Ok(())
}
