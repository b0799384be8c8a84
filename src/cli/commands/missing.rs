//! Missing command implementation
//!
//! Reports functions lacking parameter or return type annotations.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::app::App;
use crate::cli::response::{FileMissingOutput, MissingTypesResponse};
use crate::services::missing_types::files_missing_types_in_project;

#[derive(Args, Debug)]
pub struct MissingArgs {
    /// Files or directories to check (defaults to project root)
    pub paths: Vec<PathBuf>,
}

pub async fn execute(args: MissingArgs, app: &App) -> Result<()> {
    let project = app.parse(&args.paths).await?;
    let reports = files_missing_types_in_project(&project);

    let files: Vec<FileMissingOutput> = reports.iter().map(FileMissingOutput::from).collect();
    let response = MissingTypesResponse {
        files_count: files.len(),
        total: files.iter().map(|f| f.count).sum(),
        files,
    };

    app.output.print_either(response, || {
        let mut lines = Vec::new();
        for report in &reports {
            lines.push(format!("File: {}", report.path.display()));
            for missing in &report.missing_types {
                lines.push(format!("  {}", missing));
            }
            lines.push(String::new());
        }
        lines
    });
    Ok(())
}
