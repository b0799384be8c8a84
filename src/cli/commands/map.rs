//! Map command implementation
//!
//! Prints each file's declarations without bodies, members indented under
//! their class.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::app::App;
use crate::cli::response::MapResponse;

#[derive(Args, Debug)]
pub struct MapArgs {
    /// Files or directories to parse (defaults to project root)
    pub paths: Vec<PathBuf>,
}

pub async fn execute(args: MapArgs, app: &App) -> Result<()> {
    let project = app.parse(&args.paths).await?;
    let map = project.dump_map(0);

    app.output.print_either(
        MapResponse {
            files_count: project.files().len(),
            map: map.clone(),
        },
        || vec![map],
    );
    Ok(())
}
