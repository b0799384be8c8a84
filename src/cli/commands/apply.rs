//! Apply command implementation
//!
//! Reconciles a generated response (fenced code blocks) against a source
//! file and writes the result back.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tokio::io::AsyncReadExt;

use crate::app::App;
use crate::cli::response::{ApplyResponse, EditOutput};
use crate::error::ParseError;
use crate::models::code::{Code, ReplaceMode};
use crate::models::symbol::Language;
use crate::services::response::Reconciler;

#[derive(Args, Debug)]
pub struct ApplyArgs {
    /// Source file to update
    pub file: PathBuf,

    /// Response text containing code blocks ('-' reads stdin)
    #[arg(short, long)]
    pub response: String,

    /// Keep existing bodies, replace only signatures
    #[arg(long)]
    pub signature_only: bool,

    /// Only replace functions that are missing type annotations
    #[arg(long)]
    pub only_missing: bool,

    /// Report edits without writing the file
    #[arg(long)]
    pub dry_run: bool,

    /// Language override (detected from the extension by default)
    #[arg(short, long = "lang")]
    pub language: Option<String>,
}

async fn read_response(source: &str) -> Result<String> {
    if source == "-" {
        let mut text = String::new();
        tokio::io::stdin()
            .read_to_string(&mut text)
            .await
            .context("Failed to read response from stdin")?;
        return Ok(text);
    }
    tokio::fs::read_to_string(source)
        .await
        .with_context(|| format!("Failed to read response: {}", source))
}

pub async fn execute(args: ApplyArgs, app: &App) -> Result<()> {
    let ctx = &app.output;
    let path = app.root().join(&args.file);

    let language = match &args.language {
        Some(name) => name
            .parse::<Language>()
            .map_err(|_| ParseError::UnsupportedLanguage(name.clone()))?,
        None => Language::from_path(&path)
            .ok_or_else(|| ParseError::UnsupportedLanguage(path.display().to_string()))?,
    };

    let document = Code::new(
        tokio::fs::read(&path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?,
    );
    let response = read_response(&args.response).await?;

    let config = &app.config().edit;
    let mut reconciler = Reconciler::from_config(config);
    if args.signature_only {
        reconciler = Reconciler::new(ReplaceMode::SignatureOnly);
    }
    let reconciler =
        reconciler.only_missing_types(args.only_missing || config.only_missing_types);
    let reconciliation = reconciler.reconcile(&response, &document, language)?;

    let written = !args.dry_run && !reconciliation.is_unchanged();
    if written {
        tokio::fs::write(&path, reconciliation.code.bytes())
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }

    let replaced: Vec<String> = reconciliation
        .replaced
        .iter()
        .map(|qid| qid.to_string())
        .collect();
    let response = ApplyResponse {
        file: ctx.relative_path(&path),
        mode: reconciler.mode().to_string(),
        dry_run: args.dry_run,
        written,
        blocks: reconciliation.blocks,
        replaced: replaced.clone(),
        edits: reconciliation.edits.iter().map(EditOutput::from).collect(),
    };

    ctx.print_either(response, || {
        if args.dry_run {
            vec![reconciliation.code.to_string()]
        } else {
            replaced
                .iter()
                .map(|name| format!("replaced {}", name))
                .collect()
        }
    });
    Ok(())
}
