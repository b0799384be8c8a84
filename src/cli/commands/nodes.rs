//! Nodes command implementation
//!
//! Lists the tree-sitter node types recognized as declarations.

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use crate::app::App;
use crate::error::ParseError;
use crate::infra::ast::{format_supported, get_node_types};
use crate::models::symbol::Language;

#[derive(Args, Debug)]
pub struct NodesArgs {
    /// Language to list node types for
    #[arg(short, long = "lang")]
    pub language: String,
}

#[derive(Serialize)]
struct NodesResponse {
    language: String,
    count: usize,
    node_types: Vec<NodeTypeOutput>,
}

#[derive(Serialize)]
struct NodeTypeOutput {
    category: &'static str,
    node_type: &'static str,
    example: &'static str,
}

pub async fn execute(args: NodesArgs, app: &App) -> Result<()> {
    let language: Language = args
        .language
        .parse()
        .map_err(|_| ParseError::UnsupportedLanguage(args.language.clone()))?;

    let node_types: Vec<NodeTypeOutput> = get_node_types(language)
        .iter()
        .map(|n| NodeTypeOutput {
            category: n.category,
            node_type: n.node_type,
            example: n.example,
        })
        .collect();

    app.output.print_either(
        NodesResponse {
            language: language.to_string(),
            count: node_types.len(),
            node_types,
        },
        || vec![format_supported(language)],
    );
    Ok(())
}
