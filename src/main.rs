//! codeir - Declaration IR CLI
//!
//! Dumps declarations, reports missing type annotations, and applies
//! generated code blocks back onto source files.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use codeir::app::App;
use codeir::cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    // Quiet by default; RUST_LOG=codeir=debug or -v for more
    let default_filter = if cli.verbose { "codeir=debug" } else { "codeir=warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!(
                r#"{{"success":false,"error":"Failed to create runtime: {}"}}"#,
                e
            );
            std::process::exit(1);
        }
    };
    let result = runtime.block_on(async_main(cli));

    if let Err(e) = result {
        let response = serde_json::json!({
            "success": false,
            "error": format!("{:#}", e)
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&response)
                .unwrap_or_else(|_| { format!(r#"{{"success":false,"error":"{}"}}"#, e) })
        );
        std::process::exit(2);
    }
}

async fn async_main(cli: Cli) -> anyhow::Result<()> {
    let app = App::new(cli.format.as_deref())
        .await
        .map_err(|e| anyhow::anyhow!("Failed to initialize: {}", e))?;

    execute_command(cli.command, &app).await
}

async fn execute_command(command: Commands, app: &App) -> anyhow::Result<()> {
    use codeir::cli::commands;

    match command {
        Commands::Symbols(args) => commands::symbols::execute(args, app).await,
        Commands::Map(args) => commands::map::execute(args, app).await,
        Commands::Missing(args) => commands::missing::execute(args, app).await,
        Commands::Apply(args) => commands::apply::execute(args, app).await,
        Commands::Nodes(args) => commands::nodes::execute(args, app).await,
        Commands::Config(args) => commands::config::execute(args, app).await,
    }
}
