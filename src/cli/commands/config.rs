//! Config command implementation

use anyhow::Result;
use clap::{Args, Subcommand};
use serde::Serialize;

use crate::app::App;
use crate::models::config::CodeirConfig;

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Initialize configuration file
    Init {
        /// Initialize global config (~/.config/codeir)
        #[arg(long)]
        global: bool,

        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },

    /// Show current configuration
    Show {
        /// Show global config only
        #[arg(long)]
        global: bool,
    },

    /// Show config file path
    Path {
        /// Show global config path
        #[arg(long)]
        global: bool,
    },
}

#[derive(Serialize)]
struct ConfigInitResponse {
    status: String,
    path: String,
    level: &'static str,
}

#[derive(Serialize)]
struct ConfigShowResponse<'a> {
    level: &'static str,
    config: &'a CodeirConfig,
}

#[derive(Serialize)]
struct ConfigPathResponse {
    level: &'static str,
    path: String,
    exists: bool,
}

pub async fn execute(args: ConfigArgs, app: &App) -> Result<()> {
    let ctx = &app.output;

    match args.command {
        ConfigCommand::Init { global, force } => {
            let level = if global { "global" } else { "project" };
            match app.config_service.init(global, force).await {
                Ok(path) => {
                    let path = if global {
                        path.display().to_string()
                    } else {
                        ctx.relative_path(&path)
                    };
                    let line = format!("Created {} config: {}", level, path);
                    let response = ConfigInitResponse {
                        status: "created".to_string(),
                        path,
                        level,
                    };
                    ctx.print_either(response, || vec![line]);
                }
                Err(e) => ctx.print_error(&e.to_string()),
            }
        }

        ConfigCommand::Show { global } => {
            let level = if global { "global" } else { "merged" };
            match app.config_service.load(global).await {
                Ok(config) => {
                    let text = toml::to_string_pretty(&config)?;
                    ctx.print_either(
                        ConfigShowResponse {
                            level,
                            config: &config,
                        },
                        || vec![text],
                    );
                }
                Err(e) => ctx.print_error(&e.to_string()),
            }
        }

        ConfigCommand::Path { global } => {
            let level = if global { "global" } else { "project" };
            let path = app.config_service.config_path(global);
            let exists = path.exists();
            let path = if global {
                path.display().to_string()
            } else {
                ctx.relative_path(&path)
            };
            let line = path.clone();
            ctx.print_either(
                ConfigPathResponse {
                    level,
                    path,
                    exists,
                },
                || vec![line],
            );
        }
    }

    Ok(())
}
