//! Application container for codeir

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::cli::{OutputContext, OutputFormat};
use crate::config;
use crate::models::config::CodeirConfig;
use crate::models::file::Project;
use crate::services::config::{ConfigService, DefaultConfigService};
use crate::services::project::{DefaultProjectService, ProjectService};

pub struct App {
    root: PathBuf,
    pub(crate) output: OutputContext,
    pub(crate) project: Arc<dyn ProjectService>,
    pub(crate) config_service: Arc<dyn ConfigService>,
    pub(crate) config: CodeirConfig,
}

impl App {
    pub async fn new(format: Option<&str>) -> anyhow::Result<Self> {
        let root = std::env::current_dir()?;
        Self::with_root(root, format).await
    }

    pub async fn with_root(root: PathBuf, format: Option<&str>) -> anyhow::Result<Self> {
        tracing::debug!("Initializing codeir at {:?}", root);

        let config_service = Arc::new(DefaultConfigService::new(&root));
        let config = match config_service.load(false).await {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Using default config: {}", e);
                CodeirConfig::default()
            }
        };

        // Initialize global config singleton
        config::init(&config);

        let format: OutputFormat = format
            .unwrap_or(config.output.format.as_str())
            .parse()
            .map_err(|e: String| anyhow::anyhow!(e))?;
        let output = OutputContext::new(root.clone(), format);
        let project = Arc::new(DefaultProjectService::new(&root));

        Ok(Self {
            root,
            output,
            project,
            config_service,
            config,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &CodeirConfig {
        &self.config
    }

    /// Parse the given paths, or the whole project when none are given
    pub async fn parse(&self, paths: &[PathBuf]) -> anyhow::Result<Project> {
        let project = if paths.is_empty() {
            self.project.parse_project().await?
        } else {
            self.project.parse_paths(paths).await?
        };
        Ok(project)
    }
}
