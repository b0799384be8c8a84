//! Configuration service for codeir

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::ConfigError;
use crate::models::config::{CodeirConfig, ProjectConfig};

#[async_trait]
pub trait ConfigService: Send + Sync {
    async fn load(&self, global_only: bool) -> Result<CodeirConfig, ConfigError>;
    fn config_path(&self, global: bool) -> PathBuf;
    async fn init(&self, global: bool, force: bool) -> Result<PathBuf, ConfigError>;
}

pub struct DefaultConfigService {
    root: PathBuf,
}

impl DefaultConfigService {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }

    fn global_config_path() -> PathBuf {
        // XDG standard: ~/.config/codeir/config.toml
        std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .ok()
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
            .unwrap_or_else(|| PathBuf::from("."))
            .join("codeir")
            .join("config.toml")
    }

    fn project_config_path(&self) -> PathBuf {
        self.root.join(".codeir").join("config.toml")
    }

    async fn load_from_path(path: &Path) -> Result<Option<CodeirConfig>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }
        let content = tokio::fs::read_to_string(path).await?;
        toml::from_str(&content)
            .map(Some)
            .map_err(|e| ConfigError::Parse(format!("{}: {}", path.display(), e)))
    }

    async fn write_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let config = CodeirConfig::default();
        let content =
            toml::to_string_pretty(&config).map_err(|e| ConfigError::Parse(e.to_string()))?;
        tokio::fs::write(path, content).await?;
        Ok(())
    }
}

#[async_trait]
impl ConfigService for DefaultConfigService {
    async fn load(&self, global_only: bool) -> Result<CodeirConfig, ConfigError> {
        let global = Self::load_from_path(&Self::global_config_path()).await?;
        if global_only {
            return Ok(global.unwrap_or_default());
        }

        let project = Self::load_from_path(&self.project_config_path()).await?;
        let config = match (global, project) {
            (Some(base), Some(overlay)) => merge_config(base, overlay),
            (base, overlay) => overlay.or(base).unwrap_or_default(),
        };
        apply_env_overrides(config)
    }

    fn config_path(&self, global: bool) -> PathBuf {
        if global {
            Self::global_config_path()
        } else {
            self.project_config_path()
        }
    }

    async fn init(&self, global: bool, force: bool) -> Result<PathBuf, ConfigError> {
        let path = self.config_path(global);

        if path.exists() && !force {
            return Err(ConfigError::InvalidValue {
                key: "config".to_string(),
                message: format!(
                    "Config already exists: {}. Use --force to overwrite.",
                    path.display()
                ),
            });
        }

        Self::write_default_config(&path).await?;
        Ok(path)
    }
}

/// Project settings win; the project name falls back to the global one
fn merge_config(base: CodeirConfig, overlay: CodeirConfig) -> CodeirConfig {
    CodeirConfig {
        project: ProjectConfig {
            name: overlay.project.name.or(base.project.name),
            ignored_paths: overlay.project.ignored_paths,
        },
        parse: overlay.parse,
        edit: overlay.edit,
        output: overlay.output,
    }
}

fn apply_env_overrides(mut config: CodeirConfig) -> Result<CodeirConfig, ConfigError> {
    if let Ok(val) = std::env::var("CODEIR_OUTPUT_FORMAT") {
        config.output.format = val;
    }
    if let Ok(val) = std::env::var("CODEIR_MAX_FILE_SIZE_MB") {
        config.parse.max_file_size_mb = val.parse().map_err(|_| ConfigError::InvalidValue {
            key: "CODEIR_MAX_FILE_SIZE_MB".to_string(),
            message: format!("expected a number, got '{}'", val),
        })?;
    }
    if let Ok(val) = std::env::var("CODEIR_REPLACE_MODE") {
        config.edit.mode = val.parse().map_err(|message| ConfigError::InvalidValue {
            key: "CODEIR_REPLACE_MODE".to_string(),
            message,
        })?;
    }
    Ok(config)
}
