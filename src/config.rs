//! Global Configuration Singleton

use std::sync::OnceLock;

use crate::models::config::CodeirConfig;

static CONFIG: OnceLock<RuntimeConfig> = OnceLock::new();

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub max_file_size_bytes: u64,
    pub respect_gitignore: bool,
    pub ignored_paths: Vec<String>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self::from(&CodeirConfig::default())
    }
}

impl From<&CodeirConfig> for RuntimeConfig {
    fn from(config: &CodeirConfig) -> Self {
        Self {
            max_file_size_bytes: config.parse.max_file_size_bytes(),
            respect_gitignore: config.parse.respect_gitignore,
            ignored_paths: config.project.ignored_paths.clone(),
        }
    }
}

pub fn init(config: &CodeirConfig) {
    let _ = CONFIG.set(RuntimeConfig::from(config));
}

pub fn max_file_size_bytes() -> u64 {
    config().max_file_size_bytes
}

pub fn respect_gitignore() -> bool {
    config().respect_gitignore
}

pub fn ignored_paths() -> Vec<String> {
    config().ignored_paths
}

pub fn is_initialized() -> bool {
    CONFIG.get().is_some()
}

fn config() -> RuntimeConfig {
    CONFIG.get().cloned().unwrap_or_default()
}
