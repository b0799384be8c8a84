//! Configuration model for codeir

use serde::{Deserialize, Serialize};

use super::code::ReplaceMode;

/// codeir configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CodeirConfig {
    #[serde(default)]
    pub project: ProjectConfig,

    #[serde(default)]
    pub parse: ParseConfig,

    #[serde(default)]
    pub edit: EditConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

/// Project configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Project name
    pub name: Option<String>,

    /// Paths to ignore (gitignore syntax)
    #[serde(default = "default_ignored_paths")]
    pub ignored_paths: Vec<String>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: None,
            ignored_paths: default_ignored_paths(),
        }
    }
}

fn default_ignored_paths() -> Vec<String> {
    vec![
        "node_modules".to_string(),
        ".git".to_string(),
        "target".to_string(),
        "dist".to_string(),
        "build".to_string(),
        "__pycache__".to_string(),
        ".venv".to_string(),
        "venv".to_string(),
        ".codeir".to_string(),
    ]
}

mod defaults {
    // Parse
    pub fn max_file_size_mb() -> u32 {
        5
    }
    pub fn respect_gitignore() -> bool {
        true
    }

    // Output
    pub fn format() -> String {
        "json".to_string()
    }
}

/// Parsing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParseConfig {
    /// Files larger than this are skipped (0 = unlimited)
    #[serde(default = "defaults::max_file_size_mb")]
    pub max_file_size_mb: u32,

    #[serde(default = "defaults::respect_gitignore")]
    pub respect_gitignore: bool,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            max_file_size_mb: defaults::max_file_size_mb(),
            respect_gitignore: defaults::respect_gitignore(),
        }
    }
}

impl ParseConfig {
    pub fn max_file_size_bytes(&self) -> u64 {
        if self.max_file_size_mb == 0 {
            u64::MAX
        } else {
            self.max_file_size_mb as u64 * 1024 * 1024
        }
    }
}

/// Reconciliation defaults for `codeir apply`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EditConfig {
    #[serde(default)]
    pub mode: ReplaceMode,

    /// Restrict edits to functions reported as missing types
    #[serde(default)]
    pub only_missing_types: bool,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "defaults::format")]
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: defaults::format(),
        }
    }
}
