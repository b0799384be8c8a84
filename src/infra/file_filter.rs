//! Source discovery with .gitignore integration
//!
//! Uses the `ignore` crate (from ripgrep) to walk a project, honoring
//! .gitignore files, `.codeir/ignore`, and the configured ignored paths.

use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use ignore::gitignore::{Gitignore, GitignoreBuilder};

use crate::models::symbol::Language;

/// Project-local ignore file, gitignore syntax
pub const PROJECT_IGNORE_FILE: &str = ".codeir/ignore";

#[derive(Debug, Clone)]
pub struct FileFilterConfig {
    pub root: PathBuf,
    pub respect_gitignore: bool,
    /// Extra patterns from config (gitignore syntax)
    pub ignore_patterns: Vec<String>,
}

impl Default for FileFilterConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::new(),
            respect_gitignore: true,
            ignore_patterns: Vec::new(),
        }
    }
}

pub struct FileFilter {
    config: FileFilterConfig,
    patterns: Option<Gitignore>,
}

impl FileFilter {
    pub fn new(config: FileFilterConfig) -> Self {
        let patterns = Self::build_patterns(&config);
        Self { config, patterns }
    }

    pub fn with_gitignore(root: impl AsRef<Path>) -> Self {
        Self::new(FileFilterConfig {
            root: root.as_ref().to_path_buf(),
            ..Default::default()
        })
    }

    /// `.codeir/ignore` plus configured patterns as one matcher
    fn build_patterns(config: &FileFilterConfig) -> Option<Gitignore> {
        let ignore_path = config.root.join(PROJECT_IGNORE_FILE);
        if config.ignore_patterns.is_empty() && !ignore_path.exists() {
            return None;
        }

        let mut builder = GitignoreBuilder::new(&config.root);
        if ignore_path.exists()
            && let Some(err) = builder.add(&ignore_path)
        {
            tracing::warn!("Failed to parse {}: {}", PROJECT_IGNORE_FILE, err);
        }
        for pattern in &config.ignore_patterns {
            if let Err(e) = builder.add_line(None, pattern) {
                tracing::warn!("Invalid ignore pattern '{}': {}", pattern, e);
            }
        }

        match builder.build() {
            Ok(gitignore) => Some(gitignore),
            Err(e) => {
                tracing::warn!("Failed to build ignore patterns: {}", e);
                None
            }
        }
    }

    pub fn is_ignored(&self, path: &Path) -> bool {
        let relative = match path.strip_prefix(&self.config.root) {
            Ok(relative) => relative,
            Err(_) if path.is_relative() => path,
            // outside the project
            Err(_) => return false,
        };

        for component in relative.components() {
            if let std::path::Component::Normal(name) = component
                && let Some(name) = name.to_str()
                && DEFAULT_IGNORE_PATTERNS.contains(&name)
            {
                return true;
            }
        }

        match &self.patterns {
            Some(patterns) => patterns
                .matched_path_or_any_parents(relative, path.is_dir())
                .is_ignore(),
            None => false,
        }
    }

    pub fn should_include(&self, path: &Path) -> bool {
        !self.is_ignored(path)
    }

    fn walk_builder(&self) -> WalkBuilder {
        let mut builder = WalkBuilder::new(&self.config.root);
        builder
            .hidden(true)
            .git_ignore(self.config.respect_gitignore)
            .git_global(self.config.respect_gitignore)
            .git_exclude(self.config.respect_gitignore)
            // honor .gitignore outside of a git checkout too
            .require_git(false);
        builder
    }

    /// Files under the root with one of `extensions`, sorted by path
    pub fn discover_files(&self, extensions: &[&str]) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = self
            .walk_builder()
            .build()
            .filter_map(|e| e.ok())
            .map(|entry| entry.into_path())
            .filter(|path| path.is_file())
            .filter(|path| {
                let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
                extensions.is_empty() || extensions.contains(&ext)
            })
            .filter(|path| self.should_include(path))
            .collect();
        files.sort();
        files
    }

    /// Files with a supported language, paired with that language
    pub fn discover_sources(&self) -> Vec<(PathBuf, Language)> {
        self.discover_files(&Language::all_extensions())
            .into_iter()
            .filter_map(|path| Language::from_path(&path).map(|language| (path, language)))
            .collect()
    }
}

/// Directory names never worth parsing
pub const DEFAULT_IGNORE_PATTERNS: &[&str] = &[
    ".git",
    ".hg",
    ".svn",
    "node_modules",
    "__pycache__",
    ".venv",
    "venv",
    ".tox",
    ".pytest_cache",
    ".mypy_cache",
    ".codeir",
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_gitignore_integration() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();

        fs::write(root.join(".gitignore"), "generated/\n").unwrap();
        fs::write(root.join("main.py"), "def main(): pass").unwrap();
        fs::create_dir(root.join("generated")).unwrap();
        fs::write(root.join("generated/out.py"), "x = 1").unwrap();

        let filter = FileFilter::with_gitignore(root);
        let files = filter.discover_files(&["py"]);

        assert_eq!(files, vec![root.join("main.py")]);
    }

    #[test]
    fn test_project_ignore_and_config_patterns() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();

        fs::create_dir(root.join(".codeir")).unwrap();
        fs::write(root.join(".codeir/ignore"), "*_test.py\n").unwrap();
        fs::write(root.join("lib.py"), "").unwrap();
        fs::write(root.join("lib_test.py"), "").unwrap();
        fs::create_dir(root.join("dist")).unwrap();
        fs::write(root.join("dist/bundle.js"), "").unwrap();

        let filter = FileFilter::new(FileFilterConfig {
            root: root.to_path_buf(),
            respect_gitignore: true,
            ignore_patterns: vec!["dist".to_string()],
        });

        assert!(filter.should_include(&root.join("lib.py")));
        assert!(!filter.should_include(&root.join("lib_test.py")));
        assert!(!filter.should_include(&root.join("dist/bundle.js")));
    }

    #[test]
    fn test_discover_sources_detects_languages() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();

        fs::write(root.join("a.c"), "").unwrap();
        fs::write(root.join("b.tsx"), "").unwrap();
        fs::write(root.join("notes.md"), "").unwrap();
        fs::create_dir(root.join("node_modules")).unwrap();
        fs::write(root.join("node_modules/dep.js"), "").unwrap();

        let sources = FileFilter::with_gitignore(root).discover_sources();
        assert_eq!(
            sources,
            vec![
                (root.join("a.c"), Language::C),
                (root.join("b.tsx"), Language::Tsx),
            ]
        );
    }
}
