//! Project service for codeir
//!
//! Discovers source files and parses them concurrently on the blocking pool.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use futures::future::join_all;

use crate::error::{CodeirError, CodeirResult, ProjectError};
use crate::infra::file_filter::{FileFilter, FileFilterConfig};
use crate::models::code::Code;
use crate::models::file::{File, Project};
use crate::models::symbol::Language;
use crate::services::parser::DeclarationParser;

#[async_trait]
pub trait ProjectService: Send + Sync {
    /// Parse the given files and directories into one project
    async fn parse_paths(&self, paths: &[PathBuf]) -> Result<Project, ProjectError>;

    /// Parse every supported file under the project root
    async fn parse_project(&self) -> Result<Project, ProjectError>;

    /// Languages present under the project root
    fn detect_languages(&self) -> Vec<Language>;
}

pub struct DefaultProjectService {
    root: PathBuf,
}

impl DefaultProjectService {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }

    fn filter_for(&self, dir: &Path) -> FileFilter {
        FileFilter::new(FileFilterConfig {
            root: dir.to_path_buf(),
            respect_gitignore: crate::config::respect_gitignore(),
            ignore_patterns: crate::config::ignored_paths(),
        })
    }

    /// Expand directories and keep files with a supported extension
    fn collect_sources(&self, paths: &[PathBuf]) -> Result<Vec<(PathBuf, Language)>, ProjectError> {
        if paths.is_empty() {
            return Err(ProjectError::NoPaths);
        }

        // keyed by path: sorted and deduplicated
        let mut sources = BTreeMap::new();
        for path in paths {
            let path = if path.is_absolute() {
                path.clone()
            } else {
                self.root.join(path)
            };

            if path.is_dir() {
                sources.extend(self.filter_for(&path).discover_sources());
            } else if path.is_file() {
                match Language::from_path(&path) {
                    Some(language) => {
                        sources.insert(path, language);
                    }
                    None => tracing::warn!("Skipping {}: unsupported extension", path.display()),
                }
            } else {
                return Err(ProjectError::NotFound(path));
            }
        }
        Ok(sources.into_iter().collect())
    }

    fn relative_path(&self, path: &Path) -> PathBuf {
        path.strip_prefix(&self.root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.to_path_buf())
    }

    async fn parse_sources(&self, sources: Vec<(PathBuf, Language)>) -> Result<Project, ProjectError> {
        let max_size = crate::config::max_file_size_bytes();

        let tasks = sources.into_iter().map(|(path, language)| {
            let relative = self.relative_path(&path);
            tokio::task::spawn_blocking(move || {
                let result = parse_file(&path, relative, language, max_size);
                (path, result)
            })
        });

        let mut project = Project::new(&self.root);
        for joined in join_all(tasks).await {
            let (path, result) = joined.map_err(|e| ProjectError::Task(e.to_string()))?;
            match result {
                Ok(Some(file)) => project.add_file(file),
                Ok(None) => {}
                Err(e) => tracing::warn!("Skipping {}: {}", path.display(), e),
            }
        }

        tracing::info!("Parsed {} file(s)", project.files().len());
        Ok(project)
    }
}

/// Read and parse one file; `None` when it exceeds the size limit
pub fn parse_file(
    path: &Path,
    relative: PathBuf,
    language: Language,
    max_size: u64,
) -> CodeirResult<Option<File>> {
    let size = std::fs::metadata(path)?.len();
    if size > max_size {
        tracing::warn!(
            "Skipping {}: {} bytes exceeds the {} byte limit",
            path.display(),
            size,
            max_size
        );
        return Ok(None);
    }

    let code = Code::new(std::fs::read(path)?);
    let file = DeclarationParser::new()
        .parse(relative, &code, language)
        .map_err(CodeirError::from)?;
    Ok(Some(file))
}

#[async_trait]
impl ProjectService for DefaultProjectService {
    async fn parse_paths(&self, paths: &[PathBuf]) -> Result<Project, ProjectError> {
        let sources = self.collect_sources(paths)?;
        self.parse_sources(sources).await
    }

    async fn parse_project(&self) -> Result<Project, ProjectError> {
        self.parse_paths(std::slice::from_ref(&self.root)).await
    }

    fn detect_languages(&self) -> Vec<Language> {
        let mut languages = HashSet::new();

        let walker = walkdir::WalkDir::new(&self.root)
            .max_depth(5)
            .into_iter()
            .filter_entry(|e| {
                let name = e.file_name().to_string_lossy();
                e.depth() == 0
                    || (!name.starts_with('.')
                        && !crate::infra::file_filter::DEFAULT_IGNORE_PATTERNS
                            .contains(&name.as_ref()))
            });

        for entry in walker.filter_map(|e| e.ok()) {
            if entry.file_type().is_file()
                && let Some(language) = Language::from_path(entry.path())
            {
                languages.insert(language);
            }
        }

        let mut languages: Vec<Language> = languages.into_iter().collect();
        languages.sort();
        languages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn fixture() -> TempDir {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("src")).unwrap();
        fs::write(root.join("src/app.py"), "def run(x):\n    return x\n").unwrap();
        fs::write(root.join("src/util.ts"), "export function id(x: number): number { return x; }\n").unwrap();
        fs::write(root.join("main.c"), "int main(void) { return 0; }\n").unwrap();
        fs::write(root.join("README.md"), "# readme\n").unwrap();
        temp
    }

    #[tokio::test]
    async fn test_parse_project_sorted_relative_paths() {
        let temp = fixture();
        let service = DefaultProjectService::new(temp.path());

        let project = service.parse_project().await.unwrap();
        let paths: Vec<PathBuf> = project.files().iter().map(|f| f.path.clone()).collect();
        assert_eq!(
            paths,
            vec![
                PathBuf::from("main.c"),
                PathBuf::from("src/app.py"),
                PathBuf::from("src/util.ts"),
            ]
        );
        assert_eq!(project.files()[1].function_declarations()[0].name(), "run");
    }

    #[tokio::test]
    async fn test_parse_paths_single_file() {
        let temp = fixture();
        let service = DefaultProjectService::new(temp.path());

        let project = service
            .parse_paths(&[PathBuf::from("src/util.ts")])
            .await
            .unwrap();
        assert_eq!(project.files().len(), 1);
        assert!(project.files()[0].function_declarations()[0].info.exported);
    }

    #[tokio::test]
    async fn test_parse_paths_errors() {
        let temp = fixture();
        let service = DefaultProjectService::new(temp.path());

        assert!(matches!(
            service.parse_paths(&[]).await,
            Err(ProjectError::NoPaths)
        ));
        assert!(matches!(
            service.parse_paths(&[PathBuf::from("missing.py")]).await,
            Err(ProjectError::NotFound(_))
        ));
        // unsupported files are skipped, not fatal
        let project = service
            .parse_paths(&[PathBuf::from("README.md")])
            .await
            .unwrap();
        assert!(project.files().is_empty());
    }

    #[test]
    fn test_parse_file_respects_size_limit() {
        let temp = fixture();
        let path = temp.path().join("main.c");
        assert!(parse_file(&path, "main.c".into(), Language::C, 4).unwrap().is_none());
        let file = parse_file(&path, "main.c".into(), Language::C, u64::MAX)
            .unwrap()
            .unwrap();
        assert_eq!(file.symbol_count(), 1);
    }

    #[test]
    fn test_detect_languages() {
        let temp = fixture();
        let service = DefaultProjectService::new(temp.path());
        assert_eq!(
            service.detect_languages(),
            vec![Language::C, Language::Python, Language::TypeScript]
        );
    }
}
