//! Error types for codeir

use thiserror::Error;

use crate::models::code::Substring;
use crate::models::symbol::Language;

pub type CodeirResult<T> = std::result::Result<T, CodeirError>;

#[derive(Debug, Error)]
pub enum CodeirError {
    #[error("{0}")]
    Parse(#[from] ParseError),

    #[error("{0}")]
    Declarator(#[from] DeclaratorError),

    #[error("{0}")]
    Edit(#[from] EditError),

    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Project(#[from] ProjectError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Unsupported language: {0}. Supported: c, cpp, javascript, python, typescript, tsx")]
    UnsupportedLanguage(String),

    #[error("Failed to load {language} grammar: {message}")]
    ParserInit { language: Language, message: String },

    #[error("Failed to parse {0} source")]
    ParseFailed(Language),
}

/// Failure to reconstruct a C/C++ type from its declarator chain.
///
/// Scoped to a single parameter or function; callers drop the offending item
/// and keep going.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeclaratorError {
    #[error("Unknown declarator: {kind}")]
    UnknownDeclarator { kind: String },

    #[error("Could not find type node in {0}")]
    MissingType(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("Edit {start}..{end} is out of bounds for a buffer of {len} bytes")]
    OutOfBounds { start: usize, end: usize, len: usize },

    #[error("Edits {first} and {second} overlap")]
    Overlapping { first: Substring, second: Substring },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config parse error: {0}")]
    Parse(String),

    #[error("Invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("No paths provided")]
    NoPaths,

    #[error("Path not found: {0}")]
    NotFound(std::path::PathBuf),

    #[error("Parse task failed: {0}")]
    Task(String),
}
