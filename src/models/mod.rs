//! Data models for codeir
//!
//! The IR: source buffers and edits, symbols, and per-file symbol tables.

pub mod code;
pub mod config;
pub mod file;
pub mod symbol;

// Re-export commonly used types
pub use code::{Code, CodeEdit, Position, Range, ReplaceMode, Substring};
pub use config::CodeirConfig;
pub use file::{File, Project};
pub use symbol::{
    ClassDeclaration, FunctionDeclaration, Language, Parameter, QualifiedId, Scope, Statement,
    Symbol, SymbolInfo, TypeDeclaration,
};
