//! Infrastructure layer for codeir
//!
//! Tree-sitter grammars and filesystem discovery.

pub mod ast;
pub mod file_filter;
