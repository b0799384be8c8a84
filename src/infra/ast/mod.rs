//! AST parsing infrastructure for codeir
//!
//! Tree-sitter grammars for the six supported languages, plus the grammar
//! adapter that normalizes declaration fragments.

pub mod grammar;
pub mod node_types;

use tree_sitter::{Language as TsLanguage, Parser};

use crate::error::ParseError;
use crate::models::symbol::Language;

pub use node_types::{DeclarationKind, NodeType, declaration_kind, format_supported, get_node_types};

/// Tree-sitter grammar for a language
pub fn grammar(language: Language) -> TsLanguage {
    match language {
        Language::C => tree_sitter_c::LANGUAGE.into(),
        Language::Cpp => tree_sitter_cpp::LANGUAGE.into(),
        Language::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
        Language::Python => tree_sitter_python::LANGUAGE.into(),
        Language::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
        Language::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
    }
}

/// Fresh parser for one language
pub fn create_parser(language: Language) -> Result<Parser, ParseError> {
    let mut parser = Parser::new();
    parser
        .set_language(&grammar(language))
        .map_err(|e| ParseError::ParserInit {
            language,
            message: e.to_string(),
        })?;
    Ok(parser)
}
