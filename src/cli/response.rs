//! Response types for CLI output
//!
//! Defines shared response types for commands.
//! All types implement Serialize for consistent JSON output.

use serde::Serialize;

use crate::models::code::{CodeEdit, Position};
use crate::models::file::File;
use crate::models::symbol::{Parameter, Statement, Symbol};
use crate::services::missing_types::{FileMissingTypes, MissingTypeEntry};

/// 1-based line and column
#[derive(Debug, Clone, Copy, Serialize)]
pub struct LocationOutput {
    pub line: u32,
    pub column: u32,
}

impl From<Position> for LocationOutput {
    fn from(position: Position) -> Self {
        Self {
            line: position.line + 1,
            column: position.column + 1,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SymbolOutput {
    pub name: String,
    pub qualified_id: String,
    pub kind: &'static str,
    pub start: LocationOutput,
    pub end: LocationOutput,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub exported: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<Parameter>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docstring: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SymbolOutput>,
}

impl SymbolOutput {
    pub fn from_symbol(symbol: &Symbol) -> Self {
        let info = symbol.info();
        let (parameters, return_type) = match symbol {
            Symbol::Function(f) => (Some(f.parameters.clone()), f.return_type.clone()),
            _ => (None, None),
        };
        let children = match symbol {
            Symbol::Class(class) => Self::from_statements(&class.body),
            _ => Vec::new(),
        };

        Self {
            name: info.name.clone(),
            qualified_id: info.qualified_id().to_string(),
            kind: symbol.kind_name(),
            start: info.range.start.into(),
            end: info.range.end.into(),
            exported: info.exported,
            parameters,
            return_type,
            docstring: (!info.docstring.is_empty()).then(|| info.docstring.clone()),
            children,
        }
    }

    pub fn from_statements(statements: &[Statement]) -> Vec<Self> {
        statements
            .iter()
            .filter_map(|s| s.symbol.as_ref())
            .map(Self::from_symbol)
            .collect()
    }
}

#[derive(Debug, Serialize)]
pub struct FileSymbolsOutput {
    pub file: String,
    pub count: usize,
    pub symbols: Vec<SymbolOutput>,
}

impl From<&File> for FileSymbolsOutput {
    fn from(file: &File) -> Self {
        Self {
            file: file.path.display().to_string(),
            count: file.symbol_count(),
            symbols: SymbolOutput::from_statements(&file.statements),
        }
    }
}

/// Response for symbols command
#[derive(Debug, Serialize)]
pub struct SymbolsResponse {
    pub files_count: usize,
    pub symbol_count: usize,
    pub files: Vec<FileSymbolsOutput>,
}

/// Response for map command
#[derive(Debug, Serialize)]
pub struct MapResponse {
    pub files_count: usize,
    pub map: String,
}

#[derive(Debug, Serialize)]
pub struct FileMissingOutput {
    pub file: String,
    pub language: String,
    pub count: usize,
    pub functions: Vec<MissingTypeEntry>,
}

impl From<&FileMissingTypes> for FileMissingOutput {
    fn from(report: &FileMissingTypes) -> Self {
        Self {
            file: report.path.display().to_string(),
            language: report.language.to_string(),
            count: report.total(),
            functions: report.missing_types.iter().map(MissingTypeEntry::from).collect(),
        }
    }
}

/// Response for missing command
#[derive(Debug, Serialize)]
pub struct MissingTypesResponse {
    pub files_count: usize,
    pub total: usize,
    pub files: Vec<FileMissingOutput>,
}

#[derive(Debug, Serialize)]
pub struct EditOutput {
    pub start: usize,
    pub end: usize,
    pub new_text: String,
}

impl From<&CodeEdit> for EditOutput {
    fn from(edit: &CodeEdit) -> Self {
        Self {
            start: edit.substring.start,
            end: edit.substring.end,
            new_text: edit.new_text(),
        }
    }
}

/// Response for apply command
#[derive(Debug, Serialize)]
pub struct ApplyResponse {
    pub file: String,
    pub mode: String,
    pub dry_run: bool,
    pub written: bool,
    pub blocks: usize,
    pub replaced: Vec<String>,
    pub edits: Vec<EditOutput>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::code::Code;
    use crate::models::symbol::Language;
    use crate::services::parser::DeclarationParser;

    #[test]
    fn test_symbol_output_nests_class_members() {
        let file = DeclarationParser::new()
            .parse(
                "a.py",
                &Code::from("class A:\n    def m(self, x: int) -> int:\n        return x\n"),
                Language::Python,
            )
            .unwrap();

        let output = FileSymbolsOutput::from(&file);
        assert_eq!(output.count, 2);
        assert_eq!(output.symbols.len(), 1);

        let class = &output.symbols[0];
        assert_eq!(class.kind, "class");
        assert_eq!(class.start.line, 1);
        assert_eq!(class.children[0].qualified_id, "A.m");
        assert_eq!(class.children[0].return_type.as_deref(), Some("int"));
        assert_eq!(class.children[0].start.line, 2);
        assert_eq!(class.children[0].start.column, 5);
    }

    #[test]
    fn test_symbol_output_json_shape() {
        let file = DeclarationParser::new()
            .parse("a.ts", &Code::from("function f(x?: string) {}\n"), Language::TypeScript)
            .unwrap();
        let json = serde_json::to_value(FileSymbolsOutput::from(&file)).unwrap();
        let symbol = &json["symbols"][0];
        assert_eq!(symbol["kind"], "function");
        assert_eq!(symbol["parameters"][0]["name"], "x");
        assert_eq!(symbol["parameters"][0]["type"], "string");
        assert_eq!(symbol["parameters"][0]["is_optional"], true);
        assert!(symbol.get("children").is_none());
        assert!(symbol.get("exported").is_none());
    }
}
