//! Per-file IR and project container

use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use super::code::Code;
use super::symbol::{FunctionDeclaration, Language, QualifiedId, Statement, Symbol};

/// IR of one parsed buffer
///
/// Created empty and populated by a single parse pass. Re-parsing after an
/// edit means building a fresh `File`.
#[derive(Debug, Clone, Default)]
pub struct File {
    /// Path relative to the project root
    pub path: PathBuf,
    pub statements: Vec<Statement>,
    symbol_table: IndexMap<QualifiedId, Symbol>,
}

impl File {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            statements: Vec::new(),
            symbol_table: IndexMap::new(),
        }
    }

    pub fn lookup_symbol(&self, qid: &QualifiedId) -> Option<&Symbol> {
        self.symbol_table.get(qid)
    }

    /// All symbols with the given bare name, regardless of scope
    pub fn search_symbol(&self, name: &str) -> Vec<&Symbol> {
        self.symbol_table
            .values()
            .filter(|symbol| symbol.name() == name)
            .collect()
    }

    /// Register a symbol; a later symbol with the same id replaces the
    /// earlier one in place.
    pub fn add_symbol(&mut self, symbol: Symbol) {
        let qid = symbol.qualified_id();
        if let Some(previous) = self.symbol_table.insert(qid.clone(), symbol) {
            tracing::debug!(
                "Duplicate declaration {} in {} (previous at {})",
                qid,
                self.path.display(),
                previous.info().substring
            );
        }
    }

    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.symbol_table.values()
    }

    pub fn symbol_count(&self) -> usize {
        self.symbol_table.len()
    }

    /// Function declarations in insertion order
    pub fn function_declarations(&self) -> Vec<&FunctionDeclaration> {
        self.symbol_table
            .values()
            .filter_map(Symbol::as_function)
            .collect()
    }

    /// Buffer and language of this file, taken from its first symbol
    pub fn source(&self) -> Option<(&Code, Language)> {
        self.symbol_table
            .values()
            .next()
            .map(|s| (&s.info().code, s.info().language))
    }

    pub fn dump_symbol_table(&self, lines: &mut Vec<String>) {
        for symbol in self.symbol_table.values() {
            symbol.dump(lines);
        }
    }

    /// Outline of declarations without bodies, nested members indented
    pub fn dump_map(&self, indent: usize, lines: &mut Vec<String>) {
        for statement in &self.statements {
            dump_statement_map(statement, indent, lines);
        }
    }

    /// Flat list of declarations without bodies
    pub fn dump_elements(&self, elements: &mut Vec<String>) {
        for statement in &self.statements {
            dump_statement_elements(statement, elements);
        }
    }
}

fn signature_text(symbol: &Symbol) -> String {
    String::from_utf8_lossy(symbol.info().get_substring_without_body()).into_owned()
}

fn dump_statement_map(statement: &Statement, indent: usize, lines: &mut Vec<String>) {
    let Some(symbol) = &statement.symbol else {
        return;
    };
    lines.push(format!("{}{}", " ".repeat(indent), signature_text(symbol)));
    if let Symbol::Class(class) = symbol {
        for child in &class.body {
            dump_statement_map(child, indent + 2, lines);
        }
    }
}

fn dump_statement_elements(statement: &Statement, elements: &mut Vec<String>) {
    let Some(symbol) = &statement.symbol else {
        return;
    };
    elements.push(signature_text(symbol));
    if let Symbol::Class(class) = symbol {
        for child in &class.body {
            dump_statement_elements(child, elements);
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Project {
    pub root_path: PathBuf,
    files: Vec<File>,
}

impl Project {
    pub fn new(root_path: impl Into<PathBuf>) -> Self {
        Self {
            root_path: root_path.into(),
            files: Vec::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root_path
    }

    pub fn add_file(&mut self, file: File) {
        self.files.push(file);
    }

    pub fn files(&self) -> &[File] {
        &self.files
    }

    pub fn into_files(self) -> Vec<File> {
        self.files
    }

    pub fn dump_map(&self, indent: usize) -> String {
        let mut lines = Vec::new();
        for file in &self.files {
            lines.push(format!("{}File: {}", " ".repeat(indent), file.path.display()));
            file.dump_map(indent + 2, &mut lines);
        }
        lines.join("\n")
    }

    pub fn dump_elements(&self) -> Vec<String> {
        let mut elements = Vec::new();
        for file in &self.files {
            file.dump_elements(&mut elements);
        }
        elements
    }
}
