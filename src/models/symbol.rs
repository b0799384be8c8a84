//! Symbol model definitions
//!
//! Normalized declaration records extracted from one parse of one buffer.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use super::code::{Code, Range, Substring};

/// Languages with a declaration grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    C,
    Cpp,
    JavaScript,
    Python,
    TypeScript,
    Tsx,
}

impl Language {
    /// Detect language from file extension, `None` when not applicable
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "c" => Some(Self::C),
            "cpp" | "cc" | "cxx" | "c++" => Some(Self::Cpp),
            "js" => Some(Self::JavaScript),
            "py" => Some(Self::Python),
            "ts" => Some(Self::TypeScript),
            "tsx" => Some(Self::Tsx),
            _ => None,
        }
    }

    /// Detect language from file path
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Self::C => &["c"],
            Self::Cpp => &["cpp", "cc", "cxx", "c++"],
            Self::JavaScript => &["js"],
            Self::Python => &["py"],
            Self::TypeScript => &["ts"],
            Self::Tsx => &["tsx"],
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            Self::C => "c",
            Self::Cpp => "cpp",
            Self::JavaScript => "javascript",
            Self::Python => "python",
            Self::TypeScript => "typescript",
            Self::Tsx => "tsx",
        }
    }

    /// C and C++ share the declarator-chain model
    pub fn is_c_family(&self) -> bool {
        matches!(self, Self::C | Self::Cpp)
    }

    /// TypeScript grammars wrap annotations in `type_annotation` nodes
    pub fn is_typescript(&self) -> bool {
        matches!(self, Self::TypeScript | Self::Tsx)
    }

    pub fn is_js_family(&self) -> bool {
        matches!(self, Self::JavaScript | Self::TypeScript | Self::Tsx)
    }

    pub fn all_extensions() -> Vec<&'static str> {
        Self::all()
            .into_iter()
            .flat_map(|l| l.extensions().iter().copied())
            .collect()
    }

    pub fn all() -> Vec<Self> {
        vec![
            Self::C,
            Self::Cpp,
            Self::JavaScript,
            Self::Python,
            Self::TypeScript,
            Self::Tsx,
        ]
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "c" => Ok(Self::C),
            "cpp" | "c++" | "cxx" => Ok(Self::Cpp),
            "javascript" | "js" => Ok(Self::JavaScript),
            "python" | "py" => Ok(Self::Python),
            "typescript" | "ts" => Ok(Self::TypeScript),
            "tsx" => Ok(Self::Tsx),
            _ => Err(format!("Unknown language: {}", s)),
        }
    }
}

/// Enclosing container names, innermost last
pub type Scope = Vec<String>;

/// Scope path plus declaration name; unique key within one file
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QualifiedId(Vec<String>);

impl QualifiedId {
    pub fn new(scope: &[String], name: &str) -> Self {
        let mut parts = scope.to_vec();
        parts.push(name.to_string());
        Self(parts)
    }

    pub fn from_parts<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(parts.into_iter().map(Into::into).collect())
    }

    pub fn parts(&self) -> &[String] {
        &self.0
    }

    pub fn name(&self) -> &str {
        self.0.last().map(String::as_str).unwrap_or("")
    }

    pub fn scope(&self) -> &[String] {
        match self.0.split_last() {
            Some((_, scope)) => scope,
            None => &[],
        }
    }
}

impl fmt::Display for QualifiedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("."))
    }
}

impl FromStr for QualifiedId {
    type Err = String;

    /// Parse `Outer.Inner.name`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.split('.').any(str::is_empty) {
            return Err(format!("Invalid qualified id: '{}'", s));
        }
        Ok(Self::from_parts(s.split('.')))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_optional: bool,
}

impl Parameter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_: None,
            is_optional: false,
        }
    }

    pub fn typed(name: impl Into<String>, type_: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_: Some(type_.into()),
            is_optional: false,
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if self.is_optional {
            write!(f, "?")?;
        }
        if let Some(type_) = &self.type_ {
            write!(f, ":{}", type_)?;
        }
        Ok(())
    }
}

/// Fields shared by every declaration
#[derive(Debug, Clone)]
pub struct SymbolInfo {
    pub code: Code,
    pub language: Language,
    pub name: String,
    pub range: Range,
    pub scope: Scope,
    pub substring: Substring,
    pub docstring: String,
    pub body_substring: Option<Substring>,
    pub exported: bool,
}

impl SymbolInfo {
    pub fn qualified_id(&self) -> QualifiedId {
        QualifiedId::new(&self.scope, &self.name)
    }

    /// Bytes of the full declaration
    pub fn get_substring(&self) -> &[u8] {
        self.code.slice(self.substring)
    }

    /// Bytes of the declaration up to, not including, its body
    pub fn get_substring_without_body(&self) -> &[u8] {
        match self.body_substring {
            Some(body) => self
                .code
                .slice(Substring::new(self.substring.start, body.start)),
            None => self.get_substring(),
        }
    }

    fn dump_header(&self, kind: &str, id: &str, lines: &mut Vec<String>) {
        lines.push(format!(
            "{}: {}\n   language: {}\n   range: {}\n   substring: {}",
            kind, id, self.language, self.range, self.substring
        ));
    }
}

#[derive(Debug, Clone)]
pub struct FunctionDeclaration {
    pub info: SymbolInfo,
    pub parameters: Vec<Parameter>,
    pub return_type: Option<String>,
    /// Body contains a `return <expr>` (or is an expression-bodied arrow).
    /// A bare `return;` does not set it, so JS/TS functions that only exit
    /// early are not reported as missing a return type.
    pub has_return: bool,
}

impl FunctionDeclaration {
    pub fn name(&self) -> &str {
        &self.info.name
    }

    pub fn qualified_id(&self) -> QualifiedId {
        self.info.qualified_id()
    }

    fn dump(&self, lines: &mut Vec<String>) {
        self.info.dump_header("Function", &self.info.name, lines);
        if !self.parameters.is_empty() {
            let params: Vec<String> = self.parameters.iter().map(|p| p.to_string()).collect();
            lines.push(format!("   parameters: [{}]", params.join(", ")));
        }
        if let Some(return_type) = &self.return_type {
            lines.push(format!("   return_type: {}", return_type));
        }
        if !self.info.scope.is_empty() {
            lines.push(format!("   scope: [{}]", self.info.scope.join(", ")));
        }
        if !self.info.docstring.is_empty() {
            lines.push(format!("   docstring: {}", self.info.docstring));
        }
        if let Some(body) = self.info.body_substring {
            lines.push(format!("   body: {}", body));
        }
        if self.has_return {
            lines.push("   has_return: true".to_string());
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClassDeclaration {
    pub info: SymbolInfo,
    pub body: Vec<Statement>,
    pub superclasses: Option<String>,
}

impl ClassDeclaration {
    fn dump(&self, lines: &mut Vec<String>) {
        let id = match &self.superclasses {
            Some(superclasses) => format!("{}{}", self.info.name, superclasses),
            None => self.info.name.clone(),
        };
        self.info.dump_header("Class", &id, lines);
        if !self.info.docstring.is_empty() {
            lines.push(format!("   docstring: {}", self.info.docstring));
        }
    }
}

/// TypeScript `interface` or `type` alias
#[derive(Debug, Clone)]
pub struct TypeDeclaration {
    pub info: SymbolInfo,
    pub is_interface: bool,
}

impl TypeDeclaration {
    fn dump(&self, lines: &mut Vec<String>) {
        let kind = if self.is_interface { "Interface" } else { "Type" };
        self.info.dump_header(kind, &self.info.name, lines);
        if !self.info.docstring.is_empty() {
            lines.push(format!("   docstring: {}", self.info.docstring));
        }
    }
}

#[derive(Debug, Clone)]
pub enum Symbol {
    Function(FunctionDeclaration),
    Class(ClassDeclaration),
    Type(TypeDeclaration),
}

impl Symbol {
    pub fn info(&self) -> &SymbolInfo {
        match self {
            Self::Function(f) => &f.info,
            Self::Class(c) => &c.info,
            Self::Type(t) => &t.info,
        }
    }

    pub fn name(&self) -> &str {
        &self.info().name
    }

    pub fn qualified_id(&self) -> QualifiedId {
        self.info().qualified_id()
    }

    pub fn as_function(&self) -> Option<&FunctionDeclaration> {
        match self {
            Self::Function(f) => Some(f),
            _ => None,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Function(_) => "function",
            Self::Class(_) => "class",
            Self::Type(t) if t.is_interface => "interface",
            Self::Type(_) => "type",
        }
    }

    /// Human-readable multi-line record, one entry per symbol
    pub fn dump(&self, lines: &mut Vec<String>) {
        match self {
            Self::Function(f) => f.dump(lines),
            Self::Class(c) => c.dump(lines),
            Self::Type(t) => t.dump(lines),
        }
    }
}

/// One top-level (or class-body) statement in source order
#[derive(Debug, Clone)]
pub struct Statement {
    pub kind: String,
    pub symbol: Option<Symbol>,
}

impl Statement {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            symbol: None,
        }
    }

    pub fn declaration(kind: impl Into<String>, symbol: Symbol) -> Self {
        Self {
            kind: kind.into(),
            symbol: Some(symbol),
        }
    }

    pub fn is_declaration(&self) -> bool {
        self.symbol.is_some()
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}
