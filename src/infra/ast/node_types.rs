//! Declaration node types per grammar
//!
//! Verified node types from the official tree-sitter grammar repositories
//! (`src/node-types.json`). The declaration parser dispatches on these
//! tables, and `codeir nodes` prints them.

use crate::models::symbol::Language;

/// How the declaration parser treats a node kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationKind {
    /// Named container whose body opens a new scope
    Class,
    /// Python `@decorator` wrapper, transparent to scoping
    Decorated,
    /// C/C++ definition with a declarator chain
    CFunction,
    /// Function with `parameters` / `return_type` / `body` fields
    Function,
    /// `let f = (...) => ...` binding
    ArrowBinding,
    /// `export <declaration>`
    Export,
    TypeAlias,
    Interface,
}

/// Node type mapping entry
#[derive(Debug, Clone, Copy)]
pub struct NodeType {
    /// User-friendly category name
    pub category: &'static str,
    /// Actual tree-sitter node type
    pub node_type: &'static str,
    /// Example syntax
    pub example: &'static str,
    pub kind: DeclarationKind,
}

impl NodeType {
    const fn new(
        category: &'static str,
        node_type: &'static str,
        example: &'static str,
        kind: DeclarationKind,
    ) -> Self {
        Self {
            category,
            node_type,
            example,
            kind,
        }
    }
}

/// Get declaration node types for a language
pub fn get_node_types(language: Language) -> &'static [NodeType] {
    match language {
        Language::C => C,
        Language::Cpp => CPP,
        Language::JavaScript => JAVASCRIPT,
        Language::Python => PYTHON,
        Language::TypeScript | Language::Tsx => TYPESCRIPT,
    }
}

/// Classify a node kind, `None` for plain statements
pub fn declaration_kind(language: Language, node_type: &str) -> Option<DeclarationKind> {
    get_node_types(language)
        .iter()
        .find(|n| n.node_type == node_type)
        .map(|n| n.kind)
}

/// Nodes that introduce their own function scope; a `return` inside one of
/// these does not belong to the enclosing function.
pub const NESTED_SCOPE_NODES: &[&str] = &[
    "arrow_function",
    "class_definition",
    "class_declaration",
    "function_declaration",
    "function_definition",
    "function_expression",
    "generator_function",
    "generator_function_declaration",
    "lambda",
    "method_definition",
];

/// Comment prefixes treated as documentation
pub const DOC_COMMENT_MARKERS: &[&str] = &["/**", "///"];

use DeclarationKind::*;

// =============================================================================
// C - tree-sitter-c/src/node-types.json
// =============================================================================
const C: &[NodeType] = &[NodeType::new(
    "function",
    "function_definition",
    "int *foo(int **x) {}",
    CFunction,
)];

// =============================================================================
// C++ - tree-sitter-cpp/src/node-types.json
// =============================================================================
const CPP: &[NodeType] = &[
    NodeType::new("function", "function_definition", "int foo() {}", CFunction),
    NodeType::new("class", "class_specifier", "class A { ... };", Class),
    NodeType::new("class", "struct_specifier", "struct S { ... };", Class),
];

// =============================================================================
// Python - tree-sitter-python/src/node-types.json
// =============================================================================
const PYTHON: &[NodeType] = &[
    NodeType::new("class", "class_definition", "class MyClass:", Class),
    NodeType::new("function", "function_definition", "def my_func():", Function),
    NodeType::new("decorator", "decorated_definition", "@decorator def/class", Decorated),
];

// =============================================================================
// JavaScript - tree-sitter-javascript/src/node-types.json
// =============================================================================
const JAVASCRIPT: &[NodeType] = &[
    NodeType::new("class", "class_declaration", "class MyClass {}", Class),
    NodeType::new("function", "function_declaration", "function myFunc() {}", Function),
    NodeType::new(
        "function",
        "generator_function_declaration",
        "function* gen() {}",
        Function,
    ),
    NodeType::new("method", "method_definition", "myMethod() {}", Function),
    NodeType::new("arrow", "lexical_declaration", "const fn = () => {}", ArrowBinding),
    NodeType::new("arrow", "variable_declaration", "var fn = x => x", ArrowBinding),
    NodeType::new("export", "export_statement", "export function f() {}", Export),
];

// =============================================================================
// TypeScript / TSX - tree-sitter-typescript/{typescript,tsx}/src/node-types.json
// =============================================================================
const TYPESCRIPT: &[NodeType] = &[
    NodeType::new("class", "class_declaration", "class MyClass {}", Class),
    NodeType::new("class", "abstract_class_declaration", "abstract class X {}", Class),
    NodeType::new("function", "function_declaration", "function myFunc() {}", Function),
    NodeType::new(
        "function",
        "generator_function_declaration",
        "function* gen() {}",
        Function,
    ),
    NodeType::new("function", "function_signature", "function f(x: number): void;", Function),
    NodeType::new("method", "method_definition", "myMethod() {}", Function),
    NodeType::new("method", "method_signature", "myMethod(): void;", Function),
    NodeType::new(
        "method",
        "abstract_method_signature",
        "abstract myMethod(): void;",
        Function,
    ),
    NodeType::new("arrow", "lexical_declaration", "const fn = () => {}", ArrowBinding),
    NodeType::new("arrow", "variable_declaration", "var fn = x => x", ArrowBinding),
    NodeType::new("export", "export_statement", "export { x }", Export),
    NodeType::new("interface", "interface_declaration", "interface I {}", Interface),
    NodeType::new("type", "type_alias_declaration", "type T = ...", TypeAlias),
];

/// Human-readable listing of the declaration node types
pub fn format_supported(language: Language) -> String {
    let examples: String = get_node_types(language)
        .iter()
        .map(|n| format!("  ({:<32}) # {}: {}", n.node_type, n.category, n.example))
        .collect::<Vec<_>>()
        .join("\n");

    format!("Declaration node types for {}:\n{}", language.id(), examples)
}
