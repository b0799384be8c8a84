//! Grammar adapter
//!
//! Normalizes the per-language shapes of types, parameter lists, C/C++
//! declarator chains and docstrings into plain strings and [`Parameter`]s.

use tree_sitter::Node;

use super::node_types::{DOC_COMMENT_MARKERS, NESTED_SCOPE_NODES};
use crate::error::DeclaratorError;
use crate::models::code::{Code, Substring};
use crate::models::symbol::{Language, Parameter};

pub fn node_substring(node: Node<'_>) -> Substring {
    Substring::new(node.start_byte(), node.end_byte())
}

pub fn node_text(code: &Code, node: Node<'_>) -> String {
    code.text(node_substring(node))
}

/// Type text of a type node
///
/// TypeScript annotations are `: T`; the leading colon is dropped.
pub fn get_type(code: &Code, language: Language, node: Node<'_>) -> String {
    if language.is_typescript() && node.kind() == "type_annotation" {
        let mut cursor = node.walk();
        if let Some(inner) = node.children(&mut cursor).nth(1) {
            return node_text(code, inner);
        }
    }
    node_text(code, node)
}

/// Parameters of a parameter-list node, in source order
///
/// Children that are not a recognized parameter shape are skipped. A C/C++
/// parameter whose declarator chain cannot be rebuilt is dropped with a
/// warning.
pub fn get_parameters(code: &Code, language: Language, node: Node<'_>) -> Vec<Parameter> {
    let mut parameters = Vec::new();
    let mut cursor = node.walk();

    for child in node.children(&mut cursor) {
        let parameter = match child.kind() {
            "identifier" => Some(Parameter::new(node_text(code, child))),
            "typed_parameter" => Some(python_typed_parameter(code, language, child)),
            "default_parameter" | "assignment_pattern" => {
                let name_field = if child.kind() == "assignment_pattern" {
                    "left"
                } else {
                    "name"
                };
                child
                    .child_by_field_name(name_field)
                    .map(|name| Parameter::new(node_text(code, name)))
            }
            "typed_default_parameter" => child.child_by_field_name("name").map(|name| Parameter {
                name: node_text(code, name),
                type_: child
                    .child_by_field_name("type")
                    .map(|t| get_type(code, language, t)),
                is_optional: false,
            }),
            "parameter_declaration" | "optional_parameter_declaration" => {
                match c_parameter(code, child) {
                    Ok(parameter) => Some(parameter),
                    Err(e) => {
                        tracing::warn!(
                            "Dropping parameter '{}': {}",
                            node_text(code, child),
                            e
                        );
                        None
                    }
                }
            }
            "required_parameter" | "optional_parameter" => {
                ts_parameter(code, language, child)
            }
            _ => None,
        };
        parameters.extend(parameter);
    }

    parameters
}

fn python_typed_parameter(code: &Code, language: Language, node: Node<'_>) -> Parameter {
    let mut name = String::new();
    let mut type_ = None;
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "identifier" | "list_splat_pattern" | "dictionary_splat_pattern"
                if name.is_empty() =>
            {
                name = node_text(code, child)
            }
            "type" => type_ = Some(get_type(code, language, child)),
            _ => {}
        }
    }
    Parameter {
        name,
        type_,
        is_optional: false,
    }
}

fn ts_parameter(code: &Code, language: Language, node: Node<'_>) -> Option<Parameter> {
    let pattern = node.child_by_field_name("pattern")?;
    Some(Parameter {
        name: node_text(code, pattern),
        type_: node
            .child_by_field_name("type")
            .map(|t| get_type(code, language, t)),
        is_optional: node.kind() == "optional_parameter",
    })
}

/// Rebuild a C/C++ parameter from `type` + declarator chain
fn c_parameter(code: &Code, node: Node<'_>) -> Result<Parameter, DeclaratorError> {
    let type_node = node
        .child_by_field_name("type")
        .ok_or_else(|| DeclaratorError::MissingType(node_text(code, node)))?;
    let (declarators, last) = extract_declarators(node);
    let type_ = add_declarators_to_type(node_text(code, type_node), &declarators)?;

    Ok(Parameter {
        name: declarator_name(code, last),
        type_: Some(type_),
        is_optional: node.kind() == "optional_parameter_declaration",
    })
}

/// Name at the end of a declarator chain; empty for abstract declarators
/// such as `int main(void)`.
fn declarator_name(code: &Code, node: Node<'_>) -> String {
    if node.kind() == "identifier" {
        return node_text(code, node);
    }
    let mut cursor = node.walk();
    let name = node
        .children(&mut cursor)
        .find(|child| child.kind() == "identifier")
        .map(|child| node_text(code, child))
        .unwrap_or_default();
    name
}

/// Next node down a declarator chain
///
/// Most declarators carry a `declarator` field. C++ `&x` and the
/// parenthesized `(*f)` do not; their inner declarator is the first named
/// child.
fn inner_declarator(node: Node<'_>) -> Option<Node<'_>> {
    if let Some(declarator) = node.child_by_field_name("declarator") {
        return Some(declarator);
    }
    match node.kind() {
        "reference_declarator" | "parenthesized_declarator" => {
            let mut cursor = node.walk();
            let inner = node.named_children(&mut cursor).next();
            inner
        }
        _ => None,
    }
}

/// Follow the declarator chain down from `node`
///
/// Returns the declarator kinds innermost first, together with the last
/// node reached (normally the identifier).
pub fn extract_declarators(node: Node<'_>) -> (Vec<&'static str>, Node<'_>) {
    let Some(next) = inner_declarator(node) else {
        return (Vec::new(), node);
    };
    let (mut declarators, last) = extract_declarators(next);
    declarators.push(next.kind());
    (declarators, last)
}

/// Decorate a base type with declarator suffixes, in chain order
pub fn add_declarators_to_type(
    base: String,
    declarators: &[&str],
) -> Result<String, DeclaratorError> {
    let mut type_ = base;
    for declarator in declarators {
        match *declarator {
            "pointer_declarator" | "abstract_pointer_declarator" => type_.push('*'),
            "array_declarator" | "abstract_array_declarator" => type_.push_str("[]"),
            "reference_declarator" | "abstract_reference_declarator" => type_.push('&'),
            "function_declarator" | "abstract_function_declarator" => type_.push_str("()"),
            "identifier" | "field_identifier" | "parenthesized_declarator" => {}
            other => {
                return Err(DeclaratorError::UnknownDeclarator {
                    kind: other.to_string(),
                });
            }
        }
    }
    Ok(type_)
}

/// Locate the `function_declarator` inside a C/C++ definition
///
/// Also returns the wrapping declarators passed on the way down (innermost
/// first). These decorate the return type: `int * foo()` returns `int*`.
pub fn find_function_declarator(node: Node<'_>) -> Option<(Vec<&'static str>, Node<'_>)> {
    if node.kind() == "function_declarator" {
        return Some((Vec::new(), node));
    }
    let declarator = inner_declarator(node)?;
    let (mut declarators, function) = find_function_declarator(declarator)?;
    if declarator.kind() != "function_declarator" {
        declarators.push(declarator.kind());
    }
    Some((declarators, function))
}

/// `/** ... */` or `///` comment immediately before a declaration
///
/// For `export <declaration>` the comment sits before the export statement.
pub fn doc_comment(code: &Code, node: Node<'_>) -> Option<String> {
    let anchor = match node.parent() {
        Some(parent) if parent.kind() == "export_statement" => parent,
        _ => node,
    };
    let previous = anchor.prev_sibling()?;
    if previous.kind() != "comment" {
        return None;
    }
    let text = node_text(code, previous);
    DOC_COMMENT_MARKERS
        .iter()
        .any(|marker| text.starts_with(marker))
        .then_some(text)
}

/// String literal that is the first statement of a body
pub fn body_docstring(code: &Code, body: Node<'_>) -> Option<String> {
    let mut cursor = body.walk();
    let first = body.named_children(&mut cursor).next()?;
    if first.kind() != "expression_statement" {
        return None;
    }
    let mut inner = first.walk();
    let literal = first.children(&mut inner).next()?;
    (literal.kind() == "string").then(|| node_text(code, literal))
}

/// Body contains `return <expr>` outside nested functions and classes
///
/// A bare `return;` does not count, so a function that only exits early is
/// treated as returning nothing.
pub fn contains_direct_return(body: Node<'_>) -> bool {
    let mut cursor = body.walk();
    for child in body.children(&mut cursor) {
        if NESTED_SCOPE_NODES.contains(&child.kind()) {
            continue;
        }
        if child.kind() == "return_statement" && child.named_child_count() > 0 {
            return true;
        }
        if contains_direct_return(child) {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::ast::create_parser;
    use tree_sitter::Tree;

    fn parse(language: Language, source: &str) -> (Code, Tree) {
        let code = Code::from(source);
        let mut parser = create_parser(language).unwrap();
        let tree = parser.parse(code.bytes(), None).unwrap();
        (code, tree)
    }

    fn find<'t>(node: Node<'t>, kind: &str) -> Option<Node<'t>> {
        if node.kind() == kind {
            return Some(node);
        }
        let mut cursor = node.walk();
        let children: Vec<Node<'t>> = node.children(&mut cursor).collect();
        children.into_iter().find_map(|child| find(child, kind))
    }

    #[test]
    fn test_add_declarators_to_type() {
        assert_eq!(
            add_declarators_to_type("int".to_string(), &["identifier", "pointer_declarator", "pointer_declarator"]),
            Ok("int**".to_string())
        );
        assert_eq!(
            add_declarators_to_type("char".to_string(), &["array_declarator"]),
            Ok("char[]".to_string())
        );
        assert_eq!(
            add_declarators_to_type("int".to_string(), &["attributed_declarator"]),
            Err(DeclaratorError::UnknownDeclarator {
                kind: "attributed_declarator".to_string()
            })
        );
    }

    #[test]
    fn test_c_parameters_and_return_declarators() {
        let (code, tree) = parse(Language::C, "int * foo(int **x, char y[], void *) { return 0; }");
        let function = find(tree.root_node(), "function_definition").unwrap();

        let (declarators, declarator) = find_function_declarator(function).unwrap();
        assert_eq!(declarators, vec!["pointer_declarator"]);

        let params = find(declarator, "parameter_list").unwrap();
        let parameters = get_parameters(&code, Language::C, params);
        assert_eq!(parameters.len(), 3);
        assert_eq!(parameters[0], Parameter::typed("x", "int**"));
        assert_eq!(parameters[1], Parameter::typed("y", "char[]"));
        // abstract declarator, no name
        assert_eq!(parameters[2], Parameter::typed("", "void*"));
    }

    #[test]
    fn test_c_function_pointer_parameter() {
        let (code, tree) = parse(Language::C, "void run(int (*f)(int)) { f(1); }");
        let function = find(tree.root_node(), "function_definition").unwrap();
        let (_, declarator) = find_function_declarator(function).unwrap();
        let params = declarator.child_by_field_name("parameters").unwrap();
        let parameters = get_parameters(&code, Language::C, params);
        assert_eq!(parameters, vec![Parameter::typed("f", "int*()")]);
    }

    #[test]
    fn test_cpp_reference_return_type() {
        let (_, tree) = parse(Language::Cpp, "int& get(int &a) { return a; }");
        let function = find(tree.root_node(), "function_definition").unwrap();
        let (declarators, declarator) = find_function_declarator(function).unwrap();
        assert_eq!(declarators, vec!["reference_declarator"]);
        assert_eq!(declarator.kind(), "function_declarator");
        assert_eq!(
            add_declarators_to_type("int".to_string(), &declarators),
            Ok("int&".to_string())
        );
    }

    #[test]
    fn test_cpp_reference_parameter() {
        let (code, tree) = parse(Language::Cpp, "void swap(int &a, int &b) {}");
        let params = find(tree.root_node(), "parameter_list").unwrap();
        let parameters = get_parameters(&code, Language::Cpp, params);
        assert_eq!(
            parameters,
            vec![Parameter::typed("a", "int&"), Parameter::typed("b", "int&")]
        );
    }

    #[test]
    fn test_python_parameters() {
        let (code, tree) = parse(
            Language::Python,
            "def f(a, b: int, c=1, d: str = 'x', *args: int):\n    pass\n",
        );
        let params = find(tree.root_node(), "parameters").unwrap();
        let parameters = get_parameters(&code, Language::Python, params);
        assert_eq!(
            parameters,
            vec![
                Parameter::new("a"),
                Parameter::typed("b", "int"),
                Parameter::new("c"),
                Parameter::typed("d", "str"),
                Parameter::typed("*args", "int"),
            ]
        );
    }

    #[test]
    fn test_typescript_parameters_and_type() {
        let (code, tree) = parse(
            Language::TypeScript,
            "function ts(a: number, opt?: string, u) : number { return 1; }",
        );
        let params = find(tree.root_node(), "formal_parameters").unwrap();
        let parameters = get_parameters(&code, Language::TypeScript, params);
        assert_eq!(parameters.len(), 3);
        assert_eq!(parameters[0], Parameter::typed("a", "number"));
        assert_eq!(
            parameters[1],
            Parameter {
                name: "opt".to_string(),
                type_: Some("string".to_string()),
                is_optional: true
            }
        );
        assert_eq!(parameters[2], Parameter::new("u"));

        let annotation = find(tree.root_node(), "function_declaration")
            .unwrap()
            .child_by_field_name("return_type")
            .unwrap();
        assert_eq!(get_type(&code, Language::TypeScript, annotation), "number");
    }

    #[test]
    fn test_doc_comment() {
        let (code, tree) = parse(Language::C, "/** Adds. */\nint add(int a) { return a; }\n// plain\nint sub(int a) { return a; }");
        let root = tree.root_node();
        let mut cursor = root.walk();
        let functions: Vec<Node> = root
            .children(&mut cursor)
            .filter(|n| n.kind() == "function_definition")
            .collect();
        assert_eq!(doc_comment(&code, functions[0]), Some("/** Adds. */".to_string()));
        assert_eq!(doc_comment(&code, functions[1]), None);
    }

    #[test]
    fn test_body_docstring() {
        let (code, tree) = parse(Language::Python, "def f():\n    \"\"\"Doc.\"\"\"\n    return 1\n");
        let body = find(tree.root_node(), "block").unwrap();
        assert_eq!(body_docstring(&code, body), Some("\"\"\"Doc.\"\"\"".to_string()));

        let (code, tree) = parse(Language::Python, "def g():\n    x = 1\n");
        let body = find(tree.root_node(), "block").unwrap();
        assert_eq!(body_docstring(&code, body), None);
    }

    #[test]
    fn test_contains_direct_return_skips_nested() {
        let (_, tree) = parse(
            Language::Python,
            "def outer():\n    def inner():\n        return 1\n    inner()\n",
        );
        let body = find(tree.root_node(), "block").unwrap();
        assert!(!contains_direct_return(body));

        let (_, tree) = parse(Language::Python, "def f(x):\n    if x:\n        return x\n");
        let body = find(tree.root_node(), "block").unwrap();
        assert!(contains_direct_return(body));

        let (_, tree) = parse(Language::Python, "def f(x):\n    return\n");
        let body = find(tree.root_node(), "block").unwrap();
        assert!(!contains_direct_return(body));
    }
}
