//! Declaration parser
//!
//! Walks a tree-sitter CST and fills a [`File`] with statements and symbols.

use tree_sitter::Node;

use crate::error::ParseError;
use crate::infra::ast::grammar::{
    add_declarators_to_type, body_docstring, contains_direct_return, doc_comment,
    find_function_declarator, get_parameters, get_type, node_substring, node_text,
};
use crate::infra::ast::{DeclarationKind, create_parser, declaration_kind};
use crate::models::code::{Code, Range};
use crate::models::file::File;
use crate::models::symbol::{
    ClassDeclaration, FunctionDeclaration, Language, Parameter, Statement, Symbol, SymbolInfo,
    TypeDeclaration,
};

/// Stateless parser; each call builds its own tree-sitter parser, so one
/// instance can be shared across threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeclarationParser;

impl DeclarationParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse one buffer into a new [`File`]
    pub fn parse(
        &self,
        path: impl Into<std::path::PathBuf>,
        code: &Code,
        language: Language,
    ) -> Result<File, ParseError> {
        let mut file = File::new(path);
        self.parse_code_block(&mut file, code, language)?;
        Ok(file)
    }

    /// Parse `code` and append its statements and symbols to `file`
    ///
    /// Several blocks can be parsed into the same file; their symbols share
    /// one table.
    pub fn parse_code_block(
        &self,
        file: &mut File,
        code: &Code,
        language: Language,
    ) -> Result<(), ParseError> {
        let mut parser = create_parser(language)?;
        let tree = parser
            .parse(code.bytes(), None)
            .ok_or(ParseError::ParseFailed(language))?;

        let root = tree.root_node();
        if root.has_error() {
            tracing::debug!(
                "{} has syntax errors, extracting what parses",
                file.path.display()
            );
        }

        let mut walker = Walker {
            code,
            language,
            file,
        };
        let statements = walker.process_body(root, &[]);
        walker.file.statements.extend(statements);
        Ok(())
    }
}

struct Walker<'a> {
    code: &'a Code,
    language: Language,
    file: &'a mut File,
}

impl Walker<'_> {
    fn process_body(&mut self, node: Node<'_>, scope: &[String]) -> Vec<Statement> {
        let mut cursor = node.walk();
        let children: Vec<Node<'_>> = node.children(&mut cursor).collect();
        children
            .into_iter()
            .map(|child| self.process_statement(child, scope))
            .collect()
    }

    fn process_statement(&mut self, node: Node<'_>, scope: &[String]) -> Statement {
        match self.find_declaration(node, scope, false) {
            Some(symbol) => Statement::declaration(node.kind(), symbol),
            None => Statement::new(node.kind()),
        }
    }

    /// Declaration rooted at `node`, registered in the symbol table
    fn find_declaration(
        &mut self,
        node: Node<'_>,
        scope: &[String],
        exported: bool,
    ) -> Option<Symbol> {
        let kind = declaration_kind(self.language, node.kind())?;
        let symbol = match kind {
            DeclarationKind::Decorated => {
                let definition = node.child_by_field_name("definition")?;
                return self.find_declaration(definition, scope, exported);
            }
            DeclarationKind::Export => {
                let declaration = node.child_by_field_name("declaration")?;
                return self.find_declaration(declaration, scope, true);
            }
            DeclarationKind::Class => self.class_declaration(node, scope, exported)?,
            DeclarationKind::CFunction => self.c_function(node, scope)?,
            DeclarationKind::Function => self.function(node, scope, exported)?,
            DeclarationKind::ArrowBinding => self.arrow_binding(node, scope, exported)?,
            DeclarationKind::TypeAlias => self.type_declaration(node, scope, exported, false)?,
            DeclarationKind::Interface => self.type_declaration(node, scope, exported, true)?,
        };
        self.file.add_symbol(symbol.clone());
        Some(symbol)
    }

    fn info(
        &self,
        node: Node<'_>,
        name: String,
        scope: &[String],
        docstring: Option<String>,
        body: Option<Node<'_>>,
        exported: bool,
    ) -> SymbolInfo {
        SymbolInfo {
            code: self.code.clone(),
            language: self.language,
            name,
            range: Range::new(node.start_position().into(), node.end_position().into()),
            scope: scope.to_vec(),
            substring: node_substring(node),
            docstring: docstring.unwrap_or_default(),
            body_substring: body.map(node_substring),
            exported,
        }
    }

    /// A string first statement wins over a preceding doc comment
    fn docstring(&self, node: Node<'_>, body: Option<Node<'_>>) -> Option<String> {
        let from_body = match body {
            Some(body) if !self.language.is_c_family() => body_docstring(self.code, body),
            _ => None,
        };
        from_body.or_else(|| doc_comment(self.code, node))
    }

    fn class_declaration(
        &mut self,
        node: Node<'_>,
        scope: &[String],
        exported: bool,
    ) -> Option<Symbol> {
        let name = node_text(self.code, node.child_by_field_name("name")?);
        // forward declarations (`struct S;`) have no body
        let body_node = node.child_by_field_name("body")?;

        let mut inner_scope = scope.to_vec();
        inner_scope.push(name.clone());
        let body = self.process_body(body_node, &inner_scope);

        let superclasses = node
            .child_by_field_name("superclasses")
            .or_else(|| {
                let mut cursor = node.walk();
                let heritage = node
                    .children(&mut cursor)
                    .find(|c| matches!(c.kind(), "class_heritage" | "base_class_clause"));
                heritage
            })
            .map(|n| node_text(self.code, n));

        let docstring = self.docstring(node, Some(body_node));
        Some(Symbol::Class(ClassDeclaration {
            info: self.info(node, name, scope, docstring, Some(body_node), exported),
            body,
            superclasses,
        }))
    }

    fn c_function(&mut self, node: Node<'_>, scope: &[String]) -> Option<Symbol> {
        let type_node = node.child_by_field_name("type")?;
        let (declarators, declarator) = find_function_declarator(node)?;

        let return_type = match add_declarators_to_type(
            get_type(self.code, self.language, type_node),
            &declarators,
        ) {
            Ok(return_type) => return_type,
            Err(e) => {
                tracing::debug!("Skipping function '{}': {}", node_text(self.code, declarator), e);
                return None;
            }
        };

        let mut name = None;
        let mut parameters = Vec::new();
        let mut cursor = declarator.walk();
        for child in declarator.children(&mut cursor) {
            match child.kind() {
                "identifier" | "field_identifier" => name = Some(node_text(self.code, child)),
                "parameter_list" => {
                    parameters = get_parameters(self.code, self.language, child);
                }
                _ => {}
            }
        }

        let body = node.child_by_field_name("body");
        let docstring = doc_comment(self.code, node);
        Some(Symbol::Function(FunctionDeclaration {
            info: self.info(node, name?, scope, docstring, body, false),
            parameters,
            return_type: Some(return_type),
            has_return: body.is_some_and(contains_direct_return),
        }))
    }

    fn function(&mut self, node: Node<'_>, scope: &[String], exported: bool) -> Option<Symbol> {
        let name = {
            let mut cursor = node.walk();
            let name_node = node.children(&mut cursor).find(|c| {
                matches!(
                    c.kind(),
                    "identifier" | "property_identifier" | "private_property_identifier"
                )
            })?;
            node_text(self.code, name_node)
        };

        let parameters = node
            .child_by_field_name("parameters")
            .map(|p| get_parameters(self.code, self.language, p))
            .unwrap_or_default();
        let return_type = node
            .child_by_field_name("return_type")
            .map(|t| get_type(self.code, self.language, t));
        let body = node.child_by_field_name("body");

        let docstring = self.docstring(node, body);
        Some(Symbol::Function(FunctionDeclaration {
            info: self.info(node, name, scope, docstring, body, exported),
            parameters,
            return_type,
            has_return: body.is_some_and(contains_direct_return),
        }))
    }

    /// `const f = (x) => ...`; the symbol spans the whole declaration
    fn arrow_binding(
        &mut self,
        node: Node<'_>,
        scope: &[String],
        exported: bool,
    ) -> Option<Symbol> {
        let mut cursor = node.walk();
        let (name, arrow) = node
            .children(&mut cursor)
            .filter(|c| c.kind() == "variable_declarator")
            .find_map(|declarator| {
                let name = declarator.child_by_field_name("name")?;
                let value = declarator.child_by_field_name("value")?;
                (name.kind() == "identifier" && value.kind() == "arrow_function")
                    .then_some((name, value))
            })?;

        let parameters = if let Some(params) = arrow.child_by_field_name("parameters") {
            get_parameters(self.code, self.language, params)
        } else if let Some(param) = arrow.child_by_field_name("parameter") {
            vec![Parameter::new(node_text(self.code, param))]
        } else {
            Vec::new()
        };
        let return_type = arrow
            .child_by_field_name("return_type")
            .map(|t| get_type(self.code, self.language, t));

        let body = arrow.child_by_field_name("body");
        let has_return = match body {
            Some(body) if body.kind() == "statement_block" => contains_direct_return(body),
            // expression body
            Some(_) => true,
            None => false,
        };

        let docstring = doc_comment(self.code, node);
        Some(Symbol::Function(FunctionDeclaration {
            info: self.info(
                node,
                node_text(self.code, name),
                scope,
                docstring,
                body,
                exported,
            ),
            parameters,
            return_type,
            has_return,
        }))
    }

    fn type_declaration(
        &mut self,
        node: Node<'_>,
        scope: &[String],
        exported: bool,
        is_interface: bool,
    ) -> Option<Symbol> {
        let name = node_text(self.code, node.child_by_field_name("name")?);
        let body = if is_interface {
            node.child_by_field_name("body")
        } else {
            None
        };
        let docstring = doc_comment(self.code, node);
        Some(Symbol::Type(TypeDeclaration {
            info: self.info(node, name, scope, docstring, body, exported),
            is_interface,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::symbol::QualifiedId;

    fn parse(language: Language, source: &str) -> File {
        DeclarationParser::new()
            .parse("test", &Code::from(source), language)
            .unwrap()
    }

    fn function<'f>(file: &'f File, qid: &str) -> &'f FunctionDeclaration {
        file.lookup_symbol(&qid.parse::<QualifiedId>().unwrap())
            .and_then(Symbol::as_function)
            .unwrap_or_else(|| panic!("no function {}", qid))
    }

    #[test]
    fn test_c_declarators() {
        let file = parse(
            Language::C,
            "int aa() {\n  return 0;\n}\n/** Some docstring */\nint * foo(int **x) {\n  *x = 0;\n}\n",
        );

        let aa = function(&file, "aa");
        assert_eq!(aa.return_type.as_deref(), Some("int"));
        assert!(aa.parameters.is_empty());
        assert!(aa.has_return);

        let foo = function(&file, "foo");
        assert_eq!(foo.return_type.as_deref(), Some("int*"));
        assert_eq!(foo.parameters, vec![Parameter::typed("x", "int**")]);
        assert_eq!(foo.info.docstring, "/** Some docstring */");
        assert!(!foo.has_return);
        assert_eq!(
            foo.info.get_substring_without_body(),
            b"int * foo(int **x) "
        );
    }

    #[test]
    fn test_cpp_reference_returning_function() {
        let file = parse(
            Language::Cpp,
            "int& get(int &a) { return a; }\nint * ptr(int **x) { return *x; }\n",
        );

        let get = function(&file, "get");
        assert_eq!(get.return_type.as_deref(), Some("int&"));
        assert_eq!(get.parameters, vec![Parameter::typed("a", "int&")]);
        assert!(get.has_return);
        assert_eq!(function(&file, "ptr").return_type.as_deref(), Some("int*"));
        assert_eq!(file.symbol_count(), 2);
    }

    #[test]
    fn test_c_statements_in_order() {
        let file = parse(Language::C, "#include <stdio.h>\nint x;\nvoid f(void) {}\n");
        let kinds: Vec<&str> = file.statements.iter().map(|s| s.kind.as_str()).collect();
        assert_eq!(kinds, vec!["preproc_include", "declaration", "function_definition"]);
        assert!(file.statements[2].is_declaration());
        assert_eq!(file.symbol_count(), 1);
    }

    #[test]
    fn test_cpp_class_members_are_scoped() {
        let file = parse(
            Language::Cpp,
            "class Counter {\npublic:\n  int get(int &by) { return n; }\n  int n;\n};\n",
        );
        let get = function(&file, "Counter.get");
        assert_eq!(get.info.scope, vec!["Counter".to_string()]);
        assert_eq!(get.parameters, vec![Parameter::typed("by", "int&")]);
        assert!(file.lookup_symbol(&QualifiedId::from_parts(["Counter"])).is_some());
    }

    #[test]
    fn test_python_class_and_decorators() {
        let file = parse(
            Language::Python,
            "class A(Base):\n    \"\"\"Doc for A.\"\"\"\n    @staticmethod\n    def m(x: int) -> str:\n        return str(x)\n\n@cache\ndef top(a, b=2):\n    pass\n",
        );

        let class = file.lookup_symbol(&QualifiedId::from_parts(["A"])).unwrap();
        let Symbol::Class(class) = class else {
            panic!("A is not a class");
        };
        assert_eq!(class.superclasses.as_deref(), Some("(Base)"));
        assert_eq!(class.info.docstring, "\"\"\"Doc for A.\"\"\"");
        assert!(class.body.iter().any(|s| s.kind == "decorated_definition" && s.is_declaration()));

        let m = function(&file, "A.m");
        assert_eq!(m.parameters, vec![Parameter::typed("x", "int")]);
        assert_eq!(m.return_type.as_deref(), Some("str"));
        assert!(m.has_return);
        // the decorator is not part of the function span
        assert!(m.info.get_substring().starts_with(b"def m"));

        let top = function(&file, "top");
        assert_eq!(top.parameters, vec![Parameter::new("a"), Parameter::new("b")]);
        assert!(!top.has_return);
    }

    #[test]
    fn test_python_docstring_overrides_comment() {
        let file = parse(
            Language::Python,
            "def f():\n    \"\"\"Body doc.\"\"\"\n    return 1\n",
        );
        assert_eq!(function(&file, "f").info.docstring, "\"\"\"Body doc.\"\"\"");
    }

    #[test]
    fn test_typescript_optional_parameters_and_types() {
        let file = parse(
            Language::TypeScript,
            "/** Sums. */\nexport function sum(a: number, b?: number): number { return a + (b ?? 0); }\ninterface Shape { area(): number; }\ntype Id = string;\n",
        );

        let sum = function(&file, "sum");
        assert!(sum.info.exported);
        assert_eq!(sum.info.docstring, "/** Sums. */");
        assert_eq!(sum.return_type.as_deref(), Some("number"));
        assert_eq!(sum.parameters.len(), 2);
        assert!(!sum.parameters[0].is_optional);
        assert!(sum.parameters[1].is_optional);
        assert_eq!(sum.parameters[1].type_.as_deref(), Some("number"));

        let shape = file.lookup_symbol(&QualifiedId::from_parts(["Shape"])).unwrap();
        assert_eq!(shape.kind_name(), "interface");
        let id = file.lookup_symbol(&QualifiedId::from_parts(["Id"])).unwrap();
        assert_eq!(id.kind_name(), "type");
    }

    #[test]
    fn test_javascript_arrow_functions() {
        let file = parse(
            Language::JavaScript,
            "const add = (a, b) => a + b;\nlet log = msg => { console.log(msg); };\nconst n = 1;\n",
        );

        let add = function(&file, "add");
        assert_eq!(add.parameters, vec![Parameter::new("a"), Parameter::new("b")]);
        assert!(add.has_return);
        assert!(add.info.get_substring().starts_with(b"const add"));
        assert_eq!(add.info.get_substring_without_body(), b"const add = (a, b) => ");

        let log = function(&file, "log");
        assert_eq!(log.parameters, vec![Parameter::new("msg")]);
        assert!(!log.has_return);

        assert!(file.search_symbol("n").is_empty());
    }

    #[test]
    fn test_bare_return_is_not_a_value_return() {
        let file = parse(
            Language::JavaScript,
            "function stop(x) { if (x) return; go(); }\nfunction value(x) { if (x) return; return 1; }\n",
        );
        assert!(!function(&file, "stop").has_return);
        assert!(function(&file, "value").has_return);
    }

    #[test]
    fn test_javascript_class_methods() {
        let file = parse(
            Language::JavaScript,
            "export class Greeter extends Base {\n  greet(name) {\n    return `hi ${name}`;\n  }\n}\n",
        );
        let class = file.lookup_symbol(&QualifiedId::from_parts(["Greeter"])).unwrap();
        assert!(class.info().exported);
        let greet = function(&file, "Greeter.greet");
        assert!(greet.has_return);
        assert_eq!(greet.parameters, vec![Parameter::new("name")]);
    }

    #[test]
    fn test_multiple_blocks_share_one_file() {
        let parser = DeclarationParser::new();
        let mut file = File::new("response");
        parser
            .parse_code_block(&mut file, &Code::from("def a(): pass\n"), Language::Python)
            .unwrap();
        parser
            .parse_code_block(&mut file, &Code::from("def b(): pass\n"), Language::Python)
            .unwrap();
        assert_eq!(file.symbol_count(), 2);
        assert_eq!(file.statements.len(), 2);
    }

    #[test]
    fn test_syntax_errors_do_not_fail() {
        let file = parse(Language::Python, "def ok(x):\n    return x\n\ndef broken(:\n");
        assert!(file.lookup_symbol(&QualifiedId::from_parts(["ok"])).is_some());
    }
}
