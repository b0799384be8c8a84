//! Missing type annotation analysis

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::models::code::Code;
use crate::models::file::{File, Project};
use crate::models::symbol::{FunctionDeclaration, Language, QualifiedId};

/// One function that lacks parameter or return annotations
#[derive(Debug, Clone)]
pub struct MissingType {
    pub function: FunctionDeclaration,
    /// Names of untyped parameters, in declaration order
    pub parameters: Vec<String>,
    pub return_type: bool,
}

impl MissingType {
    /// Number of missing annotations
    pub fn count(&self) -> usize {
        self.parameters.len() + usize::from(self.return_type)
    }

    pub fn qualified_id(&self) -> QualifiedId {
        self.function.qualified_id()
    }
}

impl fmt::Display for MissingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Function `{}` is missing type annotations",
            self.function.name()
        )?;
        match self.parameters.as_slice() {
            [] => {}
            [single] => write!(f, " in parameter '{}'", single)?,
            many => {
                let quoted: Vec<String> = many.iter().map(|p| format!("'{}'", p)).collect();
                write!(f, " in parameters [{}]", quoted.join(", "))?;
            }
        }
        if self.return_type {
            if !self.parameters.is_empty() {
                write!(f, " and")?;
            }
            write!(f, " in return type")?;
        }
        Ok(())
    }
}

/// Flattened report row for JSON output
#[derive(Debug, Clone, Serialize)]
pub struct MissingTypeEntry {
    pub function: String,
    pub parameters: Vec<String>,
    pub return_type: bool,
    pub message: String,
}

impl From<&MissingType> for MissingTypeEntry {
    fn from(missing: &MissingType) -> Self {
        Self {
            function: missing.qualified_id().to_string(),
            parameters: missing.parameters.clone(),
            return_type: missing.return_type,
            message: missing.to_string(),
        }
    }
}

fn missing_in_function(function: &FunctionDeclaration) -> Option<MissingType> {
    let info = &function.info;

    let mut parameters = function.parameters.as_slice();
    if info.language == Language::Python
        && !info.scope.is_empty()
        && let Some((first, rest)) = parameters.split_first()
        && matches!(first.name.as_str(), "self" | "cls")
    {
        parameters = rest;
    }
    let missing_parameters: Vec<String> = parameters
        .iter()
        .filter(|p| p.type_.is_none())
        .map(|p| p.name.clone())
        .collect();

    // JS/TS functions without a `return <expr>` are implicitly void
    let implicit_void = info.language.is_js_family() && !function.has_return;
    let missing_return = function.return_type.is_none() && !implicit_void;

    if missing_parameters.is_empty() && !missing_return {
        return None;
    }
    Some(MissingType {
        function: function.clone(),
        parameters: missing_parameters,
        return_type: missing_return,
    })
}

/// Functions of `file` missing annotations, in symbol-table order
pub fn functions_missing_types_in_file(file: &File) -> Vec<MissingType> {
    file.function_declarations()
        .into_iter()
        .filter_map(missing_in_function)
        .collect()
}

/// Report for one file with at least one missing annotation
#[derive(Debug, Clone)]
pub struct FileMissingTypes {
    pub path: PathBuf,
    pub code: Code,
    pub language: Language,
    pub missing_types: Vec<MissingType>,
}

impl FileMissingTypes {
    pub fn total(&self) -> usize {
        self.missing_types.iter().map(MissingType::count).sum()
    }
}

/// Files with missing annotations; clean files are left out
pub fn files_missing_types_in_project(project: &Project) -> Vec<FileMissingTypes> {
    let reports: Vec<FileMissingTypes> = project
        .files()
        .iter()
        .filter_map(|file| {
            let missing_types = functions_missing_types_in_file(file);
            let first = missing_types.first()?;
            Some(FileMissingTypes {
                path: file.path.clone(),
                code: first.function.info.code.clone(),
                language: first.function.info.language,
                missing_types,
            })
        })
        .collect();

    tracing::info!(
        "{} of {} files have missing type annotations",
        reports.len(),
        project.files().len()
    );
    reports
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::parser::DeclarationParser;

    fn report(language: Language, source: &str) -> Vec<String> {
        let file = DeclarationParser::new()
            .parse("test", &Code::from(source), language)
            .unwrap();
        functions_missing_types_in_file(&file)
            .iter()
            .map(|m| m.to_string())
            .collect()
    }

    #[test]
    fn test_python_self_is_exempt_in_methods() {
        let lines = report(
            Language::Python,
            "class A:\n    def m(self, x):\n        return x\n",
        );
        assert_eq!(
            lines,
            vec!["Function `m` is missing type annotations in parameter 'x' and in return type"]
        );
    }

    #[test]
    fn test_python_self_not_exempt_at_top_level() {
        let lines = report(Language::Python, "def f(self) -> None:\n    pass\n");
        assert_eq!(
            lines,
            vec!["Function `f` is missing type annotations in parameter 'self'"]
        );
    }

    #[test]
    fn test_fully_typed_functions_are_omitted() {
        let lines = report(
            Language::Python,
            "def ok(a: int) -> int:\n    return a\n\ndef bad(a, b):\n    pass\n",
        );
        assert_eq!(
            lines,
            vec!["Function `bad` is missing type annotations in parameters ['a', 'b'] and in return type"]
        );
    }

    #[test]
    fn test_typescript_implicit_void() {
        let lines = report(
            Language::TypeScript,
            "function log(msg: string) { console.log(msg); }\nfunction id(x: number) { return x; }\n",
        );
        assert_eq!(
            lines,
            vec!["Function `id` is missing type annotations in return type"]
        );
    }

    #[test]
    fn test_javascript_arrow_expression_needs_return_type() {
        let lines = report(Language::JavaScript, "const double = x => x * 2;\n");
        assert_eq!(
            lines,
            vec!["Function `double` is missing type annotations in parameter 'x' and in return type"]
        );
    }

    #[test]
    fn test_c_functions_are_typed() {
        assert!(report(Language::C, "int * foo(int **x) { return 0; }\n").is_empty());
    }

    #[test]
    fn test_count_and_project_report() {
        let parser = DeclarationParser::new();
        let mut project = Project::new("root");
        project.add_file(
            parser
                .parse("a.py", &Code::from("def f(a, b):\n    return a\n"), Language::Python)
                .unwrap(),
        );
        project.add_file(
            parser
                .parse("b.py", &Code::from("def g() -> int:\n    return 1\n"), Language::Python)
                .unwrap(),
        );

        let reports = files_missing_types_in_project(&project);
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].path, PathBuf::from("a.py"));
        assert_eq!(reports[0].language, Language::Python);
        assert_eq!(reports[0].missing_types[0].count(), 3);
        assert_eq!(reports[0].total(), 3);

        let entry = MissingTypeEntry::from(&reports[0].missing_types[0]);
        assert_eq!(entry.function, "f");
        assert_eq!(entry.parameters, vec!["a", "b"]);
    }
}
