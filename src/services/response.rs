//! Response reconciliation
//!
//! Pulls fenced code blocks out of generated text and turns the functions
//! they define into edits against an existing document.

use std::sync::LazyLock;

use regex::bytes::Regex;

use crate::error::{CodeirResult, ParseError};
use crate::models::code::{Code, CodeEdit, ReplaceMode, Substring};
use crate::models::config::EditConfig;
use crate::models::file::File;
use crate::models::symbol::{FunctionDeclaration, Language, QualifiedId};
use crate::services::missing_types::functions_missing_types_in_file;
use crate::services::parser::DeclarationParser;

/// Name of the synthetic file holding all parsed response blocks
pub const RESPONSE_FILE: &str = "response";

static TRAILING_WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?-u)\s*$").expect("static pattern"));

/// Bodies of ``` fenced blocks, in order
///
/// Any line starting with ``` toggles the fence, so language tags are
/// ignored. A block still open at the end of the text is dropped.
pub fn extract_blocks_from_response(response: &str) -> Vec<Code> {
    let mut blocks = Vec::new();
    let mut current = String::new();
    let mut inside = false;

    for line in response.lines() {
        if line.starts_with("```") {
            if inside {
                blocks.push(Code::from(std::mem::take(&mut current)));
            }
            inside = !inside;
        } else if inside {
            current.push_str(line);
            current.push('\n');
        }
    }

    if inside {
        tracing::debug!("Dropping unterminated code block ({} bytes)", current.len());
    }
    blocks
}

/// Parse every block into one [`File`]; each block starts at top level
pub fn parse_code_blocks(blocks: &[Code], language: Language) -> Result<File, ParseError> {
    let parser = DeclarationParser::new();
    let mut file = File::new(RESPONSE_FILE);
    for block in blocks {
        parser.parse_code_block(&mut file, block, language)?;
    }
    Ok(file)
}

/// The block function a document function maps to: same bare name, exactly
/// one candidate, and that candidate is a function.
fn unique_match<'b>(blocks: &'b File, name: &str) -> Option<&'b FunctionDeclaration> {
    let candidates = blocks.search_symbol(name);
    match candidates.as_slice() {
        [] => None,
        [single] => single.as_function(),
        candidates => {
            tracing::debug!(
                "Skipping '{}': {} candidates in response",
                name,
                candidates.len()
            );
            None
        }
    }
}

fn signature_edit(target: &FunctionDeclaration, replacement: &FunctionDeclaration) -> CodeEdit {
    let old_signature = target.info.get_substring_without_body();
    let trailing = TRAILING_WHITESPACE
        .find(old_signature)
        .map(|m| m.as_bytes())
        .unwrap_or_default();

    let mut new_bytes = replacement
        .info
        .get_substring_without_body()
        .trim_ascii_end()
        .to_vec();
    new_bytes.extend_from_slice(trailing);

    let start = target.info.substring.start;
    CodeEdit::new(Substring::new(start, start + old_signature.len()), new_bytes)
}

fn matched_edits(
    document: &File,
    blocks: &File,
    mode: ReplaceMode,
    filter: Option<&[QualifiedId]>,
) -> Vec<(QualifiedId, CodeEdit)> {
    document
        .function_declarations()
        .into_iter()
        .filter(|target| filter.is_none_or(|ids| ids.contains(&target.qualified_id())))
        .filter_map(|target| {
            let replacement = unique_match(blocks, target.name())?;
            let edit = match mode {
                ReplaceMode::Full => {
                    CodeEdit::new(target.info.substring, replacement.info.get_substring())
                }
                ReplaceMode::SignatureOnly => signature_edit(target, replacement),
            };
            Some((target.qualified_id(), edit))
        })
        .collect()
}

/// Edits replacing functions of `document` with their counterparts in
/// `blocks`, one per matched function
pub fn replace_functions_in_document(
    document: &File,
    blocks: &File,
    mode: ReplaceMode,
    filter: Option<&[QualifiedId]>,
) -> Vec<CodeEdit> {
    matched_edits(document, blocks, mode, filter)
        .into_iter()
        .map(|(_, edit)| edit)
        .collect()
}

pub fn replace_functions_from_code_blocks(
    blocks: &[Code],
    document: &Code,
    language: Language,
    mode: ReplaceMode,
    filter: Option<&[QualifiedId]>,
) -> Result<Vec<CodeEdit>, ParseError> {
    let blocks = parse_code_blocks(blocks, language)?;
    let document = parse_code_blocks(std::slice::from_ref(document), language)?;
    Ok(replace_functions_in_document(&document, &blocks, mode, filter))
}

/// Edits for the code blocks found in a raw response
pub fn reconcile_response(
    response: &str,
    document: &Code,
    language: Language,
    mode: ReplaceMode,
    filter: Option<&[QualifiedId]>,
) -> Result<Vec<CodeEdit>, ParseError> {
    let blocks = extract_blocks_from_response(response);
    replace_functions_from_code_blocks(&blocks, document, language, mode, filter)
}

/// Outcome of reconciling one response against one document
#[derive(Debug, Clone)]
pub struct Reconciliation {
    pub blocks: usize,
    pub replaced: Vec<QualifiedId>,
    pub edits: Vec<CodeEdit>,
    pub code: Code,
}

impl Reconciliation {
    pub fn is_unchanged(&self) -> bool {
        self.edits.is_empty()
    }
}

/// Applies generated responses to documents
#[derive(Debug, Clone, Copy, Default)]
pub struct Reconciler {
    mode: ReplaceMode,
    only_missing_types: bool,
}

impl Reconciler {
    pub fn new(mode: ReplaceMode) -> Self {
        Self {
            mode,
            only_missing_types: false,
        }
    }

    pub fn from_config(config: &EditConfig) -> Self {
        Self {
            mode: config.mode,
            only_missing_types: config.only_missing_types,
        }
    }

    /// Only touch functions that are missing type annotations
    pub fn only_missing_types(mut self, only_missing_types: bool) -> Self {
        self.only_missing_types = only_missing_types;
        self
    }

    pub fn mode(&self) -> ReplaceMode {
        self.mode
    }

    pub fn reconcile(
        &self,
        response: &str,
        document: &Code,
        language: Language,
    ) -> CodeirResult<Reconciliation> {
        let blocks = extract_blocks_from_response(response);
        let block_file = parse_code_blocks(&blocks, language)?;
        let document_file = parse_code_blocks(std::slice::from_ref(document), language)?;

        let filter: Option<Vec<QualifiedId>> = self.only_missing_types.then(|| {
            functions_missing_types_in_file(&document_file)
                .iter()
                .map(|missing| missing.qualified_id())
                .collect()
        });

        let (replaced, edits): (Vec<QualifiedId>, Vec<CodeEdit>) =
            matched_edits(&document_file, &block_file, self.mode, filter.as_deref())
                .into_iter()
                .unzip();
        let code = document.try_apply_edits(&edits)?;

        tracing::info!(
            "Reconciled {} block(s): {} function(s) replaced ({})",
            blocks.len(),
            replaced.len(),
            self.mode
        );
        Ok(Reconciliation {
            blocks: blocks.len(),
            replaced,
            edits,
            code,
        })
    }
}
