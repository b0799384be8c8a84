//! Source buffers, byte spans, and byte-range edits
//!
//! Every offset in this module is a byte offset into one specific buffer.
//! Lines and columns only appear in [`Position`]/[`Range`], which are kept
//! for display and never used to slice.

use std::cmp::Reverse;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::error::EditError;

/// 0-based line and column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl From<tree_sitter::Point> for Position {
    fn from(point: tree_sitter::Point) -> Self {
        Self {
            line: point.row as u32,
            column: point.column as u32,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.line, self.column)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.start, self.end)
    }
}

/// Half-open byte span `[start, end)` into a [`Code`] buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Substring {
    pub start: usize,
    pub end: usize,
}

impl Substring {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Adjacent spans (one ends where the other starts) do not overlap.
    pub fn overlaps(&self, other: &Substring) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn contains(&self, other: &Substring) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

impl From<tree_sitter::Range> for Substring {
    fn from(range: tree_sitter::Range) -> Self {
        Self::new(range.start_byte, range.end_byte)
    }
}

impl fmt::Display for Substring {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// Immutable, shared byte buffer for one file or one text block.
///
/// Cloning is cheap: all symbols extracted from a buffer hold a clone of the
/// same allocation. Edits always produce a new buffer.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Code {
    bytes: Arc<[u8]>,
}

impl Code {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: Arc::from(bytes.into()),
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Bytes of `substring`, clamped to the buffer.
    pub fn slice(&self, substring: Substring) -> &[u8] {
        let end = substring.end.min(self.bytes.len());
        let start = substring.start.min(end);
        &self.bytes[start..end]
    }

    pub fn text(&self, substring: Substring) -> String {
        String::from_utf8_lossy(self.slice(substring)).into_owned()
    }

    pub fn apply_edit(&self, edit: &CodeEdit) -> Code {
        edit.apply(self)
    }

    /// Apply a batch of edits expressed against this buffer's offsets.
    ///
    /// Edits are applied from the highest start offset down, so lower spans
    /// stay valid while higher ones change length. The batch must not
    /// contain overlapping spans.
    pub fn apply_edits(&self, edits: &[CodeEdit]) -> Code {
        debug_assert!(
            check_edits(self, edits).is_ok(),
            "invalid edit batch: {:?}",
            check_edits(self, edits)
        );
        apply_sorted(self, edits)
    }

    /// Like [`Code::apply_edits`], but rejects out-of-bounds or overlapping
    /// batches instead of producing unspecified output.
    pub fn try_apply_edits(&self, edits: &[CodeEdit]) -> Result<Code, EditError> {
        check_edits(self, edits)?;
        Ok(apply_sorted(self, edits))
    }
}

fn apply_sorted(code: &Code, edits: &[CodeEdit]) -> Code {
    let mut ordered: Vec<&CodeEdit> = edits.iter().collect();
    // wider edit first at a shared start, so an insert there lands before it
    ordered.sort_by_key(|edit| (Reverse(edit.substring.start), Reverse(edit.substring.end)));

    let mut current = code.clone();
    for edit in ordered {
        current = edit.apply(&current);
    }
    current
}

impl From<&str> for Code {
    fn from(text: &str) -> Self {
        Self::new(text.as_bytes())
    }
}

impl From<String> for Code {
    fn from(text: String) -> Self {
        Self::new(text.into_bytes())
    }
}

impl From<Vec<u8>> for Code {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.bytes))
    }
}

impl fmt::Debug for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Code").field("len", &self.bytes.len()).finish()
    }
}

/// Replace the bytes of `substring` with `new_bytes`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeEdit {
    pub substring: Substring,
    pub new_bytes: Vec<u8>,
}

impl CodeEdit {
    pub fn new(substring: Substring, new_bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            substring,
            new_bytes: new_bytes.into(),
        }
    }

    pub fn apply(&self, code: &Code) -> Code {
        let bytes = code.bytes();
        let end = self.substring.end.min(bytes.len());
        let start = self.substring.start.min(end);

        let mut out = Vec::with_capacity(bytes.len() - (end - start) + self.new_bytes.len());
        out.extend_from_slice(&bytes[..start]);
        out.extend_from_slice(&self.new_bytes);
        out.extend_from_slice(&bytes[end..]);
        Code::new(out)
    }

    pub fn new_text(&self) -> String {
        String::from_utf8_lossy(&self.new_bytes).into_owned()
    }
}

/// How a regenerated function replaces the original
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplaceMode {
    /// Replace the whole declaration, body included
    #[default]
    Full,
    /// Replace only the text before the body
    SignatureOnly,
}

impl fmt::Display for ReplaceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full => write!(f, "full"),
            Self::SignatureOnly => write!(f, "signature_only"),
        }
    }
}

impl std::str::FromStr for ReplaceMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "full" | "body" => Ok(Self::Full),
            "signature_only" | "signature" => Ok(Self::SignatureOnly),
            _ => Err(format!("Unknown replace mode: {}", s)),
        }
    }
}

/// Validate that every edit lies inside `code` and no two edits overlap.
pub fn check_edits(code: &Code, edits: &[CodeEdit]) -> Result<(), EditError> {
    for edit in edits {
        let Substring { start, end } = edit.substring;
        if start > end || end > code.len() {
            return Err(EditError::OutOfBounds {
                start,
                end,
                len: code.len(),
            });
        }
    }

    let mut spans: Vec<Substring> = edits.iter().map(|e| e.substring).collect();
    spans.sort_by_key(|s| (s.start, s.end));
    for pair in spans.windows(2) {
        if pair[0].overlaps(&pair[1]) {
            return Err(EditError::Overlapping {
                first: pair[0],
                second: pair[1],
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = "int aa() { return 0; }\nvoid foo(int **x) { *x = 0; }\n";

    #[test]
    fn test_empty_batch_is_identity() {
        let code = Code::from(SOURCE);
        let result = code.apply_edits(&[]);
        assert_eq!(result.bytes(), code.bytes());
    }

    #[test]
    fn test_apply_single_edit() {
        let code = Code::from("hello world");
        let edit = CodeEdit::new(Substring::new(6, 11), "rust");
        assert_eq!(code.apply_edit(&edit).to_string(), "hello rust");
        // input buffer untouched
        assert_eq!(code.to_string(), "hello world");
    }

    #[test]
    fn test_edits_use_original_offsets() {
        let code = Code::from("aaa bbb ccc");
        let edits = vec![
            CodeEdit::new(Substring::new(0, 3), "x"),
            CodeEdit::new(Substring::new(4, 7), "yyyyy"),
            CodeEdit::new(Substring::new(8, 11), ""),
        ];
        assert_eq!(code.apply_edits(&edits).to_string(), "x yyyyy ");
    }

    #[test]
    fn test_apply_order_independent_of_input_order() {
        let code = Code::from(SOURCE);
        let a = CodeEdit::new(Substring::new(0, 3), "long");
        let b = CodeEdit::new(Substring::new(23, 27), "int");
        let c = CodeEdit::new(Substring::new(44, 52), "");

        let forward = code.apply_edits(&[a.clone(), b.clone(), c.clone()]);
        let backward = code.apply_edits(&[c.clone(), b.clone(), a.clone()]);
        let mixed = code.apply_edits(&[b, a, c]);

        assert_eq!(forward, backward);
        assert_eq!(forward, mixed);
    }

    #[test]
    fn test_insert_and_replace_sharing_a_start() {
        let code = Code::from("abcdef");
        let insert = CodeEdit::new(Substring::new(3, 3), "I");
        let replace = CodeEdit::new(Substring::new(3, 6), "R");
        assert!(check_edits(&code, &[insert.clone(), replace.clone()]).is_ok());

        let insert_first = code.apply_edits(&[insert.clone(), replace.clone()]);
        let replace_first = code.apply_edits(&[replace, insert]);
        assert_eq!(insert_first.to_string(), "abcIR");
        assert_eq!(replace_first.to_string(), "abcIR");
    }

    #[test]
    fn test_adjacent_edits_are_not_overlapping() {
        let code = Code::from("abcdef");
        let edits = vec![
            CodeEdit::new(Substring::new(0, 3), "X"),
            CodeEdit::new(Substring::new(3, 6), "Y"),
        ];
        assert!(check_edits(&code, &edits).is_ok());
        assert_eq!(code.apply_edits(&edits).to_string(), "XY");
    }

    #[test]
    fn test_overlapping_edits_rejected() {
        let code = Code::from("abcdef");
        let edits = vec![
            CodeEdit::new(Substring::new(0, 4), "X"),
            CodeEdit::new(Substring::new(2, 6), "Y"),
        ];
        assert_eq!(
            code.try_apply_edits(&edits),
            Err(EditError::Overlapping {
                first: Substring::new(0, 4),
                second: Substring::new(2, 6),
            })
        );
    }

    #[test]
    fn test_out_of_bounds_rejected() {
        let code = Code::from("abc");
        let edits = vec![CodeEdit::new(Substring::new(1, 9), "X")];
        assert_eq!(
            check_edits(&code, &edits),
            Err(EditError::OutOfBounds {
                start: 1,
                end: 9,
                len: 3
            })
        );
    }

    #[test]
    fn test_substring_helpers() {
        let a = Substring::new(2, 8);
        assert_eq!(a.len(), 6);
        assert!(!a.is_empty());
        assert!(a.contains(&Substring::new(3, 8)));
        assert!(!a.contains(&Substring::new(1, 3)));
        assert!(a.overlaps(&Substring::new(7, 10)));
        assert!(!a.overlaps(&Substring::new(8, 10)));
        assert_eq!(a.to_string(), "[2, 8)");
    }

    #[test]
    fn test_slice_is_clamped() {
        let code = Code::from("abc");
        assert_eq!(code.slice(Substring::new(1, 100)), b"bc");
        assert_eq!(code.slice(Substring::new(5, 100)), b"");
    }
}
