//! Core data types for parsed error flows.

use serde::Serialize;

/// Maximum number of frames kept in an assembled flow.
pub const MAX_FLOW_FRAMES: usize = 8;

/// Maximum length (in characters) of an extracted error message.
pub const MAX_ERROR_MESSAGE_CHARS: usize = 80;

/// Maximum length (in characters) of the terminal diagram node text.
pub const MAX_ERROR_NODE_CHARS: usize = 50;

/// File extensions recognized as source files by the Node fallback and
/// generic `path:line[:col]` dialects.
pub const SOURCE_EXTENSIONS: &[&str] = &["js", "ts", "tsx", "jsx", "mjs", "cjs", "py", "rs", "go"];

/// One recognized source-location reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    /// Display string, e.g. `stepTwo line 8`.
    pub label: String,
    /// Path exactly as it appeared in the log.
    pub file: String,
    /// 1-based line number, always > 0.
    pub line: u32,
    /// Optional 1-based column number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
}

impl Frame {
    /// Build a frame, rejecting an empty path or a zero line number.
    pub fn new(file: impl Into<String>, line: u32, column: Option<u32>) -> Option<Self> {
        let file = file.into();
        if file.is_empty() || line == 0 {
            return None;
        }
        Some(Self {
            label: format!("{} line {}", display_basename(&file), line),
            file,
            line,
            column: column.filter(|c| *c > 0),
        })
    }

    /// Whether the path points into a runtime-internal module or a dependency.
    pub fn is_internal(path: &str) -> bool {
        path.contains("node:") || path.contains("node_modules")
    }

    /// Label with `, col M` appended when a column is known.
    pub fn label_with_column(&self) -> String {
        match self.column {
            Some(col) => format!("{} line {}, col {}", display_basename(&self.file), self.line, col),
            None => self.label.clone(),
        }
    }
}

/// Last path segment with its final extension removed.
///
/// Falls back to the raw path when stripping leaves nothing (e.g. `.bashrc`).
pub fn display_basename(path: &str) -> String {
    let segment = path.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or(path);
    let stem = match segment.rfind('.') {
        Some(idx) => &segment[..idx],
        None => segment,
    };
    if stem.is_empty() {
        path.to_string()
    } else {
        stem.to_string()
    }
}

/// The `(type, message)` pair identifying a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorSignature {
    pub error_type: String,
    /// Truncated to [`MAX_ERROR_MESSAGE_CHARS`]; `None` when the line carried no message.
    pub error_message: Option<String>,
}

/// Parse result for one log snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorFlow {
    pub error_type: Option<String>,
    pub error_message: Option<String>,
    /// Causal order: entry point first, failure site last.
    pub frames: Vec<Frame>,
}

impl ErrorFlow {
    /// True when nothing at all was recognized in the log.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty() && self.error_type.is_none() && self.error_message.is_none()
    }
}

/// Truncate to at most `max` characters, never splitting a UTF-8 sequence.
pub(crate) fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}
