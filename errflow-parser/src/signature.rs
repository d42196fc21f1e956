//! Error signature detection: the last `Identifier: message` line in the log.

use crate::regex_helpers::{re_error_signature, re_identifier_message};
use crate::types::{ErrorSignature, MAX_ERROR_MESSAGE_CHARS, truncate_chars};

/// Scan sanitized lines from the end and return the closest error signature.
///
/// Frame lines (`at ...`, `File ...`) never count. `...Error: msg` shapes are
/// preferred over a bare `Identifier: msg` on the same line.
pub fn find_error_signature<S: AsRef<str>>(lines: &[S]) -> Option<ErrorSignature> {
    lines
        .iter()
        .rev()
        .map(|line| line.as_ref())
        .filter(|line| !line.is_empty())
        .filter(|line| !line.starts_with("at ") && !line.starts_with("File "))
        .find_map(match_signature)
}

fn match_signature(line: &str) -> Option<ErrorSignature> {
    let caps = re_error_signature()
        .captures(line)
        .or_else(|| re_identifier_message().captures(line))?;

    let error_type = caps.get(1)?.as_str().to_string();
    let message = caps.get(2).map(|m| m.as_str().trim()).unwrap_or_default();
    let error_message = if message.is_empty() {
        None
    } else {
        Some(truncate_chars(message, MAX_ERROR_MESSAGE_CHARS))
    };

    Some(ErrorSignature {
        error_type,
        error_message,
    })
}
