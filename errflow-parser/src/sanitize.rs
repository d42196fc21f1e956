//! Line sanitizing: SGR escape removal, carriage-return stripping, trimming.

use crate::regex_helpers::re_ansi_sgr;

/// Strip SGR escape sequences and a trailing `\r`, then trim whitespace.
pub fn sanitize_line(raw: &str) -> String {
    let cleaned = re_ansi_sgr().replace_all(raw, "");
    let line = cleaned.strip_suffix('\r').unwrap_or(cleaned.as_ref());
    line.trim().to_string()
}

/// Sanitize every line of `text`, dropping lines that end up blank.
pub fn sanitized_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(sanitize_line)
        .filter(|line| !line.is_empty())
        .collect()
}
