//! Compiled regex patterns for line sanitizing, frame matching and error signatures.

use std::sync::OnceLock;

use regex::Regex;

use crate::types::SOURCE_EXTENSIONS;

/// SGR escape: ESC `[` digits/semicolons `m`.
pub(crate) fn re_ansi_sgr() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\x1b\[[0-9;]*m")
            .expect("re_ansi_sgr: pattern is valid and should always compile")
    })
}

/// Node: the paren group that follows the `at` token, e.g. `at foo (file.js:1:2)`.
pub(crate) fn re_node_at_group() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\bat\s+[^()]*\(([^()]*)\)")
            .expect("re_node_at_group: pattern is valid and should always compile")
    })
}

/// Any paren-enclosed group on a line.
pub(crate) fn re_paren_group() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\(([^()]*)\)")
            .expect("re_paren_group: pattern is valid and should always compile")
    })
}

/// Python: `File "path/to/file.py", line 42`.
pub(crate) fn re_python_frame() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"File "([^"]*)", line (\d+)"#)
            .expect("re_python_frame: pattern is valid and should always compile")
    })
}

/// Compiler diagnostics: `main.c:10:5: error: ...`, `lib.h:3: fatal error: ...`.
pub(crate) fn re_compiler_location() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^((?:[A-Za-z]:)?[^\s:]+):(\d+)(?::(\d+))?:\s*(?:fatal\s+)?(?:error|warning)\b",
        )
        .expect("re_compiler_location: pattern is valid and should always compile")
    })
}

/// Generic `path:line[:col]` token with a recognized source extension.
pub(crate) fn re_generic_location() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        let pattern = format!(
            r#"(?:^|[\s(\[])((?:[A-Za-z]:)?[^\s:()\[\]"']+?\.(?:{})):(\d+)(?::(\d+))?"#,
            SOURCE_EXTENSIONS.join("|")
        );
        Regex::new(&pattern).expect("re_generic_location: pattern is valid and should always compile")
    })
}

/// `SomethingError: message`, anywhere on the line.
pub(crate) fn re_error_signature() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\b((?:[A-Za-z_$][\w$.]*)?Error\w*):\s*(.*)$")
            .expect("re_error_signature: pattern is valid and should always compile")
    })
}

/// Bare `Identifier: message` at the start of the line.
pub(crate) fn re_identifier_message() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^([A-Za-z_][\w.]*):\s+(.+)$")
            .expect("re_identifier_message: pattern is valid and should always compile")
    })
}
