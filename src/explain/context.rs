//! Prompt construction: language hint, source snippets and the log tail.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use errflow_config::ExplainConfig;
use errflow_parser::frame_references;
use regex::Regex;

/// Best guess at the language or tool that produced a log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageHint {
    TypeScript,
    Node,
    Python,
    Rust,
    Go,
    CCompiler,
    Unknown,
}

impl LanguageHint {
    pub fn description(self) -> &'static str {
        match self {
            LanguageHint::TypeScript => "TypeScript (tsc or a Node.js runtime)",
            LanguageHint::Node => "Node.js / JavaScript",
            LanguageHint::Python => "Python",
            LanguageHint::Rust => "Rust (cargo / rustc)",
            LanguageHint::Go => "Go",
            LanguageHint::CCompiler => "C/C++ compiler (gcc / clang)",
            LanguageHint::Unknown => "unknown language or tool",
        }
    }
}

impl fmt::Display for LanguageHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

fn re_typescript() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\berror TS\d{4}:|\.tsx?:\d+")
            .expect("re_typescript: pattern is valid and should always compile")
    })
}

fn re_node() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\bat .*\.(?:js|mjs|cjs|jsx):\d+|node:internal|npm ERR!")
            .expect("re_node: pattern is valid and should always compile")
    })
}

fn re_python() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"Traceback \(most recent call last\)|File "[^"]+", line \d+"#)
            .expect("re_python: pattern is valid and should always compile")
    })
}

fn re_rust() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"panicked at|error\[E\d{4}\]|\.rs:\d+:\d+")
            .expect("re_rust: pattern is valid and should always compile")
    })
}

fn re_go() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"goroutine \d+ \[|\.go:\d+")
            .expect("re_go: pattern is valid and should always compile")
    })
}

fn re_c_compiler() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"compilation terminated|\.(?:c|cc|cpp|cxx|h|hpp):\d+:\d+: (?:fatal )?error")
            .expect("re_c_compiler: pattern is valid and should always compile")
    })
}

/// Guess the language from markers in the raw log. First matching rule wins.
pub fn detect_language(log: &str) -> LanguageHint {
    let rules: [(fn() -> &'static Regex, LanguageHint); 6] = [
        (re_typescript, LanguageHint::TypeScript),
        (re_node, LanguageHint::Node),
        (re_python, LanguageHint::Python),
        (re_rust, LanguageHint::Rust),
        (re_go, LanguageHint::Go),
        (re_c_compiler, LanguageHint::CCompiler),
    ];
    rules
        .iter()
        .find(|(re, _)| re().is_match(log))
        .map(|(_, hint)| *hint)
        .unwrap_or(LanguageHint::Unknown)
}

/// Resolve a path from the log against the workspace root.
fn resolve(root: &Path, path: &str) -> PathBuf {
    let candidate = Path::new(path);
    if candidate.is_absolute() {
        candidate.to_path_buf()
    } else {
        root.join(candidate)
    }
}

/// Numbered source lines around `line` (±`radius`), with the target marked `>`.
///
/// Returns `None` when the file cannot be read or is shorter than `line`.
pub fn read_snippet(root: &Path, path: &str, line: u32, radius: usize) -> Option<String> {
    let resolved = resolve(root, path);
    let contents = match fs::read_to_string(&resolved) {
        Ok(contents) => contents,
        Err(e) => {
            log::debug!("Skipping snippet for {}: {e}", resolved.display());
            return None;
        }
    };

    let lines: Vec<&str> = contents.lines().collect();
    let target = usize::try_from(line).ok()?.checked_sub(1)?;
    if target >= lines.len() {
        return None;
    }

    let start = target.saturating_sub(radius);
    let end = (target + radius + 1).min(lines.len());
    let width = end.to_string().len();

    let snippet = lines[start..end]
        .iter()
        .enumerate()
        .map(|(offset, text)| {
            let number = start + offset + 1;
            let marker = if start + offset == target { '>' } else { ' ' };
            format!("{marker} {number:>width$} | {text}")
        })
        .collect::<Vec<_>>()
        .join("\n");
    Some(snippet)
}

/// The last `max_chars` characters of `text`.
pub fn tail_chars(text: &str, max_chars: usize) -> &str {
    let total = text.chars().count();
    if total <= max_chars {
        return text;
    }
    let skip = total - max_chars;
    match text.char_indices().nth(skip) {
        Some((index, _)) => &text[index..],
        None => "",
    }
}

/// Build the model prompt for one log snapshot.
pub fn build_prompt(log: &str, root: &Path, settings: &ExplainConfig) -> String {
    let hint = detect_language(log);
    let references = frame_references(log, settings.max_references);

    let mut prompt = format!("Detected context: {hint}\n\nSource references:\n");
    if references.is_empty() {
        prompt.push_str("(none found in the output)\n");
    }
    for (path, line) in &references {
        prompt.push_str(&format!("--- {path}:{line} ---\n"));
        match read_snippet(root, path, *line, settings.snippet_radius) {
            Some(snippet) => {
                prompt.push_str(&snippet);
                prompt.push('\n');
            }
            None => prompt.push_str("(source not available)\n"),
        }
    }

    let tail = tail_chars(log, settings.log_tail_chars);
    prompt.push_str(&format!(
        "\nTerminal output (last {} characters):\n{tail}\n",
        tail.chars().count()
    ));
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_detect_language() {
        assert_eq!(detect_language("src/a.ts(3,1): error TS2304: x"), LanguageHint::TypeScript);
        assert_eq!(detect_language("    at main (/srv/index.js:3:9)"), LanguageHint::Node);
        assert_eq!(
            detect_language("Traceback (most recent call last):"),
            LanguageHint::Python
        );
        assert_eq!(
            detect_language("thread 'main' panicked at src/main.rs:2:5:"),
            LanguageHint::Rust
        );
        assert_eq!(detect_language("goroutine 1 [running]:"), LanguageHint::Go);
        assert_eq!(
            detect_language("main.c:5:3: error: 'y' undeclared"),
            LanguageHint::CCompiler
        );
        assert_eq!(detect_language("all good"), LanguageHint::Unknown);
    }

    #[test]
    fn test_read_snippet_marks_target_line() {
        let dir = TempDir::new().unwrap();
        let body: String = (1..=20).map(|n| format!("line {n}\n")).collect();
        fs::write(dir.path().join("app.py"), body).unwrap();

        let snippet = read_snippet(dir.path(), "app.py", 10, 2).unwrap();
        let lines: Vec<&str> = snippet.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "   8 | line 8");
        assert_eq!(lines[2], "> 10 | line 10");
        assert_eq!(lines[4], "  12 | line 12");
    }

    #[test]
    fn test_read_snippet_clamps_at_file_edges() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.js"), "one\ntwo\nthree\n").unwrap();

        let snippet = read_snippet(dir.path(), "a.js", 1, 5).unwrap();
        assert_eq!(snippet, "> 1 | one\n  2 | two\n  3 | three");
        assert!(read_snippet(dir.path(), "a.js", 4, 5).is_none());
        assert!(read_snippet(dir.path(), "missing.js", 1, 5).is_none());
    }

    #[test]
    fn test_tail_chars_counts_characters() {
        assert_eq!(tail_chars("héllo", 3), "llo");
        assert_eq!(tail_chars("héllo", 4), "éllo");
        assert_eq!(tail_chars("abc", 10), "abc");
        assert_eq!(tail_chars("abc", 0), "");
    }

    #[test]
    fn test_build_prompt_includes_references_and_tail() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("app.js"), "const a = 1;\nconst b = a.x.y;\n").unwrap();

        let log = "at run (app.js:2:15)\nat main (gone.js:9:1)\nTypeError: Cannot read properties of undefined";
        let prompt = build_prompt(log, dir.path(), &ExplainConfig::default());

        assert!(prompt.starts_with("Detected context: Node.js / JavaScript"));
        assert!(prompt.contains("--- app.js:2 ---\n  1 | const a = 1;\n> 2 | const b = a.x.y;\n"));
        assert!(prompt.contains("--- gone.js:9 ---\n(source not available)\n"));
        assert!(prompt.ends_with(&format!("{log}\n")));
    }

    #[test]
    fn test_build_prompt_respects_reference_limit() {
        let log: String = (1..=9).map(|n| format!("at f (m{n}.js:{n}:1)\n")).collect();
        let settings = ExplainConfig {
            max_references: 3,
            ..ExplainConfig::default()
        };
        let prompt = build_prompt(&log, Path::new("/nonexistent"), &settings);
        assert_eq!(prompt.matches("--- m").count(), 3);
        assert!(prompt.contains("--- m1.js:1 ---"));
        assert!(!prompt.contains("--- m4.js:4 ---"));
    }
}
