//! Frame extraction: ordered dialect matchers and first-seen deduplication.
//!
//! Each dialect is a pure `fn(&str) -> Option<Frame>` over one sanitized line.
//! Dialects are tried in [`DIALECTS`] order and the first match wins, so a
//! line contributes at most one frame. Supporting a new trace format means
//! appending a matcher to that list.

use std::collections::HashSet;

use crate::regex_helpers::{
    re_compiler_location, re_generic_location, re_node_at_group, re_paren_group,
    re_python_frame,
};
use crate::types::{Frame, SOURCE_EXTENSIONS};

/// A single stack-frame dialect.
pub type DialectMatcher = fn(&str) -> Option<Frame>;

/// Dialects in priority order, paired with a short name for logging.
pub const DIALECTS: &[(&str, DialectMatcher)] = &[
    ("node", match_node_frame),
    ("python", match_python_frame),
    ("compiler", match_compiler_frame),
    ("generic", match_generic_location),
];

/// Extract frames from sanitized, non-blank lines in first-seen order.
///
/// Frames are unique by `(file, line)`; the first occurrence keeps its
/// position and later duplicates are dropped.
pub fn extract_frames<S: AsRef<str>>(lines: &[S]) -> Vec<Frame> {
    let mut seen: HashSet<(String, u32)> = HashSet::new();
    let mut frames = Vec::new();

    for line in lines {
        let line = line.as_ref();
        if line.is_empty() {
            continue;
        }
        let Some(frame) = match_line(line) else {
            continue;
        };
        if seen.insert((frame.file.clone(), frame.line)) {
            frames.push(frame);
        } else {
            log::trace!("duplicate frame dropped: {}:{}", frame.file, frame.line);
        }
    }

    frames
}

/// Run the dialects in order against one line.
fn match_line(line: &str) -> Option<Frame> {
    DIALECTS.iter().find_map(|(name, matcher)| {
        let frame = matcher(line)?;
        log::trace!("{name} dialect matched {}:{}", frame.file, frame.line);
        Some(frame)
    })
}

/// Node: `at fn (path:line[:col])`, falling back to any paren group that
/// names a recognized source file.
pub fn match_node_frame(line: &str) -> Option<Frame> {
    let content = match re_node_at_group().captures(line) {
        Some(caps) => caps.get(1)?.as_str(),
        None => re_paren_group()
            .captures_iter(line)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str())
            .find(|group| !Frame::is_internal(group) && is_source_location(group))?,
    };

    if Frame::is_internal(content) {
        return None;
    }
    let (path, line_no, column) = split_location(content)?;
    Frame::new(path, line_no, column)
}

/// Python: `File "path", line N`.
pub fn match_python_frame(line: &str) -> Option<Frame> {
    let caps = re_python_frame().captures(line)?;
    let path = caps.get(1)?.as_str();
    if Frame::is_internal(path) {
        return None;
    }
    let line_no = caps.get(2)?.as_str().parse().ok()?;
    Frame::new(path, line_no, None)
}

/// Compiler diagnostics: `path:line[:col]: error: ...` at the start of the line.
pub fn match_compiler_frame(line: &str) -> Option<Frame> {
    let caps = re_compiler_location().captures(line)?;
    let path = caps.get(1)?.as_str();
    if Frame::is_internal(path) {
        return None;
    }
    let line_no = caps.get(2)?.as_str().parse().ok()?;
    let column = caps.get(3).and_then(|m| m.as_str().parse().ok());
    Frame::new(path, line_no, column)
}

/// Generic `path:line[:col]` token (Rust `-->` locations, Go traces, pytest, ...).
pub fn match_generic_location(line: &str) -> Option<Frame> {
    re_generic_location().captures_iter(line).find_map(|caps| {
        let path = caps.get(1)?.as_str();
        if Frame::is_internal(path) {
            return None;
        }
        let line_no = caps.get(2)?.as_str().parse().ok()?;
        let column = caps.get(3).and_then(|m| m.as_str().parse().ok());
        Frame::new(path, line_no, column)
    })
}

/// Split `path:line[:col]` on its trailing numeric segments.
///
/// Windows drive letters survive because only the last one or two
/// segments are ever consumed. Two trailing numbers are always line and
/// column, so `12:5` yields an empty path that `Frame::new` rejects.
fn split_location(content: &str) -> Option<(String, u32, Option<u32>)> {
    let parts: Vec<&str> = content.split(':').collect();
    let n = parts.len();

    if n >= 2 && is_digits(parts[n - 1]) && is_digits(parts[n - 2]) {
        let line = parts[n - 2].parse().ok()?;
        let column = parts[n - 1].parse().ok();
        return Some((parts[..n - 2].join(":"), line, column));
    }
    if n >= 2 && is_digits(parts[n - 1]) {
        let line = parts[n - 1].parse().ok()?;
        return Some((parts[..n - 1].join(":"), line, None));
    }
    None
}

fn is_digits(segment: &str) -> bool {
    !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit())
}

/// `path.ext:<digits>[:<digits>]` where `ext` is a recognized source extension.
fn is_source_location(content: &str) -> bool {
    let Some((path, _, _)) = split_location(content) else {
        return false;
    };
    has_source_extension(&path)
}

fn has_source_extension(path: &str) -> bool {
    path.rsplit_once('.')
        .is_some_and(|(_, ext)| SOURCE_EXTENSIONS.contains(&ext))
}
