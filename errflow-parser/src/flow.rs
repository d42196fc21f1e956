//! Flow assembly: turns extracted frames and the error signature into an [`ErrorFlow`].

use crate::frames::extract_frames;
use crate::sanitize::sanitized_lines;
use crate::signature::find_error_signature;
use crate::types::{ErrorFlow, ErrorSignature, Frame, MAX_FLOW_FRAMES};

/// Parse one raw log snapshot into an [`ErrorFlow`].
///
/// Runs sanitizing, frame extraction and signature detection over the same
/// lines, then assembles the result. Never fails.
pub fn parse_log(text: &str) -> ErrorFlow {
    let lines = sanitized_lines(text);
    let frames = extract_frames(&lines);
    let signature = find_error_signature(&lines);

    log::debug!(
        "parsed {} lines: {} frames, signature={:?}",
        lines.len(),
        frames.len(),
        signature.as_ref().map(|s| s.error_type.as_str())
    );

    assemble_flow(frames, signature)
}

/// Reverse first-seen frames into causal order and cap the count.
///
/// Stack traces list the innermost call first; the flow reads entry point
/// first and failure site last. Frames past [`MAX_FLOW_FRAMES`] are dropped.
/// The terminal frame's label gains `, col M` when its column is known.
pub fn assemble_flow(mut frames: Vec<Frame>, signature: Option<ErrorSignature>) -> ErrorFlow {
    frames.reverse();
    frames.truncate(MAX_FLOW_FRAMES);

    if let Some(last) = frames.last_mut() {
        last.label = last.label_with_column();
    }

    let (error_type, error_message) = match signature {
        Some(sig) => (Some(sig.error_type), sig.error_message),
        None => (None, None),
    };

    ErrorFlow {
        error_type,
        error_message,
        frames,
    }
}

/// First-seen `(path, line)` references, for building explanation prompts.
pub fn frame_references(text: &str, limit: usize) -> Vec<(String, u32)> {
    extract_frames(&sanitized_lines(text))
        .into_iter()
        .take(limit)
        .map(|frame| (frame.file, frame.line))
        .collect()
}
