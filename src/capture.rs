//! Per-session capture of raw terminal output.
//!
//! Producers append chunks as they arrive; consumers take a snapshot of the
//! trailing lines. The parser only ever receives snapshot strings.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;

/// Trailing lines handed to the parser when no other limit is configured.
pub const DEFAULT_SNAPSHOT_LINES: usize = 400;

/// Upper bound on retained bytes per session. Older whole lines are dropped first.
pub const MAX_SESSION_BYTES: usize = 1024 * 1024;

/// Identifies one captured terminal session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Append-only text buffers keyed by session.
#[derive(Debug, Default)]
pub struct CaptureStore {
    sessions: Mutex<HashMap<SessionId, String>>,
}

impl CaptureStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append raw output to a session, creating the session on first use.
    pub fn append(&self, session: &SessionId, chunk: &str) {
        if chunk.is_empty() {
            return;
        }
        let mut sessions = self.sessions.lock();
        let buffer = sessions.entry(session.clone()).or_default();
        buffer.push_str(chunk);
        trim_front(buffer, MAX_SESSION_BYTES);
    }

    /// The last `max_lines` lines of a session, or `None` if it was never seen.
    pub fn snapshot(&self, session: &SessionId, max_lines: usize) -> Option<String> {
        let sessions = self.sessions.lock();
        let buffer = sessions.get(session)?;
        Some(tail_lines(buffer, max_lines))
    }

    /// Known sessions, sorted.
    pub fn sessions(&self) -> Vec<SessionId> {
        let mut ids: Vec<SessionId> = self.sessions.lock().keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Empty a session's buffer but keep the session.
    pub fn clear(&self, session: &SessionId) {
        if let Some(buffer) = self.sessions.lock().get_mut(session) {
            buffer.clear();
        }
    }

    /// Forget a session entirely. Returns whether it existed.
    pub fn remove(&self, session: &SessionId) -> bool {
        self.sessions.lock().remove(session).is_some()
    }
}

/// Last `max_lines` lines of `text`, joined with `\n`.
pub fn tail_lines(text: &str, max_lines: usize) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let start = lines.len().saturating_sub(max_lines);
    lines[start..].join("\n")
}

/// Drop leading whole lines until `buffer` fits in `max_bytes`.
fn trim_front(buffer: &mut String, max_bytes: usize) {
    if buffer.len() <= max_bytes {
        return;
    }
    let mut cut = buffer.len() - max_bytes;
    while !buffer.is_char_boundary(cut) {
        cut += 1;
    }
    let end = match buffer[cut..].find('\n') {
        Some(pos) => cut + pos + 1,
        None => cut,
    };
    buffer.drain(..end);
}
