//! Log-to-structured-error parser for captured terminal output.
//!
//! Takes raw, possibly ANSI-colored terminal text and extracts an ordered,
//! deduplicated sequence of source-location frames plus the final error
//! signature, then renders the result as a linear Mermaid flowchart.
//!
//! # Module Structure
//!
//! - [`sanitize`]: strips SGR escape sequences and carriage returns from raw lines.
//! - [`frames`]: ordered dialect matchers (Node, Python, compiler, generic
//!   `path:line[:col]`) and the deduplicating frame extractor.
//! - [`signature`]: reverse scan for the last `Identifier: message` line.
//! - [`flow`]: reorders frames into causal order and builds an [`ErrorFlow`].
//! - [`diagram`]: deterministic Mermaid description of an [`ErrorFlow`].
//! - [`types`]: shared data types and limits.
//!
//! Every function in this crate is pure and infallible. The worst case for
//! malformed input is an empty flow that renders as `Start([Run]) --> Error["Error"]`.

pub mod diagram;
pub mod flow;
pub mod frames;
mod regex_helpers;
pub mod sanitize;
pub mod signature;
pub mod types;

pub use diagram::{render_chain, render_diagram};
pub use flow::{assemble_flow, frame_references, parse_log};
pub use frames::{DIALECTS, DialectMatcher, extract_frames};
pub use sanitize::{sanitize_line, sanitized_lines};
pub use signature::find_error_signature;
pub use types::{
    ErrorFlow, ErrorSignature, Frame, MAX_ERROR_MESSAGE_CHARS, MAX_ERROR_NODE_CHARS,
    MAX_FLOW_FRAMES, SOURCE_EXTENSIONS,
};
