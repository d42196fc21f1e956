// Library exports for testing and potential library use
//
// # Layout
//
//   - `errflow-parser`: pure log-to-flow parsing and Mermaid rendering. No I/O.
//   - `errflow-config`: YAML configuration.
//   - this crate: capture, explanation (model or built-in rules), CLI.
//
// Shared mutable state is limited to `capture::CaptureStore`, which uses
// `parking_lot::Mutex` because it is only touched from std threads.

/// Application version (root crate version).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod capture;
pub mod cli;
pub mod debug;
pub mod explain;
pub mod http;
pub mod llm;
pub mod visualize;

pub use errflow_config as config;
pub use errflow_parser as parser;
