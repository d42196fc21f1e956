//! Configuration for errflow.
//!
//! The config lives at `~/.config/errflow/config.yaml` and is created with
//! defaults on first load. String values may reference environment variables
//! with `${VAR}` or `${VAR:-default}`.

pub mod config;
pub mod defaults;
pub mod env_vars;
pub mod error;
mod persistence;
pub mod types;

pub use config::{
    Config, ExplainConfig, GeminiConfig, HostModelConfig, LlmConfig, OpenAiConfig,
};
pub use env_vars::substitute_variables;
pub use error::ConfigError;
pub use types::{LlmProvider, LogLevel};
