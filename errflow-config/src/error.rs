//! Typed error variants for the errflow-config crate.
//!
//! `Config::load` and `Config::save` return `anyhow::Result`; callers that
//! want to match on a failure mode can `downcast_ref::<ConfigError>()`.

use thiserror::Error;

/// Errors that can occur when loading, validating or saving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading or writing the config file failed.
    #[error("I/O error reading config: {0}")]
    Io(#[from] std::io::Error),

    /// The config file contained YAML that could not be parsed.
    #[error("YAML parse error in config: {0}")]
    Parse(#[from] serde_yaml_ng::Error),

    /// A field value failed semantic validation.
    #[error("Config validation error: {0}")]
    Validation(String),
}
