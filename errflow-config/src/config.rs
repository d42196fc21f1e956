//! The `Config` struct and its sections.

use serde::{Deserialize, Serialize};

use crate::defaults;
use crate::error::ConfigError;
use crate::types::{LlmProvider, LogLevel};

/// Top-level errflow configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Level written to the debug log file (overridden by `--log-level` and `RUST_LOG`).
    pub log_level: LogLevel,

    /// Trailing lines of a capture handed to the parser and explainer.
    #[serde(default = "defaults::snapshot_lines")]
    pub snapshot_lines: usize,

    /// Prompt construction for explanations.
    pub explain: ExplainConfig,

    /// Language model used for explanations.
    pub llm: LlmConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: LogLevel::default(),
            snapshot_lines: defaults::snapshot_lines(),
            explain: ExplainConfig::default(),
            llm: LlmConfig::default(),
        }
    }
}

/// Limits for the explanation prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplainConfig {
    /// Frame references included with source snippets.
    #[serde(default = "defaults::max_references")]
    pub max_references: usize,
    /// Lines shown above and below each referenced line.
    #[serde(default = "defaults::snippet_radius")]
    pub snippet_radius: usize,
    /// Trailing characters of the log included verbatim.
    #[serde(default = "defaults::log_tail_chars")]
    pub log_tail_chars: usize,
}

impl Default for ExplainConfig {
    fn default() -> Self {
        Self {
            max_references: defaults::max_references(),
            snippet_radius: defaults::snippet_radius(),
            log_tail_chars: defaults::log_tail_chars(),
        }
    }
}

/// Provider selection and per-provider settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub provider: LlmProvider,
    /// Upper bound for one provider call, in seconds.
    #[serde(default = "defaults::llm_timeout_secs")]
    pub timeout_secs: u64,
    pub openai: OpenAiConfig,
    pub gemini: GeminiConfig,
    pub host_model: HostModelConfig,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: LlmProvider::default(),
            timeout_secs: defaults::llm_timeout_secs(),
            openai: OpenAiConfig::default(),
            gemini: GeminiConfig::default(),
            host_model: HostModelConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiConfig {
    /// API key; falls back to `OPENAI_API_KEY` when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default = "defaults::openai_model")]
    pub model: String,
    #[serde(default = "defaults::openai_base_url")]
    pub base_url: String,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: defaults::openai_model(),
            base_url: defaults::openai_base_url(),
        }
    }
}

impl OpenAiConfig {
    /// Configured key, or `OPENAI_API_KEY` from the environment.
    pub fn resolved_api_key(&self) -> Option<String> {
        resolve_key(self.api_key.as_deref(), "OPENAI_API_KEY")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    /// API key; falls back to `GEMINI_API_KEY` when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default = "defaults::gemini_model")]
    pub model: String,
    #[serde(default = "defaults::gemini_base_url")]
    pub base_url: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: defaults::gemini_model(),
            base_url: defaults::gemini_base_url(),
        }
    }
}

impl GeminiConfig {
    /// Configured key, or `GEMINI_API_KEY` from the environment.
    pub fn resolved_api_key(&self) -> Option<String> {
        resolve_key(self.api_key.as_deref(), "GEMINI_API_KEY")
    }
}

/// Local model command. The prompt is written to its stdin.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostModelConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    pub args: Vec<String>,
}

/// A usable key: non-empty and not an unresolved `${...}` placeholder.
fn resolve_key(configured: Option<&str>, env_var: &str) -> Option<String> {
    let usable = |key: &str| !key.trim().is_empty() && !key.starts_with("${");
    configured
        .filter(|key| usable(key))
        .map(str::to_string)
        .or_else(|| std::env::var(env_var).ok().filter(|key| usable(key)))
}

impl Config {
    /// Check semantic constraints that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.snapshot_lines == 0 {
            return Err(ConfigError::Validation(
                "snapshot_lines must be greater than 0".to_string(),
            ));
        }
        if self.llm.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "llm.timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.llm.provider == LlmProvider::HostModel
            && self
                .llm
                .host_model
                .command
                .as_deref()
                .is_none_or(|cmd| cmd.trim().is_empty())
        {
            log::warn!("llm.provider is host_model but llm.host_model.command is empty");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.snapshot_lines, 400);
        assert_eq!(config.explain.max_references, 5);
        assert_eq!(config.explain.snippet_radius, 5);
        assert_eq!(config.explain.log_tail_chars, 12_000);
        assert_eq!(config.llm.timeout_secs, 30);
        assert_eq!(config.llm.provider, LlmProvider::None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let config: Config = serde_yaml_ng::from_str(
            "llm:\n  provider: gemini\n  gemini:\n    model: gemini-1.5-pro\n",
        )
        .unwrap();
        assert_eq!(config.llm.provider, LlmProvider::Gemini);
        assert_eq!(config.llm.gemini.model, "gemini-1.5-pro");
        assert_eq!(config.llm.gemini.base_url, defaults::gemini_base_url());
        assert_eq!(config.llm.timeout_secs, 30);
        assert_eq!(config.snapshot_lines, 400);
    }

    #[test]
    fn test_validation_rejects_zero_limits() {
        let mut config = Config::default();
        config.snapshot_lines = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));

        let mut config = Config::default();
        config.llm.timeout_secs = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_configured_key_wins_and_placeholders_are_ignored() {
        assert_eq!(
            resolve_key(Some("sk-live"), "ERRFLOW_TEST_UNSET_KEY_VAR"),
            Some("sk-live".to_string())
        );
        assert_eq!(resolve_key(Some("${OPENAI_API_KEY}"), "ERRFLOW_TEST_UNSET_KEY_VAR"), None);
        assert_eq!(resolve_key(Some("  "), "ERRFLOW_TEST_UNSET_KEY_VAR"), None);
        assert_eq!(resolve_key(None, "ERRFLOW_TEST_UNSET_KEY_VAR"), None);
    }
}
