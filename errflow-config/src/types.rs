//! Enumerations used by the configuration file.

use serde::{Deserialize, Serialize};

/// Log level for the debug log file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// No logging (log file not created)
    Off,
    /// Errors only
    Error,
    /// Warnings and errors
    #[default]
    Warn,
    /// Informational messages
    Info,
    /// Debug messages
    Debug,
    /// Most verbose
    Trace,
}

impl LogLevel {
    /// Convert to `log::LevelFilter`
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Which language model answers explanation requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LlmProvider {
    /// No model; explanations always come from the built-in heuristics.
    #[default]
    #[serde(rename = "none")]
    None,
    /// OpenAI chat-completions API.
    #[serde(rename = "openai")]
    OpenAi,
    /// Google Gemini `generateContent` API.
    #[serde(rename = "gemini")]
    Gemini,
    /// A local command that reads the prompt on stdin and answers on stdout.
    #[serde(rename = "host_model")]
    HostModel,
}

impl LlmProvider {
    /// Name used in log lines and the config file.
    pub fn as_str(self) -> &'static str {
        match self {
            LlmProvider::None => "none",
            LlmProvider::OpenAi => "openai",
            LlmProvider::Gemini => "gemini",
            LlmProvider::HostModel => "host_model",
        }
    }
}
