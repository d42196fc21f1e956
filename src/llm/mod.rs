//! Language-model backends used for explanations.
//!
//! Every backend exposes the same blocking `complete(prompt)` call; the async
//! orchestration (timeout, cancellation, heuristic fallback) lives in
//! [`crate::explain`].

pub mod gemini;
pub mod host_model;
pub mod openai;

use std::time::Duration;

use errflow_config::{LlmConfig, LlmProvider};
use thiserror::Error;

pub use gemini::GeminiClient;
pub use host_model::HostModel;
pub use openai::OpenAiClient;

/// Instruction sent ahead of every explanation prompt.
pub const SYSTEM_PROMPT: &str = "You are a debugging assistant. Read the terminal output and source \
    excerpts below, explain in plain language why the program failed, then give numbered steps to fix it.";

/// Errors from a single provider call.
#[derive(Debug, Error)]
pub enum CallError {
    /// No provider selected.
    #[error("no language model is configured")]
    NotConfigured,

    /// The selected provider needs an API key and none was found.
    #[error("missing API key for {0}")]
    MissingApiKey(&'static str),

    /// The provider answered with a non-success HTTP status.
    #[error("provider returned HTTP status {0}")]
    Status(u16),

    /// Transport failure (DNS, TLS, connection, body read).
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// The response body did not have the expected shape.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The provider answered with no text.
    #[error("empty response from model")]
    EmptyResponse,

    /// The host model command could not be run or exited unsuccessfully.
    #[error("host model command failed: {0}")]
    Command(String),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("request cancelled")]
    Cancelled,

    /// The blocking worker running the call panicked or was aborted.
    #[error("provider task failed: {0}")]
    Join(String),
}

impl From<ureq::Error> for CallError {
    fn from(e: ureq::Error) -> Self {
        match e {
            ureq::Error::StatusCode(code) => CallError::Status(code),
            other => CallError::Http(other.to_string()),
        }
    }
}

/// The configured explanation backend.
#[derive(Debug)]
pub enum LlmBackend {
    OpenAi(OpenAiClient),
    Gemini(GeminiClient),
    HostModel(HostModel),
    None,
}

impl LlmBackend {
    /// Build the backend selected by `llm.provider`.
    pub fn from_config(config: &LlmConfig) -> Self {
        let timeout = Duration::from_secs(config.timeout_secs);
        let backend = match config.provider {
            LlmProvider::None => LlmBackend::None,
            LlmProvider::OpenAi => LlmBackend::OpenAi(OpenAiClient::from_config(&config.openai, timeout)),
            LlmProvider::Gemini => LlmBackend::Gemini(GeminiClient::from_config(&config.gemini, timeout)),
            LlmProvider::HostModel => LlmBackend::HostModel(HostModel::from_config(&config.host_model)),
        };
        log::debug!("LLM backend: {}", backend.name());
        backend
    }

    pub fn name(&self) -> &'static str {
        match self {
            LlmBackend::OpenAi(_) => "openai",
            LlmBackend::Gemini(_) => "gemini",
            LlmBackend::HostModel(_) => "host_model",
            LlmBackend::None => "none",
        }
    }

    pub fn is_configured(&self) -> bool {
        !matches!(self, LlmBackend::None)
    }

    /// Send one prompt and wait for the complete reply. Blocking.
    pub fn complete(&self, prompt: &str) -> Result<String, CallError> {
        match self {
            LlmBackend::OpenAi(client) => client.complete(prompt),
            LlmBackend::Gemini(client) => client.complete(prompt),
            LlmBackend::HostModel(model) => model.complete(prompt),
            LlmBackend::None => Err(CallError::NotConfigured),
        }
    }
}
