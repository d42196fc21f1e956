//! Explanation orchestration.
//!
//! A configured model is asked first; any failure falls back to the offline
//! heuristics so an explanation is always produced.

pub mod context;
pub mod heuristics;

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use errflow_config::{Config, ExplainConfig};
use tokio_util::sync::CancellationToken;

use crate::llm::{CallError, LlmBackend};

pub use context::{LanguageHint, build_prompt, detect_language, read_snippet};
pub use heuristics::explain_heuristically;

/// Where an explanation came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExplanationSource {
    /// A language model; carries the backend name.
    Model(&'static str),
    /// The built-in rules.
    Heuristic,
}

impl fmt::Display for ExplanationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExplanationSource::Model(name) => write!(f, "model ({name})"),
            ExplanationSource::Heuristic => f.write_str("built-in rules"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Explanation {
    pub text: String,
    pub source: ExplanationSource,
}

impl Explanation {
    pub fn heuristic(log: &str) -> Self {
        Self {
            text: explain_heuristically(log),
            source: ExplanationSource::Heuristic,
        }
    }
}

pub struct Explainer {
    backend: Arc<LlmBackend>,
    settings: ExplainConfig,
    timeout: Duration,
    workspace_root: PathBuf,
}

impl Explainer {
    pub fn new(
        backend: LlmBackend,
        settings: ExplainConfig,
        timeout: Duration,
        workspace_root: PathBuf,
    ) -> Self {
        Self {
            backend: Arc::new(backend),
            settings,
            timeout,
            workspace_root,
        }
    }

    /// Build from config. `offline` forces the heuristic path.
    pub fn from_config(config: &Config, offline: bool, workspace_root: PathBuf) -> Self {
        let backend = if offline {
            LlmBackend::None
        } else {
            LlmBackend::from_config(&config.llm)
        };
        Self::new(
            backend,
            config.explain.clone(),
            Duration::from_secs(config.llm.timeout_secs),
            workspace_root,
        )
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Explain one log snapshot. Never fails.
    pub async fn explain(&self, log: &str, cancel: &CancellationToken) -> Explanation {
        let prompt = build_prompt(log, &self.workspace_root, &self.settings);

        match self.ask_model(prompt, cancel).await {
            Ok(text) => Explanation {
                text,
                source: ExplanationSource::Model(self.backend.name()),
            },
            Err(CallError::NotConfigured) => {
                log::debug!("No language model configured, using built-in rules");
                Explanation::heuristic(log)
            }
            Err(e) => {
                log::warn!(
                    "{} explanation failed, falling back to built-in rules: {e}",
                    self.backend.name()
                );
                Explanation::heuristic(log)
            }
        }
    }

    /// Run the blocking provider call off the runtime, bounded by the timeout
    /// and the cancellation token.
    async fn ask_model(&self, prompt: String, cancel: &CancellationToken) -> Result<String, CallError> {
        if !self.backend.is_configured() {
            return Err(CallError::NotConfigured);
        }
        if cancel.is_cancelled() {
            return Err(CallError::Cancelled);
        }

        let backend = Arc::clone(&self.backend);
        let task = tokio::task::spawn_blocking(move || backend.complete(&prompt));

        let reply = tokio::select! {
            _ = cancel.cancelled() => return Err(CallError::Cancelled),
            result = tokio::time::timeout(self.timeout, task) => match result {
                Err(_) => return Err(CallError::Timeout(self.timeout)),
                Ok(Err(join)) => return Err(CallError::Join(join.to_string())),
                Ok(Ok(reply)) => reply?,
            },
        };

        let reply = reply.trim();
        if reply.is_empty() {
            return Err(CallError::EmptyResponse);
        }
        Ok(reply.to_string())
    }
}
