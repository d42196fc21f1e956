//! OpenAI chat-completions client.

use std::time::Duration;

use errflow_config::OpenAiConfig;
use serde::{Deserialize, Serialize};

use super::{CallError, SYSTEM_PROMPT};
use crate::http;

#[derive(Debug, Clone)]
pub struct OpenAiClient {
    api_key: Option<String>,
    model: String,
    base_url: String,
    timeout: Duration,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiClient {
    pub fn from_config(config: &OpenAiConfig, timeout: Duration) -> Self {
        Self {
            api_key: config.resolved_api_key(),
            model: config.model.clone(),
            base_url: config.base_url.clone(),
            timeout,
        }
    }

    /// `<base_url>/chat/completions`
    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    /// JSON request body for one prompt.
    pub fn request_body(&self, prompt: &str) -> Result<String, CallError> {
        let request = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: 0.2,
        };
        serde_json::to_string(&request).map_err(|e| CallError::InvalidResponse(e.to_string()))
    }

    pub fn complete(&self, prompt: &str) -> Result<String, CallError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(CallError::MissingApiKey("openai"))?;
        let body = self.request_body(prompt)?;

        log::debug!("OpenAI request: model={} prompt_chars={}", self.model, prompt.len());

        let mut response = http::agent(self.timeout)
            .post(&self.endpoint())
            .header("Authorization", format!("Bearer {api_key}"))
            .header("Content-Type", "application/json")
            .header("User-Agent", http::USER_AGENT)
            .send(body)?;

        let text = response
            .body_mut()
            .with_config()
            .limit(http::MAX_API_RESPONSE_SIZE)
            .read_to_string()?;

        parse_response(&text)
    }
}

/// Text of the first choice in a chat-completions response.
pub fn parse_response(body: &str) -> Result<String, CallError> {
    let response: ChatResponse =
        serde_json::from_str(body).map_err(|e| CallError::InvalidResponse(e.to_string()))?;
    let content = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .unwrap_or_default();
    if content.trim().is_empty() {
        return Err(CallError::EmptyResponse);
    }
    Ok(content)
}
