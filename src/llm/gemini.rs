//! Google Gemini `generateContent` client.

use std::time::Duration;

use errflow_config::GeminiConfig;
use serde::{Deserialize, Serialize};

use super::{CallError, SYSTEM_PROMPT};
use crate::http;

#[derive(Debug, Clone)]
pub struct GeminiClient {
    api_key: Option<String>,
    model: String,
    base_url: String,
    timeout: Duration,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
    system_instruction: GeminiInstruction<'a>,
}

#[derive(Serialize)]
struct GeminiInstruction<'a> {
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Serialize)]
struct GeminiContent<'a> {
    role: &'a str,
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiReplyContent>,
}

#[derive(Deserialize)]
struct GeminiReplyContent {
    #[serde(default)]
    parts: Vec<GeminiReplyPart>,
}

#[derive(Deserialize)]
struct GeminiReplyPart {
    #[serde(default)]
    text: String,
}

impl GeminiClient {
    pub fn from_config(config: &GeminiConfig, timeout: Duration) -> Self {
        Self {
            api_key: config.resolved_api_key(),
            model: config.model.clone(),
            base_url: config.base_url.clone(),
            timeout,
        }
    }

    /// `<base_url>/<model>:generateContent`
    pub fn endpoint(&self) -> String {
        format!(
            "{}/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }

    pub fn request_body(&self, prompt: &str) -> Result<String, CallError> {
        let request = GeminiRequest {
            contents: vec![GeminiContent {
                role: "user",
                parts: vec![GeminiPart { text: prompt }],
            }],
            system_instruction: GeminiInstruction {
                parts: vec![GeminiPart {
                    text: SYSTEM_PROMPT,
                }],
            },
        };
        serde_json::to_string(&request).map_err(|e| CallError::InvalidResponse(e.to_string()))
    }

    pub fn complete(&self, prompt: &str) -> Result<String, CallError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(CallError::MissingApiKey("gemini"))?;
        let body = self.request_body(prompt)?;

        log::debug!("Gemini request: model={} prompt_chars={}", self.model, prompt.len());

        let mut response = http::agent(self.timeout)
            .post(&self.endpoint())
            .header("x-goog-api-key", api_key)
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

/// Concatenated text parts of the first candidate.
pub fn parse_response(body: &str) -> Result<String, CallError> {
    let response: GeminiResponse =
        serde_json::from_str(body).map_err(|e| CallError::InvalidResponse(e.to_string()))?;
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| content.parts.into_iter().map(|part| part.text).collect())
        .unwrap_or_default();
    if text.trim().is_empty() {
        return Err(CallError::EmptyResponse);
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> GeminiClient {
        GeminiClient::from_config(
            &GeminiConfig {
                api_key: Some("key".to_string()),
                model: "gemini-2.0-flash".to_string(),
                base_url: "https://generativelanguage.googleapis.com/v1beta/models".to_string(),
            },
            Duration::from_secs(5),
        )
    }

    #[test]
    fn test_endpoint() {
        assert_eq!(
            client().endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent"
        );
    }

    #[test]
    fn test_request_body_shape() {
        let body = client().request_body("explain").unwrap();
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["contents"][0]["parts"][0]["text"], "explain");
        assert_eq!(json["systemInstruction"]["parts"][0]["text"], SYSTEM_PROMPT);
    }

    #[test]
    fn test_parse_joins_parts() {
        let body = r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"Step 1. "},{"text":"Step 2."}]},"finishReason":"STOP"}]}"#;
        assert_eq!(parse_response(body).unwrap(), "Step 1. Step 2.");
    }

    #[test]
    fn test_parse_blocked_candidate_is_empty() {
        let body = r#"{"candidates":[{"finishReason":"SAFETY"}]}"#;
        assert!(matches!(parse_response(body), Err(CallError::EmptyResponse)));
        assert!(matches!(parse_response("{}"), Err(CallError::EmptyResponse)));
    }
}
