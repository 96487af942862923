//! OpenAI-compatible chat completions provider.
//!
//! Serves any endpoint that follows the `/chat/completions` wire format:
//! Groq (the default hosted backend) and OpenAI itself.

use crate::client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
use ragplay_core::{AppError, AppResult};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::instrument;

/// Groq's OpenAI-compatible base URL.
pub const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// OpenAI base URL.
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    model: String,
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

/// Client for OpenAI-compatible chat completion endpoints.
pub struct OpenAiCompatClient {
    provider: String,
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl OpenAiCompatClient {
    /// Create a client for `provider` at `base_url`, authenticating with `api_key`.
    pub fn new(
        provider: impl Into<String>,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            provider: provider.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Groq client with the default base URL.
    pub fn groq(api_key: impl Into<String>) -> Self {
        Self::new("groq", GROQ_BASE_URL, api_key)
    }

    /// OpenAI client with the default base URL.
    pub fn openai(api_key: impl Into<String>) -> Self {
        Self::new("openai", OPENAI_BASE_URL, api_key)
    }

    /// Replace the HTTP client with one that times out after `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> AppResult<Self> {
        self.client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Generation(format!("Failed to build HTTP client: {}", e)))?;
        Ok(self)
    }

    fn build_body(&self, request: &LlmRequest) -> Value {
        let mut body = json!({
            "model": request.model,
            "messages": [{ "role": "user", "content": request.prompt }],
        });

        if let Some(temperature) = request.temperature {
            body["temperature"] = json!(temperature);
        }

        body
    }

    fn parse_completion(&self, completion: ChatCompletion, requested_model: &str) -> AppResult<LlmResponse> {
        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                AppError::Generation(format!("{} returned no completion choices", self.provider))
            })?;

        let usage = completion
            .usage
            .map(|u| LlmUsage::new(u.prompt_tokens, u.completion_tokens))
            .unwrap_or_default();

        let model = if completion.model.is_empty() {
            requested_model.to_string()
        } else {
            completion.model
        };

        Ok(LlmResponse {
            content,
            model,
            usage,
        })
    }
}

#[async_trait::async_trait]
impl LlmClient for OpenAiCompatClient {
    fn provider_name(&self) -> &str {
        &self.provider
    }

    #[instrument(skip(self, request), fields(provider = %self.provider, model = %request.model))]
    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = self.build_body(request);

        tracing::debug!(url = %url, "Sending chat completion request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                AppError::Generation(format!("Failed to reach {}: {}", self.provider, e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Generation(format!(
                "{} API error ({}): {}",
                self.provider, status, error_text
            )));
        }

        let completion: ChatCompletion = response.json().await.map_err(|e| {
            AppError::Generation(format!("Failed to parse {} response: {}", self.provider, e))
        })?;

        let parsed = self.parse_completion(completion, &request.model)?;
        tracing::debug!(
            completion_tokens = parsed.usage.completion_tokens,
            "Received chat completion"
        );
        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_groq_defaults() {
        let client = OpenAiCompatClient::groq("gsk-test");
        assert_eq!(client.provider_name(), "groq");
        assert_eq!(client.base_url, GROQ_BASE_URL);
    }

    #[test]
    fn test_body_is_single_user_message() {
        let client = OpenAiCompatClient::openai("sk-test");
        let request = LlmRequest::new("What is Rust?", "gpt-4o-mini").with_temperature(0.2);

        let body = client.build_body(&request);
        assert_eq!(body["model"], "gpt-4o-mini");
        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0]["role"], "user");
        assert_eq!(messages[0]["content"], "What is Rust?");
        assert!(body.get("max_tokens").is_none());
        let temperature = body["temperature"].as_f64().unwrap();
        assert!((temperature - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_parse_completion_takes_first_choice() {
        let client = OpenAiCompatClient::groq("gsk-test");
        let completion: ChatCompletion = serde_json::from_value(json!({
            "model": "llama3-8b-8192",
            "choices": [
                { "message": { "role": "assistant", "content": "Paris" } },
                { "message": { "role": "assistant", "content": "Lyon" } }
            ],
            "usage": { "prompt_tokens": 10, "completion_tokens": 1 }
        }))
        .unwrap();

        let response = client.parse_completion(completion, "ignored").unwrap();
        assert_eq!(response.content, "Paris");
        assert_eq!(response.usage.total_tokens, 11);
    }

    #[test]
    fn test_parse_completion_without_choices_fails() {
        let client = OpenAiCompatClient::groq("gsk-test");
        let completion: ChatCompletion =
            serde_json::from_value(json!({ "choices": [] })).unwrap();

        let err = client.parse_completion(completion, "llama3").unwrap_err();
        assert!(matches!(err, AppError::Generation(_)));
    }
}
