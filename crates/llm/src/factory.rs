//! LLM provider factory.
//!
//! Builds a client from a provider name, optional endpoint and API key.

use crate::client::LlmClient;
use crate::providers::{ollama, openai, OllamaClient, OpenAiCompatClient, ScriptedClient};
use crate::types::ProviderType;
use ragplay_core::{AppError, AppResult};
use std::sync::Arc;
use std::time::Duration;

/// Create an LLM client based on the provider name.
///
/// # Arguments
/// * `provider` - Provider identifier ("groq", "openai", "ollama", "scripted")
/// * `endpoint` - Optional custom endpoint URL
/// * `api_key` - API key, required by hosted providers
/// * `timeout` - Optional HTTP timeout
///
/// # Errors
/// Returns `AppError::Config` if the provider is unknown or a required
/// API key is missing.
pub fn create_client(
    provider: &str,
    endpoint: Option<&str>,
    api_key: Option<&str>,
    timeout: Option<Duration>,
) -> AppResult<Arc<dyn LlmClient>> {
    let provider_type = ProviderType::parse(provider)
        .ok_or_else(|| AppError::Config(format!("Unknown provider: {}", provider)))?;

    if provider_type.requires_api_key() && api_key.map_or(true, str::is_empty) {
        return Err(AppError::Config(format!(
            "{} provider requires an API key (set RAGPLAY_API_KEY or {}_API_KEY)",
            provider_type.as_str(),
            provider_type.as_str().to_uppercase()
        )));
    }

    tracing::debug!(provider = provider_type.as_str(), ?endpoint, "Creating LLM client");

    match provider_type {
        ProviderType::Groq | ProviderType::OpenAI => {
            let default_base = if provider_type == ProviderType::Groq {
                openai::GROQ_BASE_URL
            } else {
                openai::OPENAI_BASE_URL
            };
            let client = OpenAiCompatClient::new(
                provider_type.as_str(),
                endpoint.unwrap_or(default_base),
                api_key.unwrap_or_default(),
            );
            let client = match timeout {
                Some(timeout) => client.with_timeout(timeout)?,
                None => client,
            };
            Ok(Arc::new(client))
        }
        ProviderType::Ollama => {
            let base_url = endpoint.unwrap_or(ollama::DEFAULT_OLLAMA_URL);
            let client = match timeout {
                Some(timeout) => OllamaClient::with_timeout(base_url, timeout)?,
                None => OllamaClient::with_base_url(base_url),
            };
            Ok(Arc::new(client))
        }
        ProviderType::Scripted => Ok(Arc::new(ScriptedClient::default())),
    }
}
