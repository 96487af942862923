//! Text generation on top of an [`LlmClient`].
//!
//! A `Generator` binds a client to a model and a default temperature, and
//! turns a prompt into text. Each call can be cancelled through a
//! [`CancellationToken`] and is bounded by an optional timeout.

use crate::client::{LlmClient, LlmRequest};
use ragplay_core::{AppError, AppResult};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::instrument;

/// Prompt-to-text generator.
#[derive(Clone)]
pub struct Generator {
    client: Arc<dyn LlmClient>,
    model: String,
    temperature: f32,
    timeout: Option<Duration>,
}

impl Generator {
    /// Create a generator for `model` with the given default temperature.
    pub fn new(client: Arc<dyn LlmClient>, model: impl Into<String>, temperature: f32) -> Self {
        Self {
            client,
            model: model.into(),
            temperature,
            timeout: None,
        }
    }

    /// Bound every call by `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn provider_name(&self) -> &str {
        self.client.provider_name()
    }

    /// Default sampling temperature.
    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    /// Generate with the default temperature.
    pub async fn generate_default(
        &self,
        prompt: &str,
        cancel: &CancellationToken,
    ) -> AppResult<String> {
        self.generate(prompt, self.temperature, cancel).await
    }

    /// Produce text for `prompt` at `temperature`.
    ///
    /// # Errors
    /// - `InvalidParameter` if `temperature` is outside 0.0-1.0
    /// - `Cancelled` if `cancel` fires before the provider answers
    /// - `Generation` for provider failures and timeouts
    #[instrument(skip(self, prompt, cancel), fields(model = %self.model, prompt_len = prompt.len()))]
    pub async fn generate(
        &self,
        prompt: &str,
        temperature: f32,
        cancel: &CancellationToken,
    ) -> AppResult<String> {
        if !(0.0..=1.0).contains(&temperature) {
            return Err(AppError::InvalidParameter(format!(
                "temperature must be within 0.0-1.0, got {}",
                temperature
            )));
        }

        if cancel.is_cancelled() {
            return Err(AppError::Cancelled);
        }

        let request = LlmRequest::new(prompt, self.model.as_str()).with_temperature(temperature);
        let call = self.complete_bounded(&request);

        let content = tokio::select! {
            _ = cancel.cancelled() => {
                tracing::debug!("Generation cancelled");
                return Err(AppError::Cancelled);
            }
            result = call => result?,
        };

        tracing::debug!(response_len = content.len(), "Generation complete");
        Ok(content)
    }

    async fn complete_bounded(&self, request: &LlmRequest) -> AppResult<String> {
        let call = self.client.complete(request);

        let response = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, call).await.map_err(|_| {
                AppError::Generation(format!("generation timed out after {:?}", limit))
            })?,
            None => call.await,
        };

        response.map(|r| r.content).map_err(|e| match e {
            AppError::Generation(_) | AppError::Cancelled => e,
            other => AppError::Generation(other.to_string()),
        })
    }
}

impl std::fmt::Debug for Generator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Generator")
            .field("provider", &self.client.provider_name())
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::LlmResponse;
    use crate::providers::ScriptedClient;

    struct SlowClient;

    #[async_trait::async_trait]
    impl LlmClient for SlowClient {
        fn provider_name(&self) -> &str {
            "slow"
        }

        async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(LlmResponse {
                content: "late".to_string(),
                model: request.model.clone(),
                usage: Default::default(),
            })
        }
    }

    #[tokio::test]
    async fn test_generate_returns_content() {
        let generator = Generator::new(Arc::new(ScriptedClient::always("Paris")), "m", 0.7);
        let text = generator
            .generate_default("Capital of France?", &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(text, "Paris");
    }

    #[tokio::test]
    async fn test_temperature_out_of_range() {
        let client = Arc::new(ScriptedClient::always("x"));
        let generator = Generator::new(client.clone(), "m", 0.7);

        let err = generator
            .generate("q", 1.5, &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidParameter(_)));
        assert_eq!(client.call_count(), 0);
    }

    #[tokio::test]
    async fn test_provider_failure_is_generation_error() {
        let client = ScriptedClient::default().then_fail("503 Service Unavailable");
        let generator = Generator::new(Arc::new(client), "m", 0.7);

        let err = generator
            .generate_default("q", &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Generation(_)));
    }

    #[tokio::test]
    async fn test_cancel_interrupts_call() {
        let generator = Generator::new(Arc::new(SlowClient), "m", 0.7);
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            trigger.cancel();
        });

        let err = generator.generate_default("q", &cancel).await.unwrap_err();
        assert!(matches!(err, AppError::Cancelled));
    }

    #[tokio::test]
    async fn test_timeout() {
        let generator =
            Generator::new(Arc::new(SlowClient), "m", 0.7).with_timeout(Duration::from_millis(20));

        let err = generator
            .generate_default("q", &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Generation(msg) if msg.contains("timed out")));
    }
}
