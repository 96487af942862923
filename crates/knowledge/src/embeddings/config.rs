//! Embedding configuration.

use ragplay_core::{AppConfig, AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Which embedder to build and how.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmbeddingConfig {
    /// Provider name: "trigram" or "ollama"
    pub provider: String,

    /// Model identifier (provider-specific)
    pub model: String,

    /// Embedding vector dimensions
    pub dimensions: usize,

    /// Whether to normalize embeddings to unit length
    #[serde(default = "default_normalize")]
    pub normalize: bool,

    /// Provider endpoint, when it is a network service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

fn default_normalize() -> bool {
    true
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: "trigram".to_string(),
            model: "trigram-v1".to_string(),
            dimensions: 384,
            normalize: true,
            endpoint: None,
        }
    }
}

impl EmbeddingConfig {
    /// Derive the embedder settings from the application configuration.
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            provider: config.embedding_provider.clone(),
            model: config.embedding_model.clone(),
            dimensions: config.embedding_dim,
            endpoint: config.resolve_endpoint(&config.embedding_provider),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.dimensions == 0 {
            return Err(AppError::InvalidParameter(
                "embedding dimensions must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
