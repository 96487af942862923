//! Embedders for chunks and queries.
//!
//! The same provider must embed the corpus and every query run against it.

pub mod config;
pub mod provider;
pub mod providers;

pub use config::EmbeddingConfig;
pub use provider::{create_provider, EmbeddingProvider};
pub use providers::{ollama::OllamaProvider, trigram::TrigramProvider};
