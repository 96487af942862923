//! Query-time retrieval.

use crate::embeddings::EmbeddingProvider;
use crate::types::RetrievalResult;
use crate::vector_index::VectorIndex;
use ragplay_core::{AppError, AppResult};
use std::sync::Arc;

/// Default number of chunks per query.
pub const DEFAULT_TOP_K: usize = 4;

/// Embeds queries and looks them up in a shared index.
///
/// The embedder must be the one the index was built with.
#[derive(Clone)]
pub struct Retriever {
    index: Arc<dyn VectorIndex>,
    embedder: Arc<dyn EmbeddingProvider>,
}

impl Retriever {
    pub fn new(index: Arc<dyn VectorIndex>, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self { index, embedder }
    }

    /// The `k` chunks nearest to `query`, most similar first.
    ///
    /// # Errors
    /// `InvalidParameter` if `k` is zero. An empty index is not an error.
    pub async fn retrieve(&self, query: &str, k: usize) -> AppResult<RetrievalResult> {
        if k == 0 {
            return Err(AppError::InvalidParameter(
                "k must be at least 1".to_string(),
            ));
        }

        if self.index.is_empty() {
            tracing::debug!("Index is empty; returning no context");
            return Ok(Vec::new());
        }

        let query_embedding = self.embedder.embed(query).await?;
        let results = self.index.search(&query_embedding, k)?;

        tracing::debug!(
            k,
            returned = results.len(),
            top_score = results.first().map(|r| r.score).unwrap_or(0.0),
            "Retrieved chunks"
        );

        Ok(results)
    }
}

impl std::fmt::Debug for Retriever {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Retriever")
            .field("chunks", &self.index.len())
            .field("embedder", &self.embedder)
            .finish()
    }
}
