//! Vector index abstraction and the in-memory implementation.

use crate::chunker::ChunkConfig;
use crate::types::{Chunk, EmbeddedChunk, RetrievedChunk};
use chrono::{DateTime, Utc};
use ragplay_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Trait for vector index backends.
///
/// An index is built once per corpus and read-only afterwards, so it can be
/// shared across requests behind an `Arc`.
pub trait VectorIndex: Send + Sync {
    /// Number of indexed chunks.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Vector dimensions every entry has.
    fn dimensions(&self) -> usize;

    /// Indexed chunks in split order.
    fn chunks(&self) -> Vec<&Chunk>;

    /// Build metadata.
    fn info(&self) -> &IndexInfo;

    /// Top-k entries by descending similarity to `query_embedding`.
    ///
    /// Equal scores keep chunk order. An empty index yields an empty result.
    fn search(&self, query_embedding: &[f32], top_k: usize) -> AppResult<Vec<RetrievedChunk>>;
}

/// What an index was built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexInfo {
    /// SHA-256 of the corpus text, hex encoded
    pub corpus_digest: String,
    pub chunking: ChunkConfig,
    pub embedding_provider: String,
    pub embedding_model: String,
    pub dimensions: usize,
    pub chunk_count: usize,
    pub built_at: DateTime<Utc>,
}

impl IndexInfo {
    /// Whether two builds used the same corpus, chunking and embedder.
    pub fn same_inputs(&self, other: &IndexInfo) -> bool {
        self.corpus_digest == other.corpus_digest
            && self.chunking == other.chunking
            && self.embedding_provider == other.embedding_provider
            && self.embedding_model == other.embedding_model
            && self.dimensions == other.dimensions
    }
}

/// Compute cosine similarity between two vectors.
///
/// Returns 0.0 if either vector has zero magnitude.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// Brute-force cosine index held in memory.
#[derive(Debug, Clone)]
pub struct InMemoryIndex {
    entries: Vec<EmbeddedChunk>,
    info: IndexInfo,
}

impl InMemoryIndex {
    /// Index over `entries`, which must all have `info.dimensions` components.
    pub fn new(entries: Vec<EmbeddedChunk>, mut info: IndexInfo) -> AppResult<Self> {
        if let Some(bad) = entries.iter().find(|e| e.vector.len() != info.dimensions) {
            return Err(AppError::Knowledge(format!(
                "chunk {} has {} dimensions, index expects {}",
                bad.chunk.position,
                bad.vector.len(),
                info.dimensions
            )));
        }
        info.chunk_count = entries.len();
        Ok(Self { entries, info })
    }
}

impl VectorIndex for InMemoryIndex {
    fn len(&self) -> usize {
        self.entries.len()
    }

    fn dimensions(&self) -> usize {
        self.info.dimensions
    }

    fn chunks(&self) -> Vec<&Chunk> {
        self.entries.iter().map(|e| &e.chunk).collect()
    }

    fn info(&self) -> &IndexInfo {
        &self.info
    }

    fn search(&self, query_embedding: &[f32], top_k: usize) -> AppResult<Vec<RetrievedChunk>> {
        if top_k == 0 {
            return Err(AppError::InvalidParameter(
                "k must be at least 1".to_string(),
            ));
        }

        if self.entries.is_empty() {
            return Ok(Vec::new());
        }

        if query_embedding.len() != self.info.dimensions {
            return Err(AppError::Knowledge(format!(
                "query embedding has {} dimensions, index expects {}",
                query_embedding.len(),
                self.info.dimensions
            )));
        }

        let mut scored: Vec<RetrievedChunk> = self
            .entries
            .iter()
            .map(|entry| RetrievedChunk {
                chunk: entry.chunk.clone(),
                score: cosine_similarity(&entry.vector, query_embedding),
            })
            .collect();

        // sort_by is stable: ties stay in chunk order.
        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        scored.truncate(top_k);

        Ok(scored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(dimensions: usize) -> IndexInfo {
        IndexInfo {
            corpus_digest: "d".to_string(),
            chunking: ChunkConfig::default(),
            embedding_provider: "test".to_string(),
            embedding_model: "test".to_string(),
            dimensions,
            chunk_count: 0,
            built_at: Utc::now(),
        }
    }

    fn entry(position: usize, text: &str, vector: Vec<f32>) -> EmbeddedChunk {
        EmbeddedChunk {
            chunk: Chunk::new(position, text, position * 10),
            vector,
        }
    }

    #[test]
    fn test_cosine_similarity() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    }

    #[test]
    fn test_search_ranks_descending() {
        let index = InMemoryIndex::new(
            vec![
                entry(0, "pasta", vec![-0.3, -0.8, 0.4]),
                entry(1, "rust", vec![1.0, 0.5, 0.2]),
                entry(2, "systems", vec![0.7, 0.7, 0.0]),
            ],
            info(3),
        )
        .unwrap();

        let results = index.search(&[0.9, 0.4, 0.3], 3).unwrap();
        assert_eq!(results[0].text(), "rust");
        assert_eq!(results[2].text(), "pasta");
        assert!(results.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_ties_keep_chunk_order() {
        let index = InMemoryIndex::new(
            vec![
                entry(0, "first", vec![1.0, 0.0]),
                entry(1, "other", vec![0.0, 1.0]),
                entry(2, "second", vec![2.0, 0.0]),
                entry(3, "third", vec![0.5, 0.0]),
            ],
            info(2),
        )
        .unwrap();

        let results = index.search(&[1.0, 0.0], 3).unwrap();
        let texts: Vec<&str> = results.iter().map(|r| r.text()).collect();
        assert_eq!(texts, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_search_truncates_to_k() {
        let entries = (0..10).map(|i| entry(i, "x", vec![1.0, i as f32])).collect();
        let index = InMemoryIndex::new(entries, info(2)).unwrap();

        assert_eq!(index.search(&[1.0, 1.0], 4).unwrap().len(), 4);
        assert_eq!(index.info().chunk_count, 10);
    }

    #[test]
    fn test_empty_index_returns_empty() {
        let index = InMemoryIndex::new(Vec::new(), info(4)).unwrap();
        assert!(index.is_empty());
        assert!(index.search(&[1.0, 0.0, 0.0, 0.0], 4).unwrap().is_empty());
    }

    #[test]
    fn test_zero_k_is_invalid() {
        let index = InMemoryIndex::new(Vec::new(), info(2)).unwrap();
        assert!(matches!(
            index.search(&[1.0, 0.0], 0),
            Err(AppError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_dimension_mismatch() {
        assert!(InMemoryIndex::new(vec![entry(0, "x", vec![1.0])], info(2)).is_err());

        let index = InMemoryIndex::new(vec![entry(0, "x", vec![1.0, 0.0])], info(2)).unwrap();
        assert!(matches!(
            index.search(&[1.0, 0.0, 0.0], 1),
            Err(AppError::Knowledge(_))
        ));
    }
}
