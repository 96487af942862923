//! Document store builder: corpus file to searchable index.

use crate::chunker::{chunk_text, ChunkConfig};
use crate::embeddings::EmbeddingProvider;
use crate::types::{Chunk, EmbeddedChunk};
use crate::vector_index::{InMemoryIndex, IndexInfo, VectorIndex};
use chrono::Utc;
use ragplay_core::{AppError, AppResult};
use sha2::{Digest, Sha256};
use std::path::Path;
use std::time::Instant;

/// Build an index from the plain-text corpus at `path`.
///
/// # Errors
/// - `SourceNotFound` if `path` does not exist
/// - `InvalidParameter` for bad chunking parameters
/// - `Embedding` if the embedder fails
pub async fn build_index(
    path: &Path,
    config: &ChunkConfig,
    embedder: &dyn EmbeddingProvider,
) -> AppResult<InMemoryIndex> {
    if !path.exists() {
        return Err(AppError::SourceNotFound(path.to_path_buf()));
    }

    let text = tokio::fs::read_to_string(path).await?;

    tracing::info!(
        "Building index from {:?} ({} bytes)",
        path,
        text.len()
    );

    build_index_from_text(&text, config, embedder).await
}

/// Build an index from corpus text already in memory.
pub async fn build_index_from_text(
    text: &str,
    config: &ChunkConfig,
    embedder: &dyn EmbeddingProvider,
) -> AppResult<InMemoryIndex> {
    let start = Instant::now();

    let chunks = chunk_text(text, config)?;
    let entries = embed_chunks(chunks, embedder).await?;

    let info = IndexInfo {
        corpus_digest: corpus_digest(text),
        chunking: config.clone(),
        embedding_provider: embedder.provider_name().to_string(),
        embedding_model: embedder.model_name().to_string(),
        dimensions: embedder.dimensions(),
        chunk_count: entries.len(),
        built_at: Utc::now(),
    };

    let index = InMemoryIndex::new(entries, info)?;

    tracing::info!(
        "Indexed {} chunks with {} ({} dims) in {:.2}s",
        index.info().chunk_count,
        embedder.provider_name(),
        embedder.dimensions(),
        start.elapsed().as_secs_f64()
    );

    Ok(index)
}

async fn embed_chunks(
    chunks: Vec<Chunk>,
    embedder: &dyn EmbeddingProvider,
) -> AppResult<Vec<EmbeddedChunk>> {
    if chunks.is_empty() {
        tracing::warn!("Corpus produced no chunks; retrieval will return empty context");
        return Ok(Vec::new());
    }

    let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
    let vectors = embedder.embed_batch(&texts).await?;

    if vectors.len() != chunks.len() {
        return Err(AppError::Embedding(format!(
            "embedder returned {} vectors for {} chunks",
            vectors.len(),
            chunks.len()
        )));
    }

    Ok(chunks
        .into_iter()
        .zip(vectors)
        .map(|(chunk, vector)| EmbeddedChunk { chunk, vector })
        .collect())
}

/// Hex SHA-256 of the corpus text.
pub fn corpus_digest(text: &str) -> String {
    let digest = Sha256::digest(text.as_bytes());
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeddings::TrigramProvider;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_source() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("data/documents.txt");

        let err = build_index(&missing, &ChunkConfig::default(), &TrigramProvider::new(64))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::SourceNotFound(p) if p == missing));
    }

    #[tokio::test]
    async fn test_build_from_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("documents.txt");
        fs::write(&path, "Rust is a systems programming language. ".repeat(40)).unwrap();

        let index = build_index(&path, &ChunkConfig::new(200, 20), &TrigramProvider::new(64))
            .await
            .unwrap();

        assert!(index.len() > 1);
        assert_eq!(index.dimensions(), 64);
        assert_eq!(index.info().embedding_provider, "trigram");
        assert_eq!(index.info().corpus_digest.len(), 64);
    }

    #[tokio::test]
    async fn test_rebuild_is_idempotent() {
        let text = "Paris is the capital of France. Berlin is the capital of Germany. ".repeat(30);
        let config = ChunkConfig::new(120, 15);
        let embedder = TrigramProvider::new(128);

        let first = build_index_from_text(&text, &config, &embedder).await.unwrap();
        let second = build_index_from_text(&text, &config, &embedder).await.unwrap();

        assert_eq!(first.chunks(), second.chunks());
        assert!(first.info().same_inputs(second.info()));
    }

    #[tokio::test]
    async fn test_empty_corpus_builds_empty_index() {
        let index = build_index_from_text("", &ChunkConfig::default(), &TrigramProvider::new(32))
            .await
            .unwrap();
        assert!(index.is_empty());
    }

    #[test]
    fn test_corpus_digest() {
        assert_eq!(
            corpus_digest("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
