//! Knowledge system type definitions.

use serde::{Deserialize, Serialize};

/// A window of corpus text.
///
/// Immutable once created and owned by the index it was built into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Position of this chunk in the corpus split order
    pub position: usize,

    /// Chunk content
    pub text: String,

    /// Character offset of the first character in the corpus
    #[serde(rename = "sourceOffset")]
    pub source_offset: usize,
}

impl Chunk {
    pub fn new(position: usize, text: impl Into<String>, source_offset: usize) -> Self {
        Self {
            position,
            text: text.into(),
            source_offset,
        }
    }

    /// Length in characters.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// A chunk paired with its embedding vector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddedChunk {
    pub chunk: Chunk,
    pub vector: Vec<f32>,
}

/// A chunk returned by retrieval with its similarity to the query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievedChunk {
    pub chunk: Chunk,
    pub score: f32,
}

impl RetrievedChunk {
    pub fn text(&self) -> &str {
        &self.chunk.text
    }
}

/// Chunks nearest to a query, ranked by descending similarity.
pub type RetrievalResult = Vec<RetrievedChunk>;

/// Join chunk texts with `separator`.
pub fn join_texts(chunks: &[RetrievedChunk], separator: &str) -> String {
    chunks
        .iter()
        .map(RetrievedChunk::text)
        .collect::<Vec<_>>()
        .join(separator)
}
