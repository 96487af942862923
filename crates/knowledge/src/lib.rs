//! Corpus indexing, retrieval and answering strategies.
//!
//! A plain-text corpus is split into overlapping chunks, embedded and held
//! in an in-memory vector index. The [`rag`] module layers the answering
//! strategies on top of retrieval and text generation.

pub mod chunker;
pub mod embeddings;
pub mod rag;
pub mod retriever;
pub mod store;
pub mod types;
pub mod vector_index;

#[cfg(test)]
mod tests;

pub use chunker::{chunk_text, ChunkConfig, SplitterKind};
pub use embeddings::{create_provider, EmbeddingConfig, EmbeddingProvider};
pub use rag::{answer, RagAnswer, RagContext, Session, StrategyKind};
pub use retriever::{Retriever, DEFAULT_TOP_K};
pub use store::{build_index, build_index_from_text, corpus_digest};
pub use types::{Chunk, EmbeddedChunk, RetrievalResult, RetrievedChunk};
pub use vector_index::{InMemoryIndex, IndexInfo, VectorIndex};
