//! Trigram embedding provider using hashed character trigrams.

use crate::embeddings::provider::EmbeddingProvider;
use ragplay_core::{AppError, AppResult};
use std::collections::BTreeMap;

pub const TRIGRAM_MODEL: &str = "trigram-v1";

const STOP_WORDS: &[&str] = &[
    "the", "is", "at", "which", "on", "a", "an", "as", "are", "was", "were", "for", "to", "of",
    "in", "and", "or", "but", "with", "by", "from", "this", "that", "be", "have", "has", "had",
    "it", "its", "their", "they", "them", "what", "who", "how",
];

/// Trigram-based embedding provider for local, offline operation.
///
/// Words are lower-cased, stripped of punctuation and stop words, padded
/// with a boundary marker and hashed trigram by trigram into a fixed number
/// of buckets. The vector is unit-normalised, so cosine similarity reduces
/// to a dot product. Deterministic across runs and platforms.
#[derive(Debug)]
pub struct TrigramProvider {
    dimensions: usize,
    normalize: bool,
}

impl TrigramProvider {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            normalize: true,
        }
    }

    /// Keep raw bucket counts instead of a unit vector.
    pub fn without_normalization(mut self) -> Self {
        self.normalize = false;
        self
    }

    fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut embedding = vec![0.0f32; self.dimensions];

        // Ordered so bucket sums accumulate in the same order on every run.
        let mut word_freq: BTreeMap<String, u32> = BTreeMap::new();
        for word in text
            .split(|c: char| !c.is_alphanumeric())
            .map(str::to_lowercase)
            .filter(|w| w.chars().count() > 1 && !STOP_WORDS.contains(&w.as_str()))
        {
            *word_freq.entry(word).or_insert(0) += 1;
        }

        for (word, freq) in &word_freq {
            let padded: Vec<char> = std::iter::once('#')
                .chain(word.chars())
                .chain(std::iter::once('#'))
                .collect();

            let weight = (*freq as f32).sqrt();
            for window in padded.windows(3) {
                let bucket = bucket_of(window.iter().collect::<String>().as_bytes(), self.dimensions);
                embedding[bucket] += weight;
            }

            let bucket = bucket_of(word.as_bytes(), self.dimensions);
            embedding[bucket] += *freq as f32;
        }

        if self.normalize {
            let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
            if norm > 0.0 {
                embedding.iter_mut().for_each(|v| *v /= norm);
            }
        }

        embedding
    }
}

/// FNV-1a hash folded into `dimensions` buckets.
fn bucket_of(bytes: &[u8], dimensions: usize) -> usize {
    let hash = bytes.iter().fold(0xcbf2_9ce4_8422_2325u64, |acc, b| {
        (acc ^ u64::from(*b)).wrapping_mul(0x0100_0000_01b3)
    });
    (hash % dimensions as u64) as usize
}

#[async_trait::async_trait]
impl EmbeddingProvider for TrigramProvider {
    fn provider_name(&self) -> &str {
        "trigram"
    }

    fn model_name(&self) -> &str {
        TRIGRAM_MODEL
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        if self.dimensions == 0 {
            return Err(AppError::Embedding(
                "trigram embedder needs at least one dimension".to_string(),
            ));
        }
        Ok(texts.iter().map(|text| self.embed_text(text)).collect())
    }
}
