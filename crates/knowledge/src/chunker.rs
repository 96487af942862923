//! Text chunking with configurable size and overlap.
//!
//! Sizes, strides and offsets are all measured in characters.

use crate::types::Chunk;
use ragplay_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use text_splitter::{ChunkConfig as SplitterConfig, TextSplitter};

/// How the corpus is cut into chunks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SplitterKind {
    /// Fixed sliding window
    #[default]
    Window,
    /// Paragraph, sentence and word boundaries via `text-splitter`
    Recursive,
}

impl SplitterKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "window" => Some(Self::Window),
            "recursive" => Some(Self::Recursive),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Window => "window",
            Self::Recursive => "recursive",
        }
    }
}

/// Chunking parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkConfig {
    pub chunk_size: usize,
    pub overlap: usize,
    pub splitter: SplitterKind,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            chunk_size: 500,
            overlap: 50,
            splitter: SplitterKind::Window,
        }
    }
}

impl ChunkConfig {
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        Self {
            chunk_size,
            overlap,
            splitter: SplitterKind::Window,
        }
    }

    pub fn with_splitter(mut self, splitter: SplitterKind) -> Self {
        self.splitter = splitter;
        self
    }

    /// Reject a zero size or an overlap that would stall the window.
    pub fn validate(&self) -> AppResult<()> {
        if self.chunk_size == 0 {
            return Err(AppError::InvalidParameter(
                "chunk size must be at least 1".to_string(),
            ));
        }
        if self.overlap >= self.chunk_size {
            return Err(AppError::InvalidParameter(format!(
                "chunk overlap ({}) must be smaller than chunk size ({})",
                self.overlap, self.chunk_size
            )));
        }
        Ok(())
    }

    /// Distance between consecutive window starts.
    pub fn stride(&self) -> usize {
        self.chunk_size - self.overlap
    }
}

/// Split `text` into chunks according to `config`.
///
/// Deterministic: the same text and parameters always yield the same
/// chunk sequence. Empty text yields no chunks.
pub fn chunk_text(text: &str, config: &ChunkConfig) -> AppResult<Vec<Chunk>> {
    config.validate()?;

    let chunks = match config.splitter {
        SplitterKind::Window => window_chunks(text, config),
        SplitterKind::Recursive => recursive_chunks(text, config)?,
    };

    tracing::debug!(
        "Chunked text into {} chunks (splitter: {}, size: {}, overlap: {})",
        chunks.len(),
        config.splitter.as_str(),
        config.chunk_size,
        config.overlap
    );

    Ok(chunks)
}

/// Sliding character window; the last window may be shorter.
fn window_chunks(text: &str, config: &ChunkConfig) -> Vec<Chunk> {
    // Byte offset of every character, so slicing never splits a code point.
    let boundaries: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
    let total = boundaries.len();

    let mut chunks = Vec::new();
    let mut start = 0;

    while start < total {
        let end = (start + config.chunk_size).min(total);
        let byte_start = boundaries[start];
        let byte_end = boundaries.get(end).copied().unwrap_or(text.len());

        chunks.push(Chunk::new(chunks.len(), &text[byte_start..byte_end], start));

        if end == total {
            break;
        }
        start += config.stride();
    }

    chunks
}

fn recursive_chunks(text: &str, config: &ChunkConfig) -> AppResult<Vec<Chunk>> {
    let splitter_config = SplitterConfig::new(config.chunk_size)
        .with_overlap(config.overlap)
        .map_err(|e| AppError::InvalidParameter(format!("Invalid chunk config: {}", e)))?;
    let splitter = TextSplitter::new(splitter_config);

    // Offsets come back in bytes; walk forward once to convert them.
    let mut chunks = Vec::new();
    let mut last_byte = 0;
    let mut last_char = 0;

    for (byte_offset, piece) in splitter.chunk_indices(text) {
        if piece.trim().is_empty() {
            continue;
        }

        let char_offset = if byte_offset >= last_byte {
            last_char + text[last_byte..byte_offset].chars().count()
        } else {
            text[..byte_offset].chars().count()
        };
        last_byte = byte_offset;
        last_char = char_offset;

        chunks.push(Chunk::new(chunks.len(), piece, char_offset));
    }

    Ok(chunks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_stride_and_short_tail() {
        let text = "a".repeat(1000);
        let chunks = chunk_text(&text, &ChunkConfig::new(500, 50)).unwrap();

        let offsets: Vec<usize> = chunks.iter().map(|c| c.source_offset).collect();
        assert_eq!(offsets, vec![0, 450, 900]);
        assert_eq!(chunks[0].char_len(), 500);
        assert_eq!(chunks[1].char_len(), 500);
        assert_eq!(chunks[2].char_len(), 100);
    }

    #[test]
    fn test_window_exact_fit_stops() {
        let text = "x".repeat(500);
        let chunks = chunk_text(&text, &ChunkConfig::new(500, 50)).unwrap();
        assert_eq!(chunks.len(), 1);
    }

    #[test]
    fn test_window_overlap_is_shared_text() {
        let text: String = ('a'..='z').cycle().take(120).collect();
        let chunks = chunk_text(&text, &ChunkConfig::new(50, 10)).unwrap();

        let tail: String = chunks[0].text.chars().skip(40).collect();
        let head: String = chunks[1].text.chars().take(10).collect();
        assert_eq!(tail, head);
    }

    #[test]
    fn test_window_no_overlap() {
        let text = "a".repeat(300);
        let chunks = chunk_text(&text, &ChunkConfig::new(100, 0)).unwrap();
        assert_eq!(chunks.len(), 3);
    }

    #[test]
    fn test_short_text_single_chunk() {
        let chunks =
            chunk_text("Paris is the capital of France.", &ChunkConfig::default()).unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "Paris is the capital of France.");
        assert_eq!(chunks[0].source_offset, 0);
    }

    #[test]
    fn test_empty_text() {
        assert!(chunk_text("", &ChunkConfig::default()).unwrap().is_empty());
    }

    #[test]
    fn test_multibyte_offsets_are_characters() {
        let text = "é".repeat(30);
        let chunks = chunk_text(&text, &ChunkConfig::new(10, 2)).unwrap();

        assert_eq!(chunks[1].source_offset, 8);
        assert!(chunks.iter().all(|c| c.char_len() <= 10));
    }

    #[test]
    fn test_deterministic() {
        let text = "Rust is fast. ".repeat(80);
        let config = ChunkConfig::new(64, 8);
        assert_eq!(
            chunk_text(&text, &config).unwrap(),
            chunk_text(&text, &config).unwrap()
        );
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(matches!(
            chunk_text("abc", &ChunkConfig::new(0, 0)),
            Err(AppError::InvalidParameter(_))
        ));
        assert!(matches!(
            chunk_text("abc", &ChunkConfig::new(10, 10)),
            Err(AppError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_recursive_respects_bound() {
        let text = "Paris is the capital of France. Berlin is the capital of Germany.\n\n"
            .repeat(20);
        let config = ChunkConfig::new(100, 10).with_splitter(SplitterKind::Recursive);
        let chunks = chunk_text(&text, &config).unwrap();

        assert!(chunks.len() > 1);
        assert!(chunks.iter().all(|c| c.char_len() <= 100));
        for chunk in &chunks {
            let from_offset: String = text
                .chars()
                .skip(chunk.source_offset)
                .take(chunk.char_len())
                .collect();
            assert_eq!(from_offset, chunk.text);
        }
    }

    #[test]
    fn test_splitter_kind_parse() {
        assert_eq!(SplitterKind::parse("Recursive"), Some(SplitterKind::Recursive));
        assert_eq!(SplitterKind::parse("token"), None);
    }
}
