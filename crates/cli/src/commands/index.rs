//! Index command handler.

use clap::Args;
use ragplay_core::{AppConfig, AppResult};
use ragplay_knowledge::VectorIndex;
use std::time::Instant;

use super::setup::load_index;

/// Build the corpus index and report on it
#[derive(Args, Debug)]
pub struct IndexCommand {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl IndexCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing index command");

        let start = Instant::now();
        let (index, _) = load_index(config).await?;
        let info = index.info();
        let duration = start.elapsed();

        if self.json {
            let output = serde_json::json!({
                "corpus": config.resolved_corpus_path(),
                "info": info,
                "durationSecs": duration.as_secs_f64(),
            });
            return super::print_json(&output);
        }

        println!(
            "Indexed {} chunks from {} in {:.2}s",
            info.chunk_count,
            config.resolved_corpus_path().display(),
            duration.as_secs_f64()
        );
        println!("  digest:     {}", info.corpus_digest);
        println!(
            "  embedder:   {} / {} ({} dims)",
            info.embedding_provider, info.embedding_model, info.dimensions
        );
        println!(
            "  chunking:   {} chars, {} overlap, {} splitter",
            info.chunking.chunk_size,
            info.chunking.overlap,
            info.chunking.splitter.as_str()
        );

        Ok(())
    }
}
