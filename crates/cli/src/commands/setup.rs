//! Builds the shared answering context from configuration.

use ragplay_core::{AppConfig, AppError, AppResult};
use ragplay_knowledge::embeddings::EmbeddingProvider;
use ragplay_knowledge::{
    build_index, create_provider, ChunkConfig, EmbeddingConfig, InMemoryIndex, RagContext,
    Retriever, SplitterKind,
};
use ragplay_llm::{create_client, Generator};
use ragplay_prompt::PromptLibrary;
use std::sync::Arc;
use std::time::Duration;

pub(crate) fn chunk_config(config: &AppConfig) -> AppResult<ChunkConfig> {
    let splitter = SplitterKind::parse(&config.splitter)
        .ok_or_else(|| AppError::Config(format!("Unknown splitter: {}", config.splitter)))?;
    Ok(ChunkConfig::new(config.chunk_size, config.chunk_overlap).with_splitter(splitter))
}

/// Embed and index the configured corpus.
pub(crate) async fn load_index(
    config: &AppConfig,
) -> AppResult<(InMemoryIndex, Arc<dyn EmbeddingProvider>)> {
    let embedding_config = EmbeddingConfig::from_app_config(config);
    let embedder = create_provider(&embedding_config).await?;

    let corpus = config.resolved_corpus_path();
    let index = build_index(&corpus, &chunk_config(config)?, embedder.as_ref()).await?;

    Ok((index, embedder))
}

/// Index the corpus and wire retriever, generator and prompts together.
pub(crate) async fn build_context(config: &AppConfig) -> AppResult<RagContext> {
    let (index, embedder) = load_index(config).await?;
    let retriever = Retriever::new(Arc::new(index), embedder);

    let endpoint = config.resolve_endpoint(&config.provider);
    let api_key = config.resolve_api_key(&config.provider);
    let timeout = config.request_timeout_secs.map(Duration::from_secs);

    let client = create_client(
        &config.provider,
        endpoint.as_deref(),
        api_key.as_deref(),
        timeout,
    )?;
    let generator = Generator::new(client, &config.model, config.temperature);

    tracing::debug!(
        provider = %config.provider,
        model = %config.model,
        "Generator ready"
    );

    let prompts = Arc::new(PromptLibrary::load(&config.workspace)?);

    RagContext::new(retriever, generator, prompts, config.top_k)
}
