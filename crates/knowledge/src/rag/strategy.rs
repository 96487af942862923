//! Strategy seam and dispatch.

use crate::rag::context::RagContext;
use crate::rag::session::Session;
use crate::rag::strategies::{
    AgenticRag, CorrectiveRag, FusionRag, SelfRag, SimpleRag, SpeculativeRag,
};
use crate::rag::types::{RagAnswer, StrategyKind};
use async_trait::async_trait;
use ragplay_core::AppResult;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

/// One question-answering strategy.
///
/// Implementations are stateless; anything that must outlive a call
/// lives in the [`Session`].
#[async_trait]
pub trait Strategy: Send + Sync {
    fn kind(&self) -> StrategyKind;

    /// Answer `query` using the shared context.
    ///
    /// # Errors
    /// - `InvalidParameter` for a blank query
    /// - `Embedding` or `Knowledge` if retrieval fails
    /// - `Generation` or `Cancelled` if a generation call fails
    async fn answer(
        &self,
        ctx: &RagContext,
        session: &mut Session,
        query: &str,
        cancel: &CancellationToken,
    ) -> AppResult<RagAnswer>;
}

pub fn strategy_for(kind: StrategyKind) -> Box<dyn Strategy> {
    match kind {
        StrategyKind::Simple => Box::new(SimpleRag),
        StrategyKind::Corrective => Box::new(CorrectiveRag),
        StrategyKind::SelfRag => Box::new(SelfRag),
        StrategyKind::Fusion => Box::new(FusionRag),
        StrategyKind::Agentic => Box::new(AgenticRag),
        StrategyKind::Speculative => Box::new(SpeculativeRag),
    }
}

/// Answer `query` with the session's strategy.
pub async fn answer(
    ctx: &RagContext,
    session: &mut Session,
    query: &str,
    cancel: &CancellationToken,
) -> AppResult<RagAnswer> {
    let kind = session.strategy;
    let span = tracing::info_span!(
        "rag_answer",
        strategy = %kind,
        session = %session.id,
        top_k = ctx.top_k()
    );

    async {
        let start = std::time::Instant::now();
        let result = strategy_for(kind).answer(ctx, session, query, cancel).await;

        match &result {
            Ok(answer) => tracing::info!(
                context_chunks = answer.context.len(),
                regenerated = answer.regenerated,
                elapsed_ms = start.elapsed().as_millis() as u64,
                "Answered query"
            ),
            Err(e) => tracing::warn!("Strategy failed: {}", e),
        }

        result
    }
    .instrument(span)
    .await
}
