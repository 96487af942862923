use crate::rag::context::{ensure_query, RagContext};
use crate::rag::session::Session;
use crate::rag::strategy::Strategy;
use crate::rag::types::{RagAnswer, StrategyKind};
use async_trait::async_trait;
use ragplay_core::AppResult;
use ragplay_prompt::templates::AGENTIC_ANSWER;
use tokio_util::sync::CancellationToken;

/// Single direct generation with no retrieval.
#[derive(Debug, Clone, Copy, Default)]
pub struct AgenticRag;

#[async_trait]
impl Strategy for AgenticRag {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Agentic
    }

    async fn answer(
        &self,
        ctx: &RagContext,
        _session: &mut Session,
        query: &str,
        cancel: &CancellationToken,
    ) -> AppResult<RagAnswer> {
        ensure_query(query)?;

        let prompt = ctx.render(AGENTIC_ANSWER, &[("query", query)])?;
        let answer = ctx.generate(&prompt, cancel).await?;

        Ok(RagAnswer::new(self.kind(), answer))
    }
}
