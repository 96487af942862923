use crate::rag::context::{ensure_query, RagContext};
use crate::rag::session::Session;
use crate::rag::strategy::Strategy;
use crate::rag::types::{RagAnswer, StrategyKind};
use async_trait::async_trait;
use ragplay_core::AppResult;
use tokio_util::sync::CancellationToken;

/// Retrieve, stuff, answer once.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleRag;

#[async_trait]
impl Strategy for SimpleRag {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Simple
    }

    async fn answer(
        &self,
        ctx: &RagContext,
        _session: &mut Session,
        query: &str,
        cancel: &CancellationToken,
    ) -> AppResult<RagAnswer> {
        ensure_query(query)?;

        let (answer, context) = ctx.answer_from_context(query, cancel).await?;
        Ok(RagAnswer::new(self.kind(), answer).with_context(context))
    }
}
