use crate::rag::context::{ensure_query, RagContext};
use crate::rag::session::Session;
use crate::rag::strategy::Strategy;
use crate::rag::types::{is_unsupported, RagAnswer, StrategyKind, INCONSISTENT_WARNING};
use crate::types::join_texts;
use async_trait::async_trait;
use ragplay_core::AppResult;
use ragplay_prompt::templates::CONSISTENCY;
use tokio_util::sync::CancellationToken;

/// Answer, then ask the model whether the context supports the answer.
///
/// An unsupported verdict only adds a warning; the answer is kept as is.
#[derive(Debug, Clone, Copy, Default)]
pub struct CorrectiveRag;

#[async_trait]
impl Strategy for CorrectiveRag {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Corrective
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

        let context_text = join_texts(&context, "\n");
        let check = ctx.render(
            CONSISTENCY,
            &[("context", context_text.as_str()), ("answer", answer.as_str())],
        )?;
        let verdict = ctx.generate(&check, cancel).await?;

        let mut result = RagAnswer::new(self.kind(), answer).with_context(context);
        if is_unsupported(&verdict) {
            tracing::warn!(verdict = %verdict.trim(), "Answer not supported by context");
            result.warning = Some(INCONSISTENT_WARNING.to_string());
        }
        result.verdict = Some(verdict.trim().to_string());

        Ok(result)
    }
}
