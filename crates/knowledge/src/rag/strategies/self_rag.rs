use crate::rag::context::{ensure_query, RagContext};
use crate::rag::session::{Role, Session};
use crate::rag::strategy::Strategy;
use crate::rag::types::{is_unsupported, RagAnswer, StrategyKind};
use crate::types::join_texts;
use async_trait::async_trait;
use ragplay_core::AppResult;
use ragplay_prompt::templates::SELF_EVALUATE;
use tokio_util::sync::CancellationToken;

/// Conversational strategy that regenerates at most once.
///
/// The user turn is recorded only after the final answer exists, so a
/// failed call leaves the session untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct SelfRag;

#[async_trait]
impl Strategy for SelfRag {
    fn kind(&self) -> StrategyKind {
        StrategyKind::SelfRag
    }

    async fn answer(
        &self,
        ctx: &RagContext,
        session: &mut Session,
        query: &str,
        cancel: &CancellationToken,
    ) -> AppResult<RagAnswer> {
        ensure_query(query)?;

        let (first, context) = ctx.answer_from_context(query, cancel).await?;

        let context_text = join_texts(&context, "\n");
        let evaluation = ctx.render(
            SELF_EVALUATE,
            &[("context", context_text.as_str()), ("answer", first.as_str())],
        )?;
        let verdict = ctx.generate(&evaluation, cancel).await?;

        let (answer, context, regenerated) = if is_unsupported(&verdict) {
            tracing::info!(verdict = %verdict.trim(), "Regenerating unsupported answer");
            let (second, context) = ctx.answer_from_context(query, cancel).await?;
            (second, context, true)
        } else {
            (first, context, false)
        };

        session.push(Role::User, query);
        session.push(Role::Assistant, answer.clone());

        let mut result = RagAnswer::new(self.kind(), answer).with_context(context);
        result.verdict = Some(verdict.trim().to_string());
        result.regenerated = regenerated;
        Ok(result)
    }
}
