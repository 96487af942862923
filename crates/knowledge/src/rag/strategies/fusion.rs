use crate::rag::context::{ensure_query, RagContext};
use crate::rag::session::Session;
use crate::rag::strategy::Strategy;
use crate::rag::types::{RagAnswer, StrategyKind};
use crate::types::join_texts;
use async_trait::async_trait;
use futures::future::try_join_all;
use ragplay_core::AppResult;
use ragplay_prompt::templates::FUSION_SUBQUERIES;
use tokio_util::sync::CancellationToken;

/// Expand the query into related queries and return every retrieved chunk.
///
/// Results are concatenated in sub-query order with no deduplication, so
/// the context holds at most `lines * top_k` chunks.
#[derive(Debug, Clone, Copy, Default)]
pub struct FusionRag;

/// Split a generated reply into sub-queries: one per non-blank line.
pub fn parse_sub_queries(reply: &str) -> Vec<String> {
    reply
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

#[async_trait]
impl Strategy for FusionRag {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Fusion
    }

    async fn answer(
        &self,
        ctx: &RagContext,
        _session: &mut Session,
        query: &str,
        cancel: &CancellationToken,
    ) -> AppResult<RagAnswer> {
        ensure_query(query)?;

        let prompt = ctx.render(FUSION_SUBQUERIES, &[("query", query)])?;
        let reply = ctx.generate(&prompt, cancel).await?;
        let sub_queries = parse_sub_queries(&reply);

        tracing::debug!(count = sub_queries.len(), "Expanded query");

        let per_query = try_join_all(sub_queries.iter().map(|q| ctx.retrieve(q))).await?;
        let context: Vec<_> = per_query.into_iter().flatten().collect();

        let mut result =
            RagAnswer::new(self.kind(), join_texts(&context, "\n\n")).with_context(context);
        result.sub_queries = sub_queries;
        Ok(result)
    }
}
