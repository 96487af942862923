use crate::rag::context::{ensure_query, RagContext};
use crate::rag::session::Session;
use crate::rag::strategy::Strategy;
use crate::rag::types::{select_best, Candidate, RagAnswer, StrategyKind};
use crate::types::RetrievedChunk;
use async_trait::async_trait;
use futures::future::try_join_all;
use ragplay_core::{AppError, AppResult};
use ragplay_prompt::templates::SPECULATIVE_PROMPTS;
use tokio_util::sync::CancellationToken;

/// Draft several candidates and keep the best-supported one.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpeculativeRag;

/// Number of retrieved chunks that contain `query`, ignoring case.
pub fn support_score(query: &str, chunks: &[RetrievedChunk]) -> usize {
    let needle = query.to_lowercase();
    chunks
        .iter()
        .filter(|c| c.text().to_lowercase().contains(&needle))
        .count()
}

#[async_trait]
impl Strategy for SpeculativeRag {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Speculative
    }

    async fn answer(
        &self,
        ctx: &RagContext,
        _session: &mut Session,
        query: &str,
        cancel: &CancellationToken,
    ) -> AppResult<RagAnswer> {
        ensure_query(query)?;

        let prompts = SPECULATIVE_PROMPTS
            .iter()
            .map(|id| ctx.render(id, &[("query", query)]))
            .collect::<AppResult<Vec<_>>>()?;

        let drafts = try_join_all(prompts.iter().map(|p| ctx.generate(p, cancel))).await?;
        let retrieved = try_join_all(drafts.iter().map(|d| ctx.retrieve(d))).await?;

        let candidates: Vec<Candidate> = drafts
            .into_iter()
            .zip(&retrieved)
            .map(|(text, chunks)| Candidate {
                score: support_score(query, chunks),
                text,
            })
            .collect();

        let best = select_best(&candidates)
            .ok_or_else(|| AppError::Generation("no candidate answers produced".to_string()))?;

        tracing::debug!(
            best,
            scores = ?candidates.iter().map(|c| c.score).collect::<Vec<_>>(),
            "Selected candidate"
        );

        let context = retrieved.into_iter().nth(best).unwrap_or_default();
        let mut result =
            RagAnswer::new(self.kind(), candidates[best].text.clone()).with_context(context);
        result.candidates = candidates;
        Ok(result)
    }
}
