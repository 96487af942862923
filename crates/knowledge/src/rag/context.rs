//! Shared dependencies every strategy runs against.

use crate::retriever::Retriever;
use crate::types::{join_texts, RetrievalResult};
use ragplay_core::{AppError, AppResult};
use ragplay_llm::Generator;
use ragplay_prompt::templates::ANSWER;
use ragplay_prompt::PromptLibrary;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Built once at start and passed by reference into every request.
#[derive(Debug, Clone)]
pub struct RagContext {
    retriever: Retriever,
    generator: Generator,
    prompts: Arc<PromptLibrary>,
    top_k: usize,
}

impl RagContext {
    pub fn new(
        retriever: Retriever,
        generator: Generator,
        prompts: Arc<PromptLibrary>,
        top_k: usize,
    ) -> AppResult<Self> {
        if top_k == 0 {
            return Err(AppError::InvalidParameter(
                "top_k must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            retriever,
            generator,
            prompts,
            top_k,
        })
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    pub fn retriever(&self) -> &Retriever {
        &self.retriever
    }

    pub fn generator(&self) -> &Generator {
        &self.generator
    }

    pub fn prompts(&self) -> &PromptLibrary {
        &self.prompts
    }

    /// Retrieve `top_k` chunks for `query`.
    pub async fn retrieve(&self, query: &str) -> AppResult<RetrievalResult> {
        self.retriever.retrieve(query, self.top_k).await
    }

    pub fn render(&self, prompt_id: &str, vars: &[(&str, &str)]) -> AppResult<String> {
        self.prompts.render(prompt_id, vars)
    }

    /// Generate at the configured temperature.
    pub async fn generate(&self, prompt: &str, cancel: &CancellationToken) -> AppResult<String> {
        self.generator.generate_default(prompt, cancel).await
    }

    /// Retrieve, stuff the chunks into the answer prompt and generate once.
    pub async fn answer_from_context(
        &self,
        query: &str,
        cancel: &CancellationToken,
    ) -> AppResult<(String, RetrievalResult)> {
        let context = self.retrieve(query).await?;
        let context_text = join_texts(&context, "\n\n");

        let prompt = self.render(
            ANSWER,
            &[("context", context_text.as_str()), ("question", query)],
        )?;
        let answer = self.generate(&prompt, cancel).await?;

        Ok((answer, context))
    }
}

/// Reject blank queries before any collaborator is called.
pub(crate) fn ensure_query(query: &str) -> AppResult<()> {
    if query.trim().is_empty() {
        return Err(AppError::InvalidParameter(
            "query must not be empty".to_string(),
        ));
    }
    Ok(())
}
