//! Scripted provider that replays canned completions.
//!
//! Used by tests and for offline runs. Responses are served in order;
//! once the script is exhausted the fallback reply is returned.

use crate::client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
use ragplay_core::{AppError, AppResult};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Reply used when no script remains and no fallback was set.
pub const DEFAULT_SCRIPTED_REPLY: &str = "I don't know.";

enum Step {
    Reply(String),
    Fail(String),
}

/// LLM client returning pre-recorded responses.
pub struct ScriptedClient {
    script: Mutex<VecDeque<Step>>,
    fallback: String,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedClient {
    /// Client replaying `responses` in order.
    pub fn new<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            script: Mutex::new(responses.into_iter().map(|r| Step::Reply(r.into())).collect()),
            fallback: DEFAULT_SCRIPTED_REPLY.to_string(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Client that answers every prompt with `reply`.
    pub fn always(reply: impl Into<String>) -> Self {
        Self::new(Vec::<String>::new()).with_fallback(reply)
    }

    /// Reply used once the script is exhausted.
    pub fn with_fallback(mut self, reply: impl Into<String>) -> Self {
        self.fallback = reply.into();
        self
    }

    /// Queue a provider failure as the next step.
    pub fn then_fail(self, message: impl Into<String>) -> Self {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(Step::Fail(message.into()));
        }
        self
    }

    /// Prompts received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }

    /// Number of completions requested.
    pub fn call_count(&self) -> usize {
        self.prompts.lock().map(|p| p.len()).unwrap_or(0)
    }
}

impl Default for ScriptedClient {
    fn default() -> Self {
        Self::new(Vec::<String>::new())
    }
}

#[async_trait::async_trait]
impl LlmClient for ScriptedClient {
    fn provider_name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        self.prompts
            .lock()
            .map_err(|_| AppError::Generation("scripted prompt log poisoned".to_string()))?
            .push(request.prompt.clone());

        let step = self
            .script
            .lock()
            .map_err(|_| AppError::Generation("scripted queue poisoned".to_string()))?
            .pop_front();

        let content = match step {
            Some(Step::Reply(reply)) => reply,
            Some(Step::Fail(message)) => return Err(AppError::Generation(message)),
            None => self.fallback.clone(),
        };

        Ok(LlmResponse {
            usage: LlmUsage::new(request.prompt.len() as u32, content.len() as u32),
            content,
            model: request.model.clone(),
        })
    }
}
