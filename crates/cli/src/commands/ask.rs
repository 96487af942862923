//! Ask command handler.
//!
//! Runs a single question through one strategy.

use clap::Args;
use ragplay_core::{AppConfig, AppError, AppResult};
use ragplay_knowledge::{answer, Session};
use tokio_util::sync::CancellationToken;

use super::setup::build_context;

/// Ask one question with a chosen strategy
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to ask
    pub question: Vec<String>,

    /// Strategy (simple, corrective, self, fusion, agentic, speculative)
    #[arg(short, long, default_value = "simple")]
    pub strategy: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ask command");
        tracing::debug!("Ask command options: {:?}", self);

        let kind = super::parse_strategy(&self.strategy)?;
        let question = self.question.join(" ");
        if question.trim().is_empty() {
            return Err(AppError::InvalidParameter(
                "No question provided".to_string(),
            ));
        }

        let ctx = build_context(config).await?;
        let mut session = Session::new(kind);

        let cancel = CancellationToken::new();
        let watcher = {
            let cancel = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    cancel.cancel();
                }
            })
        };

        let result = answer(&ctx, &mut session, &question, &cancel).await;
        watcher.abort();
        let result = result?;

        if self.json {
            super::print_json(&result)
        } else {
            super::print_answer(&result);
            Ok(())
        }
    }
}
