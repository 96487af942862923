//! Chat command handler.
//!
//! Interactive loop holding one session. A failed request is reported and
//! the loop continues; Ctrl-C cancels the request in flight, or exits when
//! idle.

use clap::Args;
use ragplay_core::{AppConfig, AppResult};
use ragplay_knowledge::rag::Role;
use ragplay_knowledge::{answer, RagContext, Session, StrategyKind};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;

use super::setup::build_context;

/// Interactive session with one strategy
#[derive(Args, Debug)]
pub struct ChatCommand {
    /// Strategy (simple, corrective, self, fusion, agentic, speculative)
    #[arg(short, long, default_value = "self")]
    pub strategy: String,
}

impl ChatCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let kind = super::parse_strategy(&self.strategy)?;
        let ctx = build_context(config).await?;
        let mut session = Session::new(kind);

        tracing::info!(session = %session.id, strategy = %kind, "Chat session started");

        println!("{} (type 'exit' to quit)", kind.title());

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            print!("> ");
            std::io::stdout().flush()?;

            let line = tokio::select! {
                line = lines.next_line() => line?,
                _ = tokio::signal::ctrl_c() => {
                    println!();
                    None
                }
            };

            let Some(line) = line else { break };
            let query = line.trim();
            if query.is_empty() {
                continue;
            }
            if matches!(query, "exit" | "quit") {
                break;
            }

            turn(&ctx, &mut session, query).await;
        }

        tracing::info!(turns = session.turns().len(), "Chat session ended");
        Ok(())
    }
}

async fn turn(ctx: &RagContext, session: &mut Session, query: &str) {
    let cancel = CancellationToken::new();
    let watcher = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        })
    };

    let result = answer(ctx, session, query, &cancel).await;
    watcher.abort();

    match result {
        Ok(result) => {
            super::print_answer(&result);
            if session.strategy == StrategyKind::SelfRag {
                print_history(session);
            }
        }
        Err(e) if e.is_caller_error() => eprintln!("{}", e),
        Err(e) => {
            tracing::warn!("Request failed: {}", e);
            eprintln!("Error: {}", e);
        }
    }
    println!();
}

fn print_history(session: &Session) {
    println!("\nConversation:");
    for t in session.turns() {
        let who = match t.role {
            Role::User => "you",
            Role::Assistant => "assistant",
        };
        println!("  {:>9}: {}", who, t.content);
    }
}
