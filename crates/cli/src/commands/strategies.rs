//! Strategies command handler.

use clap::Args;
use ragplay_core::AppResult;
use ragplay_knowledge::StrategyKind;

/// List the available answering strategies
#[derive(Args, Debug)]
pub struct StrategiesCommand {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl StrategiesCommand {
    pub async fn execute(&self) -> AppResult<()> {
        if self.json {
            let output: Vec<_> = StrategyKind::ALL
                .iter()
                .map(|kind| {
                    serde_json::json!({
                        "name": kind.name(),
                        "title": kind.title(),
                        "description": kind.description(),
                    })
                })
                .collect();
            return super::print_json(&output);
        }

        println!("RAG strategies:\n");
        for kind in StrategyKind::ALL {
            println!("  {:<12} {}", kind.name(), kind.title());
            println!("  {:<12} {}", "", kind.description());
        }
        println!("\nUse `ragplay ask --strategy <name> <question>` to try one.");

        Ok(())
    }
}
