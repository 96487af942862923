//! Command handlers for the ragplay CLI.

pub mod ask;
pub mod chat;
pub mod index;
pub mod strategies;

mod setup;

pub use ask::AskCommand;
pub use chat::ChatCommand;
pub use index::IndexCommand;
pub use strategies::StrategiesCommand;

use ragplay_core::{AppError, AppResult};
use ragplay_knowledge::rag::snippet;
use ragplay_knowledge::{RagAnswer, StrategyKind};

/// Parse a `--strategy` value.
pub(crate) fn parse_strategy(name: &str) -> AppResult<StrategyKind> {
    StrategyKind::parse(name).ok_or_else(|| {
        let known: Vec<&str> = StrategyKind::ALL.iter().map(|k| k.name()).collect();
        AppError::InvalidParameter(format!(
            "Unknown strategy: {}. Supported: {}",
            name,
            known.join(", ")
        ))
    })
}

pub(crate) fn print_json<T: serde::Serialize>(value: &T) -> AppResult<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| AppError::Serialization(e.to_string()))?;
    println!("{}", json);
    Ok(())
}

/// Human-readable rendering of one answer.
pub(crate) fn print_answer(answer: &RagAnswer) {
    if let Some(ref warning) = answer.warning {
        println!("Warning: {}", warning);
    }

    println!("{}", answer.answer);

    if !answer.sub_queries.is_empty() {
        println!("\nSub-queries:");
        for query in &answer.sub_queries {
            println!("  - {}", query);
        }
    }

    if !answer.candidates.is_empty() {
        println!("\nCandidates:");
        for (i, candidate) in answer.candidates.iter().enumerate() {
            println!(
                "  [{}] score {}: {}",
                i + 1,
                candidate.score,
                snippet(&candidate.text, 80)
            );
        }
    }

    if answer.regenerated {
        println!("\n(regenerated after an unsupported first answer)");
    }

    // Fusion's answer already is the retrieved text
    if answer.strategy != StrategyKind::Fusion && !answer.context.is_empty() {
        println!("\nContext:");
        for chunk in &answer.context {
            println!(
                "  [{}] ({:.3}) {}",
                chunk.chunk.position + 1,
                chunk.score,
                snippet(chunk.text(), 100)
            );
        }
    }
}
