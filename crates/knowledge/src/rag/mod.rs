//! Retrieval-augmented answering strategies.
//!
//! Every strategy runs against one shared [`RagContext`] (retriever,
//! generator, prompts) and an explicit per-caller [`Session`].

pub mod context;
pub mod session;
pub mod strategies;
pub mod strategy;
pub mod types;

pub use context::RagContext;
pub use session::{ConversationTurn, Role, Session};
pub use strategy::{answer, strategy_for, Strategy};
pub use types::{
    is_unsupported, select_best, snippet, Candidate, RagAnswer, StrategyKind,
    INCONSISTENT_WARNING,
};
