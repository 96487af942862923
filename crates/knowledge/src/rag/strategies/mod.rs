mod agentic;
mod corrective;
mod fusion;
mod self_rag;
mod simple;
mod speculative;

pub use agentic::AgenticRag;
pub use corrective::CorrectiveRag;
pub use fusion::{parse_sub_queries, FusionRag};
pub use self_rag::SelfRag;
pub use simple::SimpleRag;
pub use speculative::{support_score, SpeculativeRag};
