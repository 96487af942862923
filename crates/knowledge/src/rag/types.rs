//! Strategy identifiers and answer types.

use crate::types::RetrievedChunk;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The six answering strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    Simple,
    Corrective,
    #[serde(rename = "self")]
    SelfRag,
    Fusion,
    Agentic,
    Speculative,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 6] = [
        Self::Simple,
        Self::Corrective,
        Self::SelfRag,
        Self::Fusion,
        Self::Agentic,
        Self::Speculative,
    ];

    /// Parse a strategy name, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "simple" => Some(Self::Simple),
            "corrective" | "crag" => Some(Self::Corrective),
            "self" | "self-rag" | "selfrag" => Some(Self::SelfRag),
            "fusion" => Some(Self::Fusion),
            "agentic" | "agent" => Some(Self::Agentic),
            "speculative" => Some(Self::Speculative),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Corrective => "corrective",
            Self::SelfRag => "self",
            Self::Fusion => "fusion",
            Self::Agentic => "agentic",
            Self::Speculative => "speculative",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Simple => "Simple RAG",
            Self::Corrective => "Corrective RAG",
            Self::SelfRag => "Self RAG",
            Self::Fusion => "Fusion RAG",
            Self::Agentic => "Agentic RAG",
            Self::Speculative => "Speculative RAG",
        }
    }

    /// One-line summary for listings.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Simple => "Retrieve context, stuff it into one prompt, answer once.",
            Self::Corrective => {
                "Answer, then ask whether the context supports it; flag unsupported answers."
            }
            Self::SelfRag => {
                "Chat session that regenerates once when the answer is judged unsupported."
            }
            Self::Fusion => {
                "Expand the question into related queries and return every chunk they retrieve."
            }
            Self::Agentic => "Answer directly without retrieval.",
            Self::Speculative => {
                "Draft three candidate answers and keep the one whose retrieved chunks mention the question most."
            }
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A generated answer and its support score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub text: String,
    /// Retrieved chunks containing the original query
    pub score: usize,
}

/// Index of the highest-scoring candidate; the first wins ties.
pub fn select_best(candidates: &[Candidate]) -> Option<usize> {
    candidates
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, usize)>, (i, c)| match best {
            Some((_, score)) if score >= c.score => best,
            _ => Some((i, c.score)),
        })
        .map(|(i, _)| i)
}

/// Whether a yes/no consistency reply says the answer is unsupported.
///
/// Any occurrence of "no" in the lower-cased, trimmed reply counts.
pub fn is_unsupported(verdict: &str) -> bool {
    verdict.trim().to_lowercase().contains("no")
}

/// Warning attached to answers the consistency check rejected.
pub const INCONSISTENT_WARNING: &str =
    "Initial answer might be inconsistent with the retrieved context.";

/// What a strategy produced for one query.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RagAnswer {
    pub strategy: StrategyKind,

    /// Final answer text
    pub answer: String,

    /// Chunks the answer was grounded on, in retrieval order
    pub context: Vec<RetrievedChunk>,

    /// Raw consistency verdict, for strategies that ask for one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verdict: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,

    /// Whether the answer was generated a second time
    pub regenerated: bool,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sub_queries: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub candidates: Vec<Candidate>,
}

impl RagAnswer {
    pub fn new(strategy: StrategyKind, answer: impl Into<String>) -> Self {
        Self {
            strategy,
            answer: answer.into(),
            context: Vec::new(),
            verdict: None,
            warning: None,
            regenerated: false,
            sub_queries: Vec::new(),
            candidates: Vec::new(),
        }
    }

    pub fn with_context(mut self, context: Vec<RetrievedChunk>) -> Self {
        self.context = context;
        self
    }
}

/// Shorten `text` to at most `max_chars` characters at a word boundary.
pub fn snippet(text: &str, max_chars: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max_chars {
        return flat;
    }

    let truncated: String = flat.chars().take(max_chars).collect();
    match truncated.rfind(' ') {
        Some(last_space) if last_space > 0 => format!("{}...", &truncated[..last_space]),
        _ => format!("{}...", truncated),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates(scores: &[usize]) -> Vec<Candidate> {
        scores
            .iter()
            .enumerate()
            .map(|(i, &score)| Candidate {
                text: format!("c{}", i),
                score,
            })
            .collect()
    }

    #[test]
    fn test_select_best_highest() {
        assert_eq!(select_best(&candidates(&[2, 0, 1])), Some(0));
        assert_eq!(select_best(&candidates(&[0, 0, 3])), Some(2));
    }

    #[test]
    fn test_select_best_first_of_ties() {
        assert_eq!(select_best(&candidates(&[1, 1, 0])), Some(0));
        assert_eq!(select_best(&candidates(&[0, 0, 0])), Some(0));
        assert_eq!(select_best(&[]), None);
    }

    #[test]
    fn test_is_unsupported() {
        assert!(is_unsupported("No"));
        assert!(is_unsupported("  NO.\n"));
        assert!(!is_unsupported("Yes"));
        assert!(!is_unsupported(" yes, it is supported "));
    }

    #[test]
    fn test_strategy_names_round_trip() {
        for kind in StrategyKind::ALL {
            assert_eq!(StrategyKind::parse(kind.name()), Some(kind));
            assert!(!kind.description().is_empty());
        }
        assert_eq!(StrategyKind::parse("Self-RAG"), Some(StrategyKind::SelfRag));
        assert_eq!(StrategyKind::parse("graph"), None);
    }

    #[test]
    fn test_answer_serialization_skips_empty() {
        let json = serde_json::to_value(RagAnswer::new(StrategyKind::SelfRag, "Paris")).unwrap();
        assert_eq!(json["strategy"], "self");
        assert_eq!(json["answer"], "Paris");
        assert!(json.get("subQueries").is_none());
        assert!(json.get("warning").is_none());
    }

    #[test]
    fn test_snippet() {
        assert_eq!(snippet("Short text", 100), "Short text");

        let long = "This is a very long text that needs to be truncated at some point";
        let result = snippet(long, 30);
        assert!(result.ends_with("..."));
        assert!(result.chars().count() <= 33);

        assert_eq!(snippet("ééééé", 3), "ééé...");
    }
}
