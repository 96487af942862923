//! Built-in strategy prompts.

use crate::types::PromptDefinition;

/// Stuffed-context answer prompt.
pub const ANSWER: &str = "rag.answer";
/// Post-hoc consistency question.
pub const CONSISTENCY: &str = "rag.consistency";
/// Consistency question asked before regenerating.
pub const SELF_EVALUATE: &str = "rag.self.evaluate";
/// Related search query expansion.
pub const FUSION_SUBQUERIES: &str = "rag.fusion.subqueries";
/// Retrieval-free answer.
pub const AGENTIC_ANSWER: &str = "rag.agentic.answer";
pub const SPECULATIVE_SHORT: &str = "rag.speculative.short";
pub const SPECULATIVE_ALTERNATIVE: &str = "rag.speculative.alternative";
pub const SPECULATIVE_GENERAL: &str = "rag.speculative.general";

/// Candidate prompts, in the order candidates are produced.
pub const SPECULATIVE_PROMPTS: [&str; 3] = [
    SPECULATIVE_SHORT,
    SPECULATIVE_ALTERNATIVE,
    SPECULATIVE_GENERAL,
];

/// All built-in prompt definitions.
pub fn builtin_definitions() -> Vec<PromptDefinition> {
    vec![
        PromptDefinition::builtin(
            ANSWER,
            "Answer from retrieved context",
            &["context", "question"],
            "Use the following pieces of context to answer the question at the end. \
             If you don't know the answer, just say that you don't know, \
             don't try to make up an answer.\n\n\
             {{context}}\n\n\
             Question: {{question}}\n\
             Helpful Answer:",
        ),
        PromptDefinition::builtin(
            CONSISTENCY,
            "Consistency check",
            &["context", "answer"],
            "Is this answer supported by the given context? Respond only 'Yes' or 'No'.\n\
             Context: {{context}}\n\
             Answer: {{answer}}",
        ),
        PromptDefinition::builtin(
            SELF_EVALUATE,
            "Self evaluation",
            &["context", "answer"],
            "Is the following answer supported by the provided context? Answer only 'Yes' or 'No'.\n\n\
             Context: {{context}}\n\
             Answer: {{answer}}",
        ),
        PromptDefinition::builtin(
            FUSION_SUBQUERIES,
            "Related search queries",
            &["query"],
            "Generate 3 related search queries for: {{query}}",
        ),
        PromptDefinition::builtin(
            AGENTIC_ANSWER,
            "Direct answer",
            &["query"],
            "Answer the following question: {{query}}",
        ),
        PromptDefinition::builtin(
            SPECULATIVE_SHORT,
            "Short answer candidate",
            &["query"],
            "Provide a short answer to: {{query}}",
        ),
        PromptDefinition::builtin(
            SPECULATIVE_ALTERNATIVE,
            "Alternative answer candidate",
            &["query"],
            "Another possible answer to: {{query}}",
        ),
        PromptDefinition::builtin(
            SPECULATIVE_GENERAL,
            "General knowledge candidate",
            &["query"],
            "Based on general knowledge, a concise answer to '{{query}}' could be:",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::validate_prompt;

    #[test]
    fn test_builtins_are_valid_and_unique() {
        let defs = builtin_definitions();
        let mut ids: Vec<_> = defs.iter().map(|d| d.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), defs.len());

        for def in &defs {
            validate_prompt(def).unwrap();
        }
    }

    #[test]
    fn test_answer_template_wording() {
        let defs = builtin_definitions();
        let answer = defs.iter().find(|d| d.id == ANSWER).unwrap();
        assert!(answer.template.starts_with("Use the following pieces of context"));
        assert!(answer.template.contains("don't know the answer, just say"));
        assert!(answer.template.ends_with("Question: {{question}}\nHelpful Answer:"));
    }
}
