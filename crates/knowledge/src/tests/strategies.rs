//! End-to-end strategy scenarios over a small indexed corpus.

use crate::embeddings::{EmbeddingProvider, TrigramProvider};
use crate::rag::{answer, strategy_for, RagContext, Role, Session, StrategyKind};
use crate::retriever::Retriever;
use crate::store::corpus_digest;
use crate::types::{Chunk, EmbeddedChunk};
use crate::vector_index::{InMemoryIndex, IndexInfo};
use crate::chunker::ChunkConfig;
use chrono::Utc;
use ragplay_core::AppError;
use ragplay_llm::{Generator, ScriptedClient};
use ragplay_prompt::PromptLibrary;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

const FACTS: [&str; 3] = [
    "Paris is the capital of France.",
    "Berlin is the capital of Germany.",
    "Tokyo is the capital of Japan.",
];

/// One chunk per passage, embedded with the trigram provider.
async fn index_of(passages: &[&str], embedder: &TrigramProvider) -> InMemoryIndex {
    let mut entries = Vec::new();
    for (position, text) in passages.iter().enumerate() {
        entries.push(EmbeddedChunk {
            chunk: Chunk::new(position, *text, 0),
            vector: embedder.embed(text).await.unwrap(),
        });
    }

    let info = IndexInfo {
        corpus_digest: corpus_digest(&passages.join("\n")),
        chunking: ChunkConfig::default(),
        embedding_provider: embedder.provider_name().to_string(),
        embedding_model: embedder.model_name().to_string(),
        dimensions: embedder.dimensions(),
        chunk_count: entries.len(),
        built_at: Utc::now(),
    };
    InMemoryIndex::new(entries, info).unwrap()
}

async fn context_with(
    passages: &[&str],
    client: Arc<ScriptedClient>,
    top_k: usize,
) -> RagContext {
    let embedder = Arc::new(TrigramProvider::new(384));
    let index = index_of(passages, &embedder).await;
    let retriever = Retriever::new(Arc::new(index), embedder);
    let generator = Generator::new(client, "test-model", 0.7);
    let prompts = Arc::new(PromptLibrary::builtin().unwrap());
    RagContext::new(retriever, generator, prompts, top_k).unwrap()
}

fn scripted(replies: &[&str]) -> Arc<ScriptedClient> {
    Arc::new(ScriptedClient::new(replies.iter().copied()))
}

#[tokio::test]
async fn test_simple_answers_from_single_passage() {
    let client = scripted(&["Paris"]);
    let ctx = context_with(&["Paris is the capital of France."], client.clone(), 1).await;
    let mut session = Session::new(StrategyKind::Simple);

    let result = answer(
        &ctx,
        &mut session,
        "What is the capital of France?",
        &CancellationToken::new(),
    )
    .await
    .unwrap();

    assert_eq!(result.answer, "Paris");
    assert_eq!(result.context.len(), 1);
    assert_eq!(result.context[0].text(), "Paris is the capital of France.");

    let prompts = client.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("Paris is the capital of France."));
    assert!(prompts[0].contains("Question: What is the capital of France?"));
}

#[tokio::test]
async fn test_corrective_flags_unsupported_answer() {
    let client = scripted(&["Lyon", "No"]);
    let ctx = context_with(&FACTS, client.clone(), 2).await;
    let mut session = Session::new(StrategyKind::Corrective);

    let result = answer(&ctx, &mut session, "capital of France", &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(result.answer, "Lyon");
    assert!(result.warning.is_some());
    assert_eq!(result.verdict.as_deref(), Some("No"));
    assert!(!result.regenerated);
    assert_eq!(client.call_count(), 2);

    let check = &client.prompts()[1];
    let joined = result
        .context
        .iter()
        .map(|c| c.text())
        .collect::<Vec<_>>()
        .join("\n");
    assert!(check.contains(&joined));
    assert!(check.contains("Answer: Lyon"));
}

#[tokio::test]
async fn test_corrective_keeps_supported_answer_quiet() {
    let client = scripted(&["Paris", "Yes."]);
    let ctx = context_with(&FACTS, client.clone(), 2).await;
    let mut session = Session::new(StrategyKind::Corrective);

    let result = answer(&ctx, &mut session, "capital of France", &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(result.answer, "Paris");
    assert!(result.warning.is_none());
}

#[tokio::test]
async fn test_self_regenerates_once_on_no() {
    let client = scripted(&["first", "No", "second"]);
    let ctx = context_with(&FACTS, client.clone(), 2).await;
    let mut session = Session::new(StrategyKind::SelfRag);

    let result = answer(&ctx, &mut session, "capital of Japan", &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(result.answer, "second");
    assert!(result.regenerated);
    assert_eq!(client.call_count(), 3);

    let turns = session.turns();
    assert_eq!(turns.len(), 2);
    assert_eq!(turns[0].role, Role::User);
    assert_eq!(turns[0].content, "capital of Japan");
    assert_eq!(turns[1].role, Role::Assistant);
    assert_eq!(turns[1].content, "second");
}

#[tokio::test]
async fn test_self_keeps_supported_answer() {
    let client = scripted(&["first", "Yes"]);
    let ctx = context_with(&FACTS, client.clone(), 2).await;
    let mut session = Session::new(StrategyKind::SelfRag);

    let result = answer(&ctx, &mut session, "capital of Japan", &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(result.answer, "first");
    assert!(!result.regenerated);
    assert_eq!(client.call_count(), 2);
    assert_eq!(session.turns().len(), 2);
}

#[tokio::test]
async fn test_self_failure_leaves_history_untouched() {
    let client = Arc::new(ScriptedClient::new(["first"]).then_fail("provider down"));
    let ctx = context_with(&FACTS, client, 2).await;
    let mut session = Session::new(StrategyKind::SelfRag);

    let err = answer(&ctx, &mut session, "capital of Japan", &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Generation(_)));
    assert!(session.is_empty());
}

#[tokio::test]
async fn test_fusion_concatenates_sub_query_results() {
    let client = scripted(&["France capital\n\n  Germany capital  \nJapan capital\n"]);
    let ctx = context_with(&FACTS, client.clone(), 2).await;
    let mut session = Session::new(StrategyKind::Fusion);

    let result = answer(&ctx, &mut session, "capitals", &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(
        result.sub_queries,
        vec!["France capital", "Germany capital", "Japan capital"]
    );
    assert_eq!(result.context.len(), 6);
    assert_eq!(client.call_count(), 1);
    assert!(result.answer.contains("Berlin is the capital of Germany."));
}

#[tokio::test]
async fn test_fusion_over_empty_index() {
    let client = scripted(&["one\ntwo\nthree"]);
    let ctx = context_with(&[], client, 4).await;
    let mut session = Session::new(StrategyKind::Fusion);

    let result = answer(&ctx, &mut session, "anything", &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(result.sub_queries.len(), 3);
    assert!(result.context.is_empty());
    assert!(result.answer.is_empty());
}

#[tokio::test]
async fn test_agentic_skips_retrieval() {
    let client = scripted(&["Mount Everest"]);
    let ctx = context_with(&FACTS, client.clone(), 4).await;
    let mut session = Session::new(StrategyKind::Agentic);

    let result = answer(
        &ctx,
        &mut session,
        "What is the tallest mountain?",
        &CancellationToken::new(),
    )
    .await
    .unwrap();

    assert_eq!(result.answer, "Mount Everest");
    assert!(result.context.is_empty());
    assert_eq!(
        client.prompts(),
        vec!["Answer the following question: What is the tallest mountain?"]
    );
}

#[tokio::test]
async fn test_speculative_picks_best_supported_candidate() {
    let client = scripted(&[
        "Berlin is in Germany",
        "Paris is in France",
        "Tokyo is in Japan",
    ]);
    let ctx = context_with(&FACTS, client.clone(), 1).await;
    let mut session = Session::new(StrategyKind::Speculative);

    let result = answer(&ctx, &mut session, "Paris", &CancellationToken::new())
        .await
        .unwrap();

    let scores: Vec<usize> = result.candidates.iter().map(|c| c.score).collect();
    assert_eq!(scores, vec![0, 1, 0]);
    assert_eq!(result.answer, "Paris is in France");
    assert_eq!(result.context[0].text(), "Paris is the capital of France.");
    assert_eq!(client.call_count(), 3);
}

#[tokio::test]
async fn test_speculative_first_candidate_wins_ties() {
    let client = scripted(&["Tokyo is in Japan", "Berlin is in Germany", "Tokyo again"]);
    let ctx = context_with(&FACTS, client, 1).await;
    let mut session = Session::new(StrategyKind::Speculative);

    let result = answer(&ctx, &mut session, "Paris", &CancellationToken::new())
        .await
        .unwrap();

    assert!(result.candidates.iter().all(|c| c.score == 0));
    assert_eq!(result.answer, "Tokyo is in Japan");
}

#[tokio::test]
async fn test_blank_query_rejected_by_every_strategy() {
    for kind in StrategyKind::ALL {
        let client = scripted(&["unused"]);
        let ctx = context_with(&FACTS, client.clone(), 2).await;
        let mut session = Session::new(kind);

        let err = strategy_for(kind)
            .answer(&ctx, &mut session, "   ", &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::InvalidParameter(_)), "{}", kind);
        assert_eq!(client.call_count(), 0);
    }
}

#[tokio::test]
async fn test_generation_failure_propagates() {
    let client = Arc::new(ScriptedClient::default().then_fail("rate limited"));
    let ctx = context_with(&FACTS, client, 2).await;
    let mut session = Session::new(StrategyKind::Simple);

    let err = answer(&ctx, &mut session, "capital of France", &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Generation(msg) if msg.contains("rate limited")));
}

#[tokio::test]
async fn test_cancelled_request_makes_no_calls() {
    let client = scripted(&["Paris"]);
    let ctx = context_with(&FACTS, client.clone(), 2).await;
    let mut session = Session::new(StrategyKind::Simple);

    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = answer(&ctx, &mut session, "capital of France", &cancel)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Cancelled));
    assert_eq!(client.call_count(), 0);
}

#[tokio::test]
async fn test_zero_top_k_rejected() {
    let embedder = Arc::new(TrigramProvider::new(32));
    let index = index_of(&FACTS, &embedder).await;
    let retriever = Retriever::new(Arc::new(index), embedder);
    let generator = Generator::new(scripted(&[]), "m", 0.7);
    let prompts = Arc::new(PromptLibrary::builtin().unwrap());

    assert!(matches!(
        RagContext::new(retriever, generator, prompts, 0),
        Err(AppError::InvalidParameter(_))
    ));
}
