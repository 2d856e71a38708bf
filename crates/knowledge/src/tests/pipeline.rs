//! End-to-end scenarios: index, log in, retrieve, answer.

use super::fixtures::{config_at, mock_embedder, write_pdf, EchoLlm};
use crate::answer::answer;
use crate::indexer::{build_all, build_index};
use crate::retrieval::retrieve;
use orgdocs_core::{resolve_access, Access, AppError, AppResult, Session};
use orgdocs_llm::{LlmClient, LlmRequest, LlmResponse};
use orgdocs_prompt::PromptTemplate;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;

const USERS: &str = "  Alice:\n    email: alice@x.com\n    folders: [OrgA]\n  Bob:\n    email: bob@x.com\n    folders: [OrgA, OrgB]\n";

#[derive(Default)]
struct CountingLlm {
    calls: AtomicUsize,
}

#[async_trait::async_trait]
impl LlmClient for CountingLlm {
    fn provider_name(&self) -> &str {
        "counting"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        EchoLlm.complete(request).await
    }
}

#[derive(Default)]
struct FailingLlm {
    calls: AtomicUsize,
}

#[async_trait::async_trait]
impl LlmClient for FailingLlm {
    fn provider_name(&self) -> &str {
        "failing"
    }

    async fn complete(&self, _request: &LlmRequest) -> AppResult<LlmResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(AppError::Llm("rate limited (429)".to_string()))
    }
}

fn numbered_pages(prefix: &str, n: usize) -> Vec<String> {
    (1..=n).map(|i| format!("{} note number {}", prefix, i)).collect()
}

#[tokio::test]
async fn test_answer_is_grounded_on_indexed_sentence() {
    let temp = TempDir::new().unwrap();
    let config = config_at(temp.path(), USERS);
    write_pdf(
        &config.documents_dir("OrgA").join("earnings.pdf"),
        &["Revenue grew 10% in Q1"],
    );
    let embedder = mock_embedder();
    build_index(&config, embedder.as_ref(), "OrgA").await.unwrap();

    let session = Session::login(&config, "alice", "alice@x.com").unwrap();
    assert_eq!(session.folders(), ["OrgA".to_string()]);

    let result = answer(
        &config,
        embedder.as_ref(),
        &EchoLlm,
        &PromptTemplate::builtin(),
        &session,
        "What was revenue growth?",
    )
    .await
    .unwrap();

    assert_eq!(result.context.len(), 1);
    assert!(result.context[0].chunk.text.contains("Revenue grew 10% in Q1"));
    assert_eq!(result.context[0].folder, "OrgA");
    assert!(result.text.contains("Revenue grew 10% in Q1"));
    assert!(result.text.contains("['OrgA']"));
    assert!(result.text.contains("Question: What was revenue growth?"));
}

#[tokio::test]
async fn test_wrong_email_issues_no_query() {
    let temp = TempDir::new().unwrap();
    let config = config_at(temp.path(), USERS);
    let llm = CountingLlm::default();

    assert_eq!(
        resolve_access(&config, "Alice", "alice@y.com"),
        Access::NotFound
    );

    if let Some(session) = Session::login(&config, "Alice", "alice@y.com") {
        let embedder = mock_embedder();
        answer(
            &config,
            embedder.as_ref(),
            &llm,
            &PromptTemplate::builtin(),
            &session,
            "What was revenue growth?",
        )
        .await
        .unwrap();
    }

    assert_eq!(llm.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_empty_folder_retrieves_nothing() {
    let temp = TempDir::new().unwrap();
    let config = config_at(temp.path(), USERS);
    std::fs::create_dir_all(config.documents_dir("OrgB")).unwrap();
    let embedder = mock_embedder();

    let stats = build_index(&config, embedder.as_ref(), "OrgB").await.unwrap();
    assert_eq!(stats.chunks, 0);

    let hits = retrieve(&config, embedder.as_ref(), "anything", &["OrgB".to_string()])
        .await
        .unwrap();
    assert!(hits.is_empty());
}

#[tokio::test]
async fn test_each_folder_contributes_its_own_top_k() {
    let temp = TempDir::new().unwrap();
    let config = config_at(temp.path(), USERS);
    let a_pages = numbered_pages("OrgA revenue", 12);
    let b_pages = numbered_pages("OrgB revenue", 12);
    write_pdf(
        &config.documents_dir("OrgA").join("a.pdf"),
        &a_pages.iter().map(String::as_str).collect::<Vec<_>>(),
    );
    write_pdf(
        &config.documents_dir("OrgB").join("b.pdf"),
        &b_pages.iter().map(String::as_str).collect::<Vec<_>>(),
    );
    let embedder = mock_embedder();
    build_all(&config, embedder.as_ref()).await.unwrap();

    let folders = vec!["OrgA".to_string(), "OrgB".to_string()];
    let hits = retrieve(&config, embedder.as_ref(), "revenue", &folders)
        .await
        .unwrap();

    assert_eq!(hits.len(), 20);
    assert!(hits[..10].iter().all(|h| h.folder == "OrgA"));
    assert!(hits[10..].iter().all(|h| h.folder == "OrgB"));
    for window in hits[..10].windows(2) {
        assert!(window[0].score >= window[1].score);
    }
}

#[tokio::test]
async fn test_empty_folder_leaves_only_the_other() {
    let temp = TempDir::new().unwrap();
    let config = config_at(temp.path(), USERS);
    write_pdf(
        &config.documents_dir("OrgA").join("a.pdf"),
        &["Revenue grew 10% in Q1", "Costs fell 3%"],
    );
    let embedder = mock_embedder();
    build_all(&config, embedder.as_ref()).await.unwrap();

    let folders = vec!["OrgA".to_string(), "OrgB".to_string()];
    let hits = retrieve(&config, embedder.as_ref(), "revenue", &folders)
        .await
        .unwrap();

    assert_eq!(hits.len(), 2);
    assert!(hits.iter().all(|h| h.folder == "OrgA"));
}

#[tokio::test]
async fn test_unindexed_folder_is_an_error() {
    let temp = TempDir::new().unwrap();
    let config = config_at(temp.path(), USERS);
    let embedder = mock_embedder();

    let result = retrieve(&config, embedder.as_ref(), "revenue", &["OrgA".to_string()]).await;
    assert!(matches!(result, Err(AppError::Index(_))));
}

#[tokio::test]
async fn test_chat_history_reaches_the_prompt() {
    let temp = TempDir::new().unwrap();
    let config = config_at(temp.path(), USERS);
    write_pdf(
        &config.documents_dir("OrgA").join("q1.pdf"),
        &["Revenue grew 10% in Q1"],
    );
    let embedder = mock_embedder();
    build_index(&config, embedder.as_ref(), "OrgA").await.unwrap();
    let template = PromptTemplate::builtin();

    let mut session = Session::login(&config, "Alice", "alice@x.com").unwrap();
    let first = answer(&config, embedder.as_ref(), &EchoLlm, &template, &session, "Revenue?")
        .await
        .unwrap();
    session.record_turn("Revenue?", "It grew");

    let second = answer(&config, embedder.as_ref(), &EchoLlm, &template, &session, "And costs?")
        .await
        .unwrap();

    assert!(first.text.contains("Chat History: []"));
    assert!(second.text.contains("Chat History: [('Revenue?', 'It grew')]"));
    session.logout();
}

#[tokio::test]
async fn test_llm_failure_fails_the_request_without_retry() {
    let temp = TempDir::new().unwrap();
    let config = config_at(temp.path(), USERS);
    write_pdf(
        &config.documents_dir("OrgA").join("q1.pdf"),
        &["Revenue grew 10% in Q1"],
    );
    let embedder = mock_embedder();
    build_index(&config, embedder.as_ref(), "OrgA").await.unwrap();
    let llm = FailingLlm::default();

    let session = Session::login(&config, "Alice", "alice@x.com").unwrap();
    let result = answer(
        &config,
        embedder.as_ref(),
        &llm,
        &PromptTemplate::builtin(),
        &session,
        "What was revenue growth?",
    )
    .await;

    assert!(matches!(result, Err(AppError::Llm(_))));
    assert_eq!(llm.calls.load(Ordering::SeqCst), 1);
}
