//! Answer generation: retrieval, prompt assembly and one model call.

use crate::embeddings::EmbeddingProvider;
use crate::retrieval::retrieve;
use crate::types::Answer;
use orgdocs_core::{AppConfig, AppResult, Session};
use orgdocs_llm::{LlmClient, LlmRequest};
use orgdocs_prompt::{build_prompt, PromptTemplate};

/// Answer a question over the folders a session may read.
///
/// Empty retrieval is not an error; the model receives an empty context.
/// Model failures propagate without retry. The session history is passed to
/// the prompt but not updated here.
pub async fn answer(
    config: &AppConfig,
    embedder: &dyn EmbeddingProvider,
    llm: &dyn LlmClient,
    template: &PromptTemplate,
    session: &Session,
    question: &str,
) -> AppResult<Answer> {
    tracing::info!(
        "Answering for '{}' over {} folders",
        session.username(),
        session.folders().len()
    );

    let context = retrieve(config, embedder, question, session.folders()).await?;
    let chunk_texts: Vec<String> = context.iter().map(|r| r.chunk.text.clone()).collect();

    let prompt = build_prompt(
        template,
        session.folders(),
        &chunk_texts,
        session.history(),
        question,
    )?;

    let mut request = LlmRequest::new(prompt.user, config.llm.deployment.clone())
        .with_system(prompt.system)
        .with_temperature(config.llm.temperature);
    if let Some(max_tokens) = config.llm.max_tokens {
        request = request.with_max_tokens(max_tokens);
    }

    let response = llm.complete(&request).await?;

    tracing::debug!(
        "Model {} used {} tokens",
        response.model,
        response.usage.total_tokens
    );

    Ok(Answer {
        text: response.content,
        context,
    })
}
