//! Embedding provider trait and factory.

use crate::embeddings::providers::{MockProvider, OllamaProvider, TeiProvider};
use orgdocs_core::config::EmbeddingSettings;
use orgdocs_core::{AppError, AppResult};
use std::sync::Arc;

/// Trait for embedding providers.
#[async_trait::async_trait]
pub trait EmbeddingProvider: Send + Sync + std::fmt::Debug {
    /// Get provider name (e.g., "tei", "ollama", "mock")
    fn provider_name(&self) -> &str;

    /// Get model identifier
    fn model_name(&self) -> &str;

    /// Get embedding dimensions
    fn dimensions(&self) -> usize;

    /// Generate embeddings for multiple texts, one vector per text in order.
    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>>;

    /// Generate embedding for a single text (convenience method).
    async fn embed(&self, text: &str) -> AppResult<Vec<f32>> {
        let mut results = self.embed_batch(&[text.to_string()]).await?;
        results
            .pop()
            .ok_or_else(|| AppError::Embedding("No embedding returned".to_string()))
    }
}

/// Create an embedding provider from the `embedding` section and the
/// top-level `embed_model` / `device` keys.
///
/// # Errors
/// `AppError::Config` when the model is empty or the provider is unknown.
pub fn create_provider(
    settings: &EmbeddingSettings,
    embed_model: &str,
    device: &str,
) -> AppResult<Arc<dyn EmbeddingProvider>> {
    if embed_model.trim().is_empty() {
        return Err(AppError::Config(
            "embed_model is not configured".to_string(),
        ));
    }

    tracing::debug!(
        "Creating embedding provider: provider={}, model={}, dimensions={}, device={}",
        settings.provider,
        embed_model,
        settings.dimensions,
        device
    );

    match settings.provider.as_str() {
        "tei" => Ok(Arc::new(TeiProvider::new(settings, embed_model)?)),
        "ollama" => Ok(Arc::new(OllamaProvider::new(settings, embed_model)?)),
        "mock" => Ok(Arc::new(MockProvider::new(embed_model, settings.dimensions))),
        other => Err(AppError::Config(format!(
            "Unknown embedding provider: '{}'. Supported providers: tei, ollama, mock",
            other
        ))),
    }
}

/// Check that every vector has the expected length.
pub(crate) fn check_dimensions(vectors: &[Vec<f32>], expected: usize) -> AppResult<()> {
    match vectors.iter().find(|v| v.len() != expected) {
        Some(bad) => Err(AppError::Embedding(format!(
            "Unexpected embedding dimensions: got {}, expected {}",
            bad.len(),
            expected
        ))),
        None => Ok(()),
    }
}
