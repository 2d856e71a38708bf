//! HuggingFace text-embeddings-inference provider.
//!
//! TEI serves a single sentence-transformers model; the compute device is
//! chosen when the server is started, not per request.
//!
//! API: `POST {endpoint}/embed` with `{"inputs": [...]}`, returning one
//! vector per input.

use crate::embeddings::provider::{check_dimensions, EmbeddingProvider};
use orgdocs_core::config::EmbeddingSettings;
use orgdocs_core::{AppError, AppResult};
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, instrument};

const DEFAULT_TEI_URL: &str = "http://localhost:8080";
const EMBED_ENDPOINT: &str = "/embed";
const REQUEST_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
    inputs: &'a [String],
    normalize: bool,
    truncate: bool,
}

/// Text-embeddings-inference client.
#[derive(Debug, Clone)]
pub struct TeiProvider {
    client: Client,
    base_url: String,
    model: String,
    dimensions: usize,
    batch_size: usize,
}

impl TeiProvider {
    /// Create a provider from embedding settings.
    pub fn new(settings: &EmbeddingSettings, model: &str) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::Embedding(format!("Failed to create HTTP client: {}", e)))?;

        let base_url = settings
            .endpoint
            .clone()
            .unwrap_or_else(|| DEFAULT_TEI_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            client,
            base_url,
            model: model.to_string(),
            dimensions: settings.dimensions,
            batch_size: settings.batch_size.max(1),
        })
    }

    fn url(&self) -> String {
        format!("{}{}", self.base_url, EMBED_ENDPOINT)
    }

    #[instrument(skip(self, texts), fields(batch_size = texts.len()))]
    async fn embed_request(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        let request = EmbedRequest {
            inputs: texts,
            normalize: true,
            truncate: true,
        };

        let response = self
            .client
            .post(self.url())
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::Embedding(format!("Failed to send request to TEI: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Embedding(format!(
                "TEI API error ({}): {}",
                status, error_text
            )));
        }

        let vectors: Vec<Vec<f32>> = response
            .json()
            .await
            .map_err(|e| AppError::Embedding(format!("Failed to parse TEI response: {}", e)))?;

        if vectors.len() != texts.len() {
            return Err(AppError::Embedding(format!(
                "TEI returned {} embeddings for {} inputs",
                vectors.len(),
                texts.len()
            )));
        }
        check_dimensions(&vectors, self.dimensions)?;

        Ok(vectors)
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for TeiProvider {
    fn provider_name(&self) -> &str {
        "tei"
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let mut embeddings = Vec::with_capacity(texts.len());
        for batch in texts.chunks(self.batch_size) {
            embeddings.extend(self.embed_request(batch).await?);
        }

        debug!("Embedded {} texts with TEI model {}", texts.len(), self.model);
        Ok(embeddings)
    }
}
