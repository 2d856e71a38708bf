//! LLM provider factory.
//!
//! Resolves the configured provider and its secrets into a ready client.

use crate::client::LlmClient;
use crate::providers::{AzureOpenAiClient, OllamaClient};
use crate::types::ProviderType;
use orgdocs_core::config::LlmSettings;
use orgdocs_core::{AppError, AppResult};
use std::sync::Arc;

/// Create an LLM client from the `llm` configuration section.
///
/// # Errors
/// Returns `AppError::Config` if:
/// - the provider is unknown
/// - Azure is selected and the API key or endpoint cannot be resolved
pub fn create_client(settings: &LlmSettings) -> AppResult<Arc<dyn LlmClient>> {
    let provider = ProviderType::parse(&settings.provider).ok_or_else(|| {
        AppError::Config(format!("Unknown LLM provider: {}", settings.provider))
    })?;

    match provider {
        ProviderType::AzureOpenAi => {
            let api_key = settings.resolved_api_key().ok_or_else(|| {
                AppError::Config(format!(
                    "Azure OpenAI requires an API key in ${}",
                    settings.api_key_env
                ))
            })?;
            let endpoint = settings.resolved_endpoint().ok_or_else(|| {
                AppError::Config(format!(
                    "Azure OpenAI requires an endpoint in ${} or llm.endpoint",
                    settings.endpoint_env
                ))
            })?;
            let api_version = settings.resolved_api_version();

            tracing::debug!(
                "Using Azure OpenAI at {} (api-version {})",
                endpoint,
                api_version
            );
            Ok(Arc::new(AzureOpenAiClient::new(endpoint, api_key, api_version)))
        }
        ProviderType::Ollama => {
            let client = match &settings.endpoint {
                Some(url) => OllamaClient::with_base_url(url.as_str()),
                None => OllamaClient::new(),
            };
            Ok(Arc::new(client))
        }
    }
}
