//! Azure OpenAI chat completions provider.
//!
//! Endpoint shape:
//! `POST {endpoint}/openai/deployments/{deployment}/chat/completions?api-version={version}`
//! authenticated with an `api-key` header.

use crate::client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
use orgdocs_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    model: Option<String>,
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

/// Azure OpenAI client bound to one resource endpoint.
pub struct AzureOpenAiClient {
    endpoint: String,
    api_key: String,
    api_version: String,
    client: reqwest::Client,
}

impl AzureOpenAiClient {
    /// Create a client for `endpoint` (e.g. `https://my-resource.openai.azure.com`).
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        api_version: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            api_version: api_version.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Completion URL for a deployment.
    fn completions_url(&self, deployment: &str) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.endpoint, deployment, self.api_version
        )
    }

    fn to_chat_request(&self, request: &LlmRequest) -> ChatRequest {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = &request.system {
            messages.push(ChatMessage {
                role: "system",
                content: system.clone(),
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: request.prompt.clone(),
        });

        ChatRequest {
            messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        }
    }

    fn convert_response(&self, request: &LlmRequest, response: ChatResponse) -> AppResult<LlmResponse> {
        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| AppError::Llm("Azure OpenAI returned no choices".to_string()))?;

        let usage = response
            .usage
            .map(|u| LlmUsage::new(u.prompt_tokens, u.completion_tokens))
            .unwrap_or_default();

        Ok(LlmResponse {
            content,
            model: response.model.unwrap_or_else(|| request.model.clone()),
            usage,
        })
    }
}

#[async_trait::async_trait]
impl LlmClient for AzureOpenAiClient {
    fn provider_name(&self) -> &str {
        "azure"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        tracing::info!("Sending chat completion to Azure deployment '{}'", request.model);

        let url = self.completions_url(&request.model);
        let body = self.to_chat_request(request);

        let response = self
            .client
            .post(&url)
            .header("api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Llm(format!("Failed to send request to Azure OpenAI: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Llm(format!(
                "Azure OpenAI API error ({}): {}",
                status, error_text
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| AppError::Llm(format!("Failed to parse Azure OpenAI response: {}", e)))?;

        let result = self.convert_response(request, parsed)?;

        tracing::info!(
            "Received completion from Azure ({} prompt / {} completion tokens)",
            result.usage.prompt_tokens,
            result.usage.completion_tokens
        );

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> AzureOpenAiClient {
        AzureOpenAiClient::new("https://acme.openai.azure.com/", "secret", "2024-02-01")
    }

    #[test]
    fn test_completions_url() {
        assert_eq!(
            client().completions_url("gpt-4o-mini"),
            "https://acme.openai.azure.com/openai/deployments/gpt-4o-mini/chat/completions?api-version=2024-02-01"
        );
    }

    #[test]
    fn test_system_and_user_messages() {
        let request = LlmRequest::new("Question: growth?", "gpt-4o-mini")
            .with_system("Use the context")
            .with_temperature(0.1);

        let body = serde_json::to_value(client().to_chat_request(&request)).unwrap();
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], "Use the context");
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][1]["content"], "Question: growth?");
        assert!(body.get("max_tokens").is_none());
    }

    #[test]
    fn test_response_conversion() {
        let request = LlmRequest::new("q", "gpt-4o-mini");
        let parsed: ChatResponse = serde_json::from_str(
            r#"{
                "model": "gpt-4o-mini-2024-07-18",
                "choices": [{"index": 0, "message": {"role": "assistant", "content": "Revenue grew 10% in Q1."}}],
                "usage": {"prompt_tokens": 50, "completion_tokens": 8, "total_tokens": 58}
            }"#,
        )
        .unwrap();

        let response = client().convert_response(&request, parsed).unwrap();
        assert_eq!(response.content, "Revenue grew 10% in Q1.");
        assert_eq!(response.model, "gpt-4o-mini-2024-07-18");
        assert_eq!(response.usage.total_tokens, 58);
    }

    #[test]
    fn test_empty_choices_is_error() {
        let request = LlmRequest::new("q", "gpt-4o-mini");
        let parsed: ChatResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert!(matches!(
            client().convert_response(&request, parsed),
            Err(AppError::Llm(_))
        ));
    }
}
