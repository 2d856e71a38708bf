//! Language model integration for orgdocs.
//!
//! A provider-agnostic [`LlmClient`] trait with Azure OpenAI and Ollama
//! implementations. The answer step sends one system instruction and one
//! user turn per question.
//!
//! # Example
//! ```no_run
//! use orgdocs_llm::{LlmClient, LlmRequest, providers::OllamaClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = OllamaClient::new();
//! let request = LlmRequest::new("Question: what changed in Q1?", "llama3")
//!     .with_system("Answer from the notes only.");
//! let response = client.complete(&request).await?;
//! println!("{}", response.content);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod factory;
pub mod providers;
pub mod types;

pub use client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
pub use factory::create_client;
pub use providers::{AzureOpenAiClient, OllamaClient};
pub use types::ProviderType;
