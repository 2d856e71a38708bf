//! Language model provider implementations.

pub mod azure;
pub mod ollama;

pub use azure::AzureOpenAiClient;
pub use ollama::OllamaClient;
