//! Embedding provider implementations.

pub mod mock;
pub mod ollama;
pub mod tei;

pub use mock::MockProvider;
pub use ollama::OllamaProvider;
pub use tei::TeiProvider;
