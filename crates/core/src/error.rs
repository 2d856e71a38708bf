//! Error types for orgdocs.
//!
//! A single error enum covers every failure category in the workspace:
//! configuration, I/O, language model, embedding, vector index, prompt and
//! serialization errors.

use thiserror::Error;

/// Unified error type for orgdocs.
///
/// Library functions return `Result<T, AppError>` and never panic.
/// An unknown login is not an error; see [`crate::access::Access`].
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors (missing file, bad values)
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Language model provider errors
    #[error("LLM error: {0}")]
    Llm(String),

    /// Embedding provider errors
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// Vector store and indexing errors
    #[error("Index error: {0}")]
    Index(String),

    /// Prompt rendering errors
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;
