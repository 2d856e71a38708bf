//! Embedding providers for indexing and retrieval.
//!
//! The same provider and model must be used to build a folder store and to
//! query it; the store manifest records which one built it.

pub mod provider;
pub mod providers;

pub use provider::{create_provider, EmbeddingProvider};
