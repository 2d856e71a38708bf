//! Per-folder vector storage.
//!
//! Every folder has its own store under `<root>/vectorstore/<folder>`.
//! Stores are written only by the indexer and opened read-only at query
//! time, so a user can only ever search folders they were granted.

pub mod folder;
pub mod manifest;

pub use folder::FolderStore;
pub use manifest::StoreManifest;

use crate::types::Chunk;
use orgdocs_core::AppResult;

/// Trait for vector store backends.
#[async_trait::async_trait]
pub trait VectorStore: Send + Sync {
    /// Append chunks with their embeddings, pairwise in order.
    async fn add_chunks(&self, chunks: &[Chunk], embeddings: &[Vec<f32>]) -> AppResult<()>;

    /// Top-k chunks most similar to the query, by descending cosine similarity.
    ///
    /// An empty store yields an empty list.
    async fn search(&self, query_embedding: &[f32], top_k: usize) -> AppResult<Vec<(Chunk, f32)>>;

    /// Number of stored chunks.
    async fn count(&self) -> AppResult<u64>;
}

/// Cosine similarity between two vectors; 0.0 for mismatched or zero vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}
