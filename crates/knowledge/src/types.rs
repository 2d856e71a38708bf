//! Knowledge system type definitions.

use serde::{Deserialize, Serialize};

/// A fragment of one document page, the unit of embedding and retrieval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// Content hash of (source, page, position, text)
    pub id: String,

    /// Path of the source document
    pub source: String,

    /// 1-based page number
    pub page: u32,

    /// Position of the chunk within its page
    pub position: u32,

    /// Chunk text as extracted
    pub text: String,
}

/// A chunk returned by a folder search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievedChunk {
    /// Folder whose store produced the chunk
    pub folder: String,

    pub chunk: Chunk,

    /// Cosine similarity to the query (-1.0 to 1.0)
    pub score: f32,
}

/// Statistics from building one folder store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndexStats {
    pub folder: String,

    /// PDFs successfully extracted
    pub documents: u32,

    /// PDFs that could not be read
    pub skipped: u32,

    pub chunks: u32,

    pub duration_secs: f64,
}

/// Summary of a built folder store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderStats {
    pub folder: String,
    pub embed_model: String,
    pub provider: String,
    pub device: String,
    pub dimensions: usize,
    pub documents: u32,

    /// Rows currently in the store
    pub chunks: u64,

    /// RFC 3339 build timestamp
    pub built_at: String,

    /// On-disk size of the store directory
    pub size_bytes: u64,
}

/// A generated answer with the context it was grounded on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
    pub text: String,

    /// Retrieved chunks in folder order
    pub context: Vec<RetrievedChunk>,
}
