//! Document indexing and retrieval for orgdocs.
//!
//! Each folder of PDFs is indexed into its own LanceDB store. Queries are
//! answered by searching every folder a session may read, then asking the
//! language model with the retrieved passages as context.

pub mod answer;
pub mod chunker;
pub mod embeddings;
pub mod indexer;
pub mod parser;
pub mod retrieval;
pub mod stats;
pub mod store;
pub mod types;

#[cfg(test)]
mod tests;

pub use answer::answer;
pub use embeddings::{create_provider, EmbeddingProvider};
pub use indexer::{build_all, build_index};
pub use retrieval::retrieve;
pub use stats::folder_stats;
pub use store::{FolderStore, StoreManifest, VectorStore};
pub use types::{Answer, Chunk, FolderStats, IndexStats, RetrievedChunk};
