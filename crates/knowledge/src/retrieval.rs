//! Query-time retrieval across a user's folders.

use crate::embeddings::EmbeddingProvider;
use crate::store::{FolderStore, VectorStore};
use crate::types::RetrievedChunk;
use orgdocs_core::{AppConfig, AppResult};

/// Retrieve context for a query from each folder's store.
///
/// The query is embedded once. Each folder contributes its own top-k
/// (`retrieval.top_k`) results, appended in folder order; there is no
/// re-ranking or deduplication across folders, so at most
/// `top_k * folders.len()` chunks come back. A folder without a store is an
/// error; a folder with an empty store contributes nothing.
pub async fn retrieve(
    config: &AppConfig,
    embedder: &dyn EmbeddingProvider,
    query: &str,
    folders: &[String],
) -> AppResult<Vec<RetrievedChunk>> {
    let top_k = config.retrieval.top_k;
    let query_embedding = embedder.embed(query).await?;

    let mut results = Vec::new();

    for folder in folders {
        let store = FolderStore::open(&config.vectorstore_dir(folder)).await?;

        if let Some(manifest) = store.manifest() {
            if manifest.embed_model != embedder.model_name() {
                tracing::warn!(
                    "Folder '{}' was indexed with '{}' but queried with '{}'",
                    folder,
                    manifest.embed_model,
                    embedder.model_name()
                );
            }
        }

        let hits = store.search(&query_embedding, top_k).await?;
        tracing::debug!("Folder '{}' contributed {} chunks", folder, hits.len());

        results.extend(hits.into_iter().map(|(chunk, score)| RetrievedChunk {
            folder: folder.clone(),
            chunk,
            score,
        }));
    }

    tracing::info!(
        "Retrieved {} chunks from {} folders",
        results.len(),
        folders.len()
    );

    Ok(results)
}
