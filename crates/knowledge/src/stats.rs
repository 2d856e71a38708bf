//! Folder store statistics.

use crate::store::{FolderStore, VectorStore};
use crate::types::FolderStats;
use orgdocs_core::{AppConfig, AppError, AppResult};
use walkdir::WalkDir;

/// Summarize a folder's store from its manifest and row count.
pub async fn folder_stats(config: &AppConfig, folder: &str) -> AppResult<FolderStats> {
    let dir = config.vectorstore_dir(folder);
    let store = FolderStore::open(&dir).await?;
    let manifest = store
        .manifest()
        .cloned()
        .ok_or_else(|| AppError::Index(format!("Store {:?} has no manifest", dir)))?;
    let chunks = store.count().await?;

    let size_bytes = WalkDir::new(&dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter_map(|e| e.metadata().ok())
        .filter(|m| m.is_file())
        .map(|m| m.len())
        .sum();

    Ok(FolderStats {
        folder: folder.to_string(),
        embed_model: manifest.embed_model,
        provider: manifest.provider,
        device: manifest.device,
        dimensions: manifest.dimensions,
        documents: manifest.documents,
        chunks,
        built_at: manifest.built_at.to_rfc3339(),
        size_bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indexer::build_index;
    use crate::tests::fixtures::{config_at, mock_embedder, write_pdf};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_folder_stats_after_build() {
        let temp = TempDir::new().unwrap();
        let config = config_at(temp.path(), "  alice:\n    email: a@x.com\n    folders: [OrgA]\n");
        write_pdf(
            &config.documents_dir("OrgA").join("q1.pdf"),
            &["Revenue grew 10% in Q1", "Costs fell"],
        );
        build_index(&config, mock_embedder().as_ref(), "OrgA")
            .await
            .unwrap();

        let stats = folder_stats(&config, "OrgA").await.unwrap();
        assert_eq!(stats.folder, "OrgA");
        assert_eq!(stats.documents, 1);
        assert_eq!(stats.chunks, 2);
        assert_eq!(stats.dimensions, 64);
        assert_eq!(stats.provider, "mock");
        assert!(stats.size_bytes > 0);
    }

    #[tokio::test]
    async fn test_stats_for_unindexed_folder() {
        let temp = TempDir::new().unwrap();
        let config = config_at(temp.path(), "  alice:\n    email: a@x.com\n    folders: [OrgA]\n");

        assert!(matches!(
            folder_stats(&config, "OrgA").await,
            Err(AppError::Index(_))
        ));
    }
}
