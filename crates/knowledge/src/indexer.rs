//! Offline indexing of folder documents into vector stores.

use crate::chunker::split_pages;
use crate::embeddings::EmbeddingProvider;
use crate::parser::{discover_pdfs, extract_pdf_pages};
use crate::store::{FolderStore, StoreManifest, VectorStore};
use crate::types::IndexStats;
use chrono::Utc;
use orgdocs_core::{AppConfig, AppResult};
use std::path::Path;
use std::time::Instant;

/// Build (or rebuild) the vector store of one folder.
///
/// The existing store is replaced. PDFs are read from
/// `<root>/documents/<folder>`; a missing or empty directory yields an empty
/// store. Unreadable PDFs are logged and counted as skipped. Embedding and
/// storage failures abort the build.
pub async fn build_index(
    config: &AppConfig,
    embedder: &dyn EmbeddingProvider,
    folder: &str,
) -> AppResult<IndexStats> {
    let start = Instant::now();
    let docs_dir = config.documents_dir(folder);
    let store_dir = config.vectorstore_dir(folder);

    tracing::info!(
        "Indexing folder '{}' from {:?} with {} ({}, device {})",
        folder,
        docs_dir,
        embedder.model_name(),
        embedder.provider_name(),
        config.device
    );

    let files = discover_pdfs(&docs_dir);
    let store = FolderStore::create(&store_dir, embedder.dimensions()).await?;

    let mut stats = IndexStats {
        folder: folder.to_string(),
        ..IndexStats::default()
    };

    for (i, path) in files.iter().enumerate() {
        tracing::debug!("[{}/{}] Processing {:?}", i + 1, files.len(), path);

        let pages = match extract_pdf_pages(path).await {
            Ok(pages) => pages,
            Err(e) => {
                tracing::warn!("Skipping {:?}: {}", path, e);
                stats.skipped += 1;
                continue;
            }
        };

        let source = source_name(&docs_dir, path);
        let chunks = split_pages(
            &source,
            &pages,
            config.chunking.chunk_size,
            config.chunking.chunk_overlap,
        )?;
        stats.documents += 1;

        if chunks.is_empty() {
            tracing::warn!("No text extracted from {:?}", path);
            continue;
        }

        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let embeddings = embedder.embed_batch(&texts).await?;
        store.add_chunks(&chunks, &embeddings).await?;

        stats.chunks += chunks.len() as u32;
    }

    let manifest = StoreManifest {
        folder: folder.to_string(),
        embed_model: embedder.model_name().to_string(),
        provider: embedder.provider_name().to_string(),
        device: config.device.clone(),
        dimensions: embedder.dimensions(),
        documents: stats.documents,
        chunks: stats.chunks,
        built_at: Utc::now(),
    };
    manifest.save(&store_dir)?;

    stats.duration_secs = start.elapsed().as_secs_f64();

    tracing::info!(
        "Indexed folder '{}': {} documents, {} skipped, {} chunks in {:.2}s",
        folder,
        stats.documents,
        stats.skipped,
        stats.chunks,
        stats.duration_secs
    );

    Ok(stats)
}

/// Build the stores of every folder named in the configuration, one at a time.
pub async fn build_all(
    config: &AppConfig,
    embedder: &dyn EmbeddingProvider,
) -> AppResult<Vec<IndexStats>> {
    let folders = config.indexable_folders();
    if folders.is_empty() {
        tracing::warn!("No folders found in {:?}", config.config_file);
    }

    let mut all = Vec::with_capacity(folders.len());
    for folder in &folders {
        all.push(build_index(config, embedder, folder).await?);
    }
    Ok(all)
}

/// Path of a document relative to its folder, with `/` separators.
fn source_name(docs_dir: &Path, path: &Path) -> String {
    path.strip_prefix(docs_dir)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}
