//! LanceDB-backed folder store.

use crate::store::{cosine_similarity, StoreManifest, VectorStore};
use crate::types::Chunk;
use arrow_array::{
    Array, FixedSizeListArray, Float32Array, RecordBatch, RecordBatchIterator, StringArray,
    UInt32Array,
};
use arrow_schema::{DataType, Field, Schema};
use futures::TryStreamExt;
use lancedb::query::{ExecutableQuery, QueryBase};
use lancedb::{DistanceType, Table};
use orgdocs_core::{AppError, AppResult};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Table holding the chunks of one folder.
pub const TABLE_NAME: &str = "chunks";

/// Vector store for one folder.
pub struct FolderStore {
    dir: PathBuf,
    table: Table,
    dimensions: usize,
    manifest: Option<StoreManifest>,
}

impl FolderStore {
    /// Create an empty store at `dir`, replacing whatever was there.
    ///
    /// Rebuilding a folder always starts from scratch.
    pub async fn create(dir: &Path, dimensions: usize) -> AppResult<Self> {
        if dir.exists() {
            tracing::info!("Removing existing store at {:?}", dir);
            std::fs::remove_dir_all(dir).map_err(|e| {
                AppError::Index(format!("Failed to remove store {:?}: {}", dir, e))
            })?;
        }
        std::fs::create_dir_all(dir)
            .map_err(|e| AppError::Index(format!("Failed to create store directory: {}", e)))?;

        let conn = connect(dir).await?;

        let schema = Self::create_schema(dimensions);
        let empty_batch = RecordBatch::new_empty(schema.clone());

        let table = conn
            .create_table(
                TABLE_NAME,
                RecordBatchIterator::new(vec![Ok(empty_batch)], schema),
            )
            .execute()
            .await
            .map_err(|e| AppError::Index(format!("Failed to create table: {}", e)))?;

        tracing::debug!("Created LanceDB store at {:?}", dir);

        Ok(Self {
            dir: dir.to_path_buf(),
            table,
            dimensions,
            manifest: None,
        })
    }

    /// Open an existing store for querying.
    ///
    /// # Errors
    /// `AppError::Index` when the folder has not been indexed.
    pub async fn open(dir: &Path) -> AppResult<Self> {
        if !dir.is_dir() {
            return Err(AppError::Index(format!(
                "No vector store at {:?}. Run 'orgdocs index' first.",
                dir
            )));
        }

        let manifest = StoreManifest::load(dir)?;
        let conn = connect(dir).await?;

        let table_names = conn
            .table_names()
            .execute()
            .await
            .map_err(|e| AppError::Index(format!("Failed to list tables: {}", e)))?;

        if !table_names.iter().any(|name| name == TABLE_NAME) {
            return Err(AppError::Index(format!(
                "Store at {:?} has no '{}' table",
                dir, TABLE_NAME
            )));
        }

        let table = conn
            .open_table(TABLE_NAME)
            .execute()
            .await
            .map_err(|e| AppError::Index(format!("Failed to open table: {}", e)))?;

        Ok(Self {
            dir: dir.to_path_buf(),
            table,
            dimensions: manifest.dimensions,
            manifest: Some(manifest),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Build metadata; `None` for a store created in this process.
    pub fn manifest(&self) -> Option<&StoreManifest> {
        self.manifest.as_ref()
    }

    /// Arrow schema of the chunks table.
    fn create_schema(dimensions: usize) -> Arc<Schema> {
        Arc::new(Schema::new(vec![
            Field::new("id", DataType::Utf8, false),
            Field::new("source", DataType::Utf8, false),
            Field::new("page", DataType::UInt32, false),
            Field::new("position", DataType::UInt32, false),
            Field::new("text", DataType::Utf8, false),
            Field::new(
                "embedding",
                DataType::FixedSizeList(
                    Arc::new(Field::new("item", DataType::Float32, true)),
                    dimensions as i32,
                ),
                false,
            ),
        ]))
    }

    /// Convert chunks and their embeddings into one RecordBatch.
    fn chunks_to_batch(&self, chunks: &[Chunk], embeddings: &[Vec<f32>]) -> AppResult<RecordBatch> {
        if chunks.len() != embeddings.len() {
            return Err(AppError::Index(format!(
                "Got {} embeddings for {} chunks",
                embeddings.len(),
                chunks.len()
            )));
        }

        let mut flat = Vec::with_capacity(embeddings.len() * self.dimensions);
        for embedding in embeddings {
            if embedding.len() != self.dimensions {
                return Err(AppError::Embedding(format!(
                    "Embedding dimension mismatch: expected {}, got {}",
                    self.dimensions,
                    embedding.len()
                )));
            }
            flat.extend_from_slice(embedding);
        }

        let ids = StringArray::from_iter_values(chunks.iter().map(|c| c.id.as_str()));
        let sources = StringArray::from_iter_values(chunks.iter().map(|c| c.source.as_str()));
        let pages = UInt32Array::from_iter_values(chunks.iter().map(|c| c.page));
        let positions = UInt32Array::from_iter_values(chunks.iter().map(|c| c.position));
        let texts = StringArray::from_iter_values(chunks.iter().map(|c| c.text.as_str()));

        let embedding_array = FixedSizeListArray::try_new(
            Arc::new(Field::new("item", DataType::Float32, true)),
            self.dimensions as i32,
            Arc::new(Float32Array::from(flat)),
            None,
        )
        .map_err(|e| AppError::Index(format!("Failed to build embedding column: {}", e)))?;

        RecordBatch::try_new(
            Self::create_schema(self.dimensions),
            vec![
                Arc::new(ids),
                Arc::new(sources),
                Arc::new(pages),
                Arc::new(positions),
                Arc::new(texts),
                Arc::new(embedding_array),
            ],
        )
        .map_err(|e| AppError::Index(format!("Failed to create RecordBatch: {}", e)))
    }

    /// Convert one result row back into a chunk and its embedding.
    fn row_to_chunk(batch: &RecordBatch, row: usize) -> AppResult<(Chunk, Vec<f32>)> {
        let string_col = |name: &str| -> AppResult<String> {
            batch
                .column_by_name(name)
                .and_then(|c| c.as_any().downcast_ref::<StringArray>())
                .map(|c| c.value(row).to_string())
                .ok_or_else(|| AppError::Index(format!("Invalid {} column", name)))
        };
        let u32_col = |name: &str| -> AppResult<u32> {
            batch
                .column_by_name(name)
                .and_then(|c| c.as_any().downcast_ref::<UInt32Array>())
                .map(|c| c.value(row))
                .ok_or_else(|| AppError::Index(format!("Invalid {} column", name)))
        };

        let embedding_list = batch
            .column_by_name("embedding")
            .and_then(|c| c.as_any().downcast_ref::<FixedSizeListArray>())
            .ok_or_else(|| AppError::Index("Invalid embedding column".to_string()))?;
        let values = embedding_list.value(row);
        let values = values
            .as_any()
            .downcast_ref::<Float32Array>()
            .ok_or_else(|| AppError::Index("Invalid embedding values".to_string()))?;

        let chunk = Chunk {
            id: string_col("id")?,
            source: string_col("source")?,
            page: u32_col("page")?,
            position: u32_col("position")?,
            text: string_col("text")?,
        };

        Ok((chunk, values.values().to_vec()))
    }
}

async fn connect(dir: &Path) -> AppResult<lancedb::Connection> {
    let uri = dir.to_string_lossy().to_string();
    lancedb::connect(&uri)
        .execute()
        .await
        .map_err(|e| AppError::Index(format!("Failed to connect to LanceDB at {}: {}", uri, e)))
}

#[async_trait::async_trait]
impl VectorStore for FolderStore {
    async fn add_chunks(&self, chunks: &[Chunk], embeddings: &[Vec<f32>]) -> AppResult<()> {
        if chunks.is_empty() {
            return Ok(());
        }

        let batch = self.chunks_to_batch(chunks, embeddings)?;
        let schema = batch.schema();

        self.table
            .add(RecordBatchIterator::new(vec![Ok(batch)], schema))
            .execute()
            .await
            .map_err(|e| AppError::Index(format!("Failed to add chunks batch: {}", e)))?;

        tracing::debug!("Inserted {} chunks into {:?}", chunks.len(), self.dir);
        Ok(())
    }

    async fn search(&self, query_embedding: &[f32], top_k: usize) -> AppResult<Vec<(Chunk, f32)>> {
        if query_embedding.len() != self.dimensions {
            return Err(AppError::Embedding(format!(
                "Query embedding dimension mismatch: expected {}, got {}",
                self.dimensions,
                query_embedding.len()
            )));
        }

        if top_k == 0 || self.count().await? == 0 {
            return Ok(Vec::new());
        }

        let batches = self
            .table
            .query()
            .nearest_to(query_embedding.to_vec())
            .map_err(|e| AppError::Index(format!("Failed to create query: {}", e)))?
            .distance_type(DistanceType::Cosine)
            .limit(top_k)
            .execute()
            .await
            .map_err(|e| AppError::Index(format!("Failed to execute search: {}", e)))?
            .try_collect::<Vec<_>>()
            .await
            .map_err(|e| AppError::Index(format!("Failed to collect results: {}", e)))?;

        let mut results = Vec::new();
        for batch in &batches {
            for row in 0..batch.num_rows() {
                let (chunk, embedding) = Self::row_to_chunk(batch, row)?;
                let score = cosine_similarity(query_embedding, &embedding);
                results.push((chunk, score));
            }
        }

        results.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        results.truncate(top_k);

        tracing::debug!(
            "Search in {:?} returned {} chunks (requested top-{})",
            self.dir,
            results.len(),
            top_k
        );

        Ok(results)
    }

    async fn count(&self) -> AppResult<u64> {
        self.table
            .count_rows(None)
            .await
            .map(|n| n as u64)
            .map_err(|e| AppError::Index(format!("Failed to count rows: {}", e)))
    }
}
