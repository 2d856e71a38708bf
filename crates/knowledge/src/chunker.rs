//! Page text chunking with character capacity and overlap.

use crate::types::Chunk;
use orgdocs_core::{AppError, AppResult};
use sha2::{Digest, Sha256};
use text_splitter::{ChunkConfig, TextSplitter};

/// Split extracted pages into overlapping chunks.
///
/// `chunk_size` and `overlap` are measured in characters. Pages are split
/// independently, so a chunk never spans a page boundary. Blank chunks are
/// dropped; positions count kept chunks within each page.
pub fn split_pages(
    source: &str,
    pages: &[String],
    chunk_size: usize,
    overlap: usize,
) -> AppResult<Vec<Chunk>> {
    let config = ChunkConfig::new(chunk_size)
        .with_overlap(overlap)
        .map_err(|e| AppError::Config(format!("Invalid chunking settings: {}", e)))?;
    let splitter = TextSplitter::new(config);

    let mut chunks = Vec::new();

    for (page_idx, page_text) in pages.iter().enumerate() {
        let page = page_idx as u32 + 1;
        let mut position = 0u32;

        for text in splitter.chunks(page_text) {
            if text.trim().is_empty() {
                continue;
            }

            chunks.push(Chunk {
                id: chunk_id(source, page, position, text),
                source: source.to_string(),
                page,
                position,
                text: text.to_string(),
            });
            position += 1;
        }
    }

    tracing::debug!(
        "Split {} pages of {} into {} chunks",
        pages.len(),
        source,
        chunks.len()
    );

    Ok(chunks)
}

/// Stable identifier for a chunk.
pub fn chunk_id(source: &str, page: u32, position: u32, text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(source.as_bytes());
    hasher.update([0u8]);
    hasher.update(page.to_le_bytes());
    hasher.update(position.to_le_bytes());
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}
