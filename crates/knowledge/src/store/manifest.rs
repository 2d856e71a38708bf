//! Build metadata stored next to each folder's vectors.

use chrono::{DateTime, Utc};
use orgdocs_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name of the manifest inside a store directory.
pub const MANIFEST_FILE: &str = "manifest.json";

/// What built a folder store, and when.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreManifest {
    pub folder: String,
    pub embed_model: String,
    pub provider: String,
    pub device: String,
    pub dimensions: usize,

    /// PDFs that contributed chunks
    pub documents: u32,

    pub chunks: u32,
    pub built_at: DateTime<Utc>,
}

impl StoreManifest {
    pub fn path(dir: &Path) -> PathBuf {
        dir.join(MANIFEST_FILE)
    }

    /// Read the manifest of a store directory.
    pub fn load(dir: &Path) -> AppResult<Self> {
        let path = Self::path(dir);
        let contents = std::fs::read_to_string(&path).map_err(|e| {
            AppError::Index(format!("Failed to read store manifest {:?}: {}", path, e))
        })?;

        serde_json::from_str(&contents).map_err(|e| {
            AppError::Index(format!("Failed to parse store manifest {:?}: {}", path, e))
        })
    }

    /// Write the manifest into a store directory.
    pub fn save(&self, dir: &Path) -> AppResult<()> {
        let path = Self::path(dir);
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| {
            AppError::Index(format!("Failed to write store manifest {:?}: {}", path, e))
        })?;

        tracing::debug!("Saved store manifest to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn manifest() -> StoreManifest {
        StoreManifest {
            folder: "OrgA".to_string(),
            embed_model: "all-MiniLM-L6-v2".to_string(),
            provider: "tei".to_string(),
            device: "cpu".to_string(),
            dimensions: 384,
            documents: 2,
            chunks: 17,
            built_at: Utc::now(),
        }
    }

    #[test]
    fn test_save_and_load() {
        let temp = TempDir::new().unwrap();
        let original = manifest();
        original.save(temp.path()).unwrap();

        assert!(temp.path().join(MANIFEST_FILE).exists());
        assert_eq!(StoreManifest::load(temp.path()).unwrap(), original);
    }

    #[test]
    fn test_missing_manifest_is_index_error() {
        let temp = TempDir::new().unwrap();
        assert!(matches!(
            StoreManifest::load(temp.path()),
            Err(AppError::Index(_))
        ));
    }
}
