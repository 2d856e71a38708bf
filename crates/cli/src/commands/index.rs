//! Index command handler.
//!
//! Builds one vector store per folder from `<root>/documents/<folder>`.

use clap::Args;
use orgdocs_core::{config::AppConfig, AppResult};
use orgdocs_knowledge::{build_all, build_index, IndexStats};

/// Build folder vector stores from their PDFs
#[derive(Args, Debug)]
pub struct IndexCommand {
    /// Folder to index (repeatable; default: every configured folder)
    #[arg(short, long = "folder")]
    pub folders: Vec<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl IndexCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let embedder = super::embedder(config)?;

        let all: Vec<IndexStats> = if self.folders.is_empty() {
            build_all(config, embedder.as_ref()).await?
        } else {
            tracing::info!("Indexing {} folders", self.folders.len());
            let mut all = Vec::with_capacity(self.folders.len());
            for folder in &self.folders {
                all.push(build_index(config, embedder.as_ref(), folder).await?);
            }
            all
        };

        if !self.json {
            for stats in &all {
                println!(
                    "{}: {} documents ({} skipped), {} chunks in {:.2}s",
                    stats.folder, stats.documents, stats.skipped, stats.chunks, stats.duration_secs
                );
            }
        }

        if self.json {
            let output: Vec<serde_json::Value> = all
                .iter()
                .map(|s| {
                    serde_json::json!({
                        "folder": s.folder,
                        "documents": s.documents,
                        "skipped": s.skipped,
                        "chunks": s.chunks,
                        "durationSecs": s.duration_secs,
                    })
                })
                .collect();
            super::print_json(&serde_json::Value::Array(output))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::TempDir;

    fn config_at(root: &Path) -> AppConfig {
        let yaml = format!(
            "folder_path: '{}'\nembed_model: mock-minilm\nembedding:\n  provider: mock\n  dimensions: 16\nusers:\n  alice:\n    email: a@x.com\n    folders: [OrgA, OrgB]\n  bob:\n    email: b@x.com\n    folders: [OrgB]\n",
            root.display()
        );
        AppConfig::from_yaml_str(&yaml, &root.join("config.yaml")).unwrap()
    }

    #[tokio::test]
    async fn test_index_without_folders_builds_every_configured_folder() {
        let temp = TempDir::new().unwrap();
        let config = config_at(temp.path());
        let command = IndexCommand {
            folders: vec![],
            json: true,
        };

        command.execute(&config).await.unwrap();

        for folder in ["OrgA", "OrgB"] {
            assert!(config.vectorstore_dir(folder).join("manifest.json").exists());
        }
    }

    #[tokio::test]
    async fn test_index_named_folder_only() {
        let temp = TempDir::new().unwrap();
        let config = config_at(temp.path());
        let command = IndexCommand {
            folders: vec!["OrgB".to_string()],
            json: true,
        };

        command.execute(&config).await.unwrap();

        assert!(config.vectorstore_dir("OrgB").join("manifest.json").exists());
        assert!(!config.vectorstore_dir("OrgA").exists());
    }
}
