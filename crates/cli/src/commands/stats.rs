//! Stats command handler.

use clap::Args;
use orgdocs_core::{config::AppConfig, AppResult};
use orgdocs_knowledge::folder_stats;

/// Show statistics for a folder's vector store
#[derive(Args, Debug)]
pub struct StatsCommand {
    /// Folder name
    pub folder: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl StatsCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let stats = folder_stats(config, &self.folder).await?;

        if self.json {
            return super::print_json(&serde_json::to_value(&stats)?);
        }

        println!("Folder:      {}", stats.folder);
        println!("Documents:   {}", stats.documents);
        println!("Chunks:      {}", stats.chunks);
        println!(
            "Embeddings:  {} via {} ({} dims, {})",
            stats.embed_model, stats.provider, stats.dimensions, stats.device
        );
        println!("Built at:    {}", stats.built_at);
        println!("Size:        {:.2} MB", stats.size_bytes as f64 / 1_048_576.0);
        Ok(())
    }
}
