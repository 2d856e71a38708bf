//! Command handlers for the orgdocs CLI.

pub mod ask;
pub mod chat;
pub mod folders;
pub mod index;
pub mod login;
pub mod stats;

pub use ask::AskCommand;
pub use chat::ChatCommand;
pub use folders::FoldersCommand;
pub use index::IndexCommand;
pub use login::LoginCommand;
pub use stats::StatsCommand;

use clap::Args;
use orgdocs_core::{config::AppConfig, AppResult};
use orgdocs_knowledge::{create_provider, EmbeddingProvider};
use std::sync::Arc;

/// Login credentials shared by commands that act for a user.
#[derive(Args, Debug, Clone)]
pub struct Credentials {
    /// Configured username (case-insensitive)
    #[arg(short, long)]
    pub username: String,

    /// Email registered for the user
    #[arg(short, long)]
    pub email: String,
}

/// Embedding provider configured for indexing and retrieval.
pub fn embedder(config: &AppConfig) -> AppResult<Arc<dyn EmbeddingProvider>> {
    let model = config.require_embed_model()?;
    create_provider(&config.embedding, model, &config.device)
}

/// Pretty-print a JSON value to stdout.
pub fn print_json(value: &serde_json::Value) -> AppResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
