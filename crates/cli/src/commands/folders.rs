//! Folders command handler.

use clap::Args;
use orgdocs_core::{config::AppConfig, AppResult};

/// List folder names referenced in the configuration
#[derive(Args, Debug)]
pub struct FoldersCommand {
    /// Show every reference in file order, duplicates included
    #[arg(long)]
    pub raw: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl FoldersCommand {
    pub fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let names = if self.raw {
            config.folder_names()
        } else {
            config.indexable_folders()
        };
        tracing::debug!("Discovered {} folder names", names.len());

        if self.json {
            return super::print_json(&serde_json::json!({ "folders": names }));
        }

        for name in names {
            println!("{}", name);
        }
        Ok(())
    }
}
