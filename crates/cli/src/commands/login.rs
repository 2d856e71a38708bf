//! Login command handler.

use super::Credentials;
use clap::Args;
use orgdocs_core::{config::AppConfig, resolve_access, Access, AppResult};

/// Check a username/email pair and list the folders it may query
#[derive(Args, Debug)]
pub struct LoginCommand {
    #[command(flatten)]
    pub credentials: Credentials,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl LoginCommand {
    pub fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let access = resolve_access(config, &self.credentials.username, &self.credentials.email);

        match (&access, self.json) {
            (Access::Granted(folders), true) => super::print_json(&serde_json::json!({
                "username": self.credentials.username,
                "folders": folders,
            })),
            (Access::Granted(folders), false) => {
                for folder in folders {
                    println!("{}", folder);
                }
                Ok(())
            }
            (Access::NotFound, true) => super::print_json(&serde_json::json!({
                "error": Access::NOT_FOUND_MESSAGE,
            })),
            (Access::NotFound, false) => {
                println!("{}", Access::NOT_FOUND_MESSAGE);
                Ok(())
            }
        }
    }
}
