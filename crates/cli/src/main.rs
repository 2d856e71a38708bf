//! orgdocs CLI
//!
//! Question answering over per-organization PDF folders: index the folders,
//! log in with a configured username and email, and ask.

mod commands;

use clap::{Parser, Subcommand};
use commands::{
    AskCommand, ChatCommand, FoldersCommand, IndexCommand, LoginCommand, StatsCommand,
};
use orgdocs_core::{
    config::{AppConfig, DEFAULT_CONFIG_FILE},
    logging, AppResult,
};
use std::path::PathBuf;

/// orgdocs - ask questions over your organizations' documents
#[derive(Parser, Debug)]
#[command(name = "orgdocs")]
#[command(about = "Question answering over per-organization document folders", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, env = "ORGDOCS_CONFIG", default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Storage root holding documents/ and vectorstore/ (overrides folder_path)
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List folder names found in the configuration
    Folders(FoldersCommand),

    /// Build vector stores from folder documents
    Index(IndexCommand),

    /// Check credentials and list accessible folders
    Login(LoginCommand),

    /// Answer one question
    Ask(AskCommand),

    /// Interactive question session
    Chat(ChatCommand),

    /// Show vector store statistics for a folder
    Stats(StatsCommand),
}

#[tokio::main]
async fn main() -> AppResult<()> {
    // Parse command-line arguments first (needed for logging config)
    let cli = Cli::parse();

    let config = AppConfig::load(&cli.config)?.with_overrides(
        cli.root,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    );

    logging::init_logging(config.log_level.as_deref(), config.no_color)?;

    tracing::info!("orgdocs starting");
    tracing::debug!("Config file: {:?}", config.config_file);
    tracing::debug!("Storage root: {:?}", config.folder_path);

    let command_name = match &cli.command {
        Commands::Folders(_) => "folders",
        Commands::Index(_) => "index",
        Commands::Login(_) => "login",
        Commands::Ask(_) => "ask",
        Commands::Chat(_) => "chat",
        Commands::Stats(_) => "stats",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    let result = match cli.command {
        Commands::Folders(cmd) => cmd.execute(&config),
        Commands::Index(cmd) => cmd.execute(&config).await,
        Commands::Login(cmd) => cmd.execute(&config),
        Commands::Ask(cmd) => cmd.execute(&config).await,
        Commands::Chat(cmd) => cmd.execute(&config).await,
        Commands::Stats(cmd) => cmd.execute(&config).await,
    };

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}
