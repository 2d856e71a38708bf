//! Configuration management for orgdocs.
//!
//! Configuration comes from a single YAML file plus a few overrides:
//! - Config file (`--config`, `ORGDOCS_CONFIG`, or `./config.yaml`)
//! - Environment variables (`ORGDOCS_ROOT`, `RUST_LOG`, `NO_COLOR`)
//! - Command-line flags
//!
//! The file is parsed twice: into the typed schema below, and into a
//! [`ConfigNode`] tree used for folder discovery.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};
use crate::folders::{collect_folder_names, ConfigNode, FOLDERS_KEY};

/// Config file used when neither `--config` nor `ORGDOCS_CONFIG` is set.
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";

/// Directory under the storage root holding one document folder per organization.
pub const DOCUMENTS_DIR: &str = "documents";

/// Directory under the storage root holding one vector store per organization.
pub const VECTORSTORE_DIR: &str = "vectorstore";

const KNOWN_EMBEDDING_PROVIDERS: [&str; 3] = ["tei", "ollama", "mock"];
const KNOWN_LLM_PROVIDERS: [&str; 3] = ["azure", "azure-openai", "ollama"];

/// Main application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Path of the file this configuration was read from
    pub config_file: PathBuf,

    /// Storage root containing `documents/` and `vectorstore/`
    pub folder_path: PathBuf,

    /// Embedding model identifier (e.g., "sentence-transformers/all-MiniLM-L6-v2")
    pub embed_model: Option<String>,

    /// Compute device hint for the embedding backend ("cpu", "cuda", ...)
    pub device: String,

    /// Users in configuration order
    pub users: Vec<UserEntry>,

    pub embedding: EmbeddingSettings,
    pub llm: LlmSettings,
    pub retrieval: RetrievalSettings,
    pub chunking: ChunkingSettings,
    pub prompt: PromptSettings,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,

    tree: ConfigNode,
}

/// A configured user and the folders they may query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserEntry {
    pub username: String,
    pub email: Option<String>,
    pub folders: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct UserInfo {
    email: Option<String>,
    #[serde(default)]
    folders: Vec<String>,
}

/// Embedding backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingSettings {
    /// Provider name: "tei", "ollama" or "mock"
    #[serde(default = "default_embedding_provider")]
    pub provider: String,

    /// Service base URL; provider default when absent
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Embedding vector dimensions
    #[serde(default = "default_dimensions")]
    pub dimensions: usize,

    /// Maximum texts per embedding request
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

/// Language model settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    /// Provider name: "azure" or "ollama"
    #[serde(default = "default_llm_provider")]
    pub provider: String,

    /// Azure deployment name, or Ollama model name
    #[serde(default = "default_deployment")]
    pub deployment: String,

    /// Azure OpenAI API version
    #[serde(default)]
    pub api_version: Option<String>,

    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Environment variable holding the endpoint URL
    #[serde(default = "default_endpoint_env")]
    pub endpoint_env: String,

    /// Explicit endpoint URL; wins over `endpoint_env`
    #[serde(default)]
    pub endpoint: Option<String>,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default)]
    pub max_tokens: Option<u32>,
}

/// Retrieval settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalSettings {
    /// Chunks retrieved from each folder
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

/// Chunking settings, measured in characters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingSettings {
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,
}

/// Prompt settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PromptSettings {
    /// Handlebars file replacing the built-in system template
    #[serde(default)]
    pub template_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct LoggingSettings {
    level: Option<String>,
    color: Option<bool>,
}

/// Full configuration file structure.
#[derive(Debug, Clone, Deserialize)]
struct ConfigFile {
    folder_path: Option<PathBuf>,
    embed_model: Option<String>,
    device: Option<String>,
    #[serde(default)]
    users: serde_yaml::Mapping,
    embedding: Option<EmbeddingSettings>,
    llm: Option<LlmSettings>,
    retrieval: Option<RetrievalSettings>,
    chunking: Option<ChunkingSettings>,
    prompt: Option<PromptSettings>,
    logging: Option<LoggingSettings>,
}

fn default_embedding_provider() -> String {
    "tei".to_string()
}

fn default_dimensions() -> usize {
    384
}

fn default_batch_size() -> usize {
    32
}

fn default_llm_provider() -> String {
    "azure".to_string()
}

fn default_deployment() -> String {
    "gpt-4o-mini".to_string()
}

fn default_api_key_env() -> String {
    "AZURE_OPENAI_KEY1".to_string()
}

fn default_endpoint_env() -> String {
    "AZURE_OPENAI_ENDPOINT1".to_string()
}

fn default_temperature() -> f32 {
    0.1
}

fn default_top_k() -> usize {
    10
}

fn default_chunk_size() -> usize {
    1000
}

fn default_chunk_overlap() -> usize {
    200
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            provider: default_embedding_provider(),
            endpoint: None,
            dimensions: default_dimensions(),
            batch_size: default_batch_size(),
        }
    }
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: default_llm_provider(),
            deployment: default_deployment(),
            api_version: None,
            api_key_env: default_api_key_env(),
            endpoint_env: default_endpoint_env(),
            endpoint: None,
            temperature: default_temperature(),
            max_tokens: None,
        }
    }
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
        }
    }
}

impl Default for ChunkingSettings {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
        }
    }
}

impl LlmSettings {
    /// API version, falling back to `OPENAI_API_VERSION` and then "2024-02-01".
    pub fn resolved_api_version(&self) -> String {
        self.api_version
            .clone()
            .or_else(|| std::env::var("OPENAI_API_VERSION").ok())
            .unwrap_or_else(|| "2024-02-01".to_string())
    }

    /// Endpoint from config, else from the configured environment variable.
    pub fn resolved_endpoint(&self) -> Option<String> {
        self.endpoint
            .clone()
            .or_else(|| std::env::var(&self.endpoint_env).ok())
    }

    /// API key from the configured environment variable.
    pub fn resolved_api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env).ok()
    }
}

impl AppConfig {
    /// Load configuration from a YAML file.
    ///
    /// A missing or unreadable file is fatal. `ORGDOCS_ROOT` overrides
    /// `folder_path` after parsing.
    ///
    /// # Example
    /// ```no_run
    /// use orgdocs_core::config::AppConfig;
    /// use std::path::Path;
    ///
    /// let config = AppConfig::load(Path::new("config.yaml")).expect("Failed to load config");
    /// println!("Storage root: {:?}", config.folder_path);
    /// ```
    pub fn load(path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let mut config = Self::from_yaml_str(&contents, path)?;

        if let Ok(root) = std::env::var("ORGDOCS_ROOT") {
            config.folder_path = PathBuf::from(root);
        }

        tracing::debug!(
            "Loaded config from {:?}: {} users, root {:?}",
            path,
            config.users.len(),
            config.folder_path
        );

        Ok(config)
    }

    /// Parse configuration from YAML text.
    pub fn from_yaml_str(contents: &str, config_file: &Path) -> AppResult<Self> {
        let value: serde_yaml::Value = serde_yaml::from_str(contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", config_file, e))
        })?;

        let file: ConfigFile = serde_yaml::from_value(value.clone()).map_err(|e| {
            AppError::Config(format!("Invalid config file {:?}: {}", config_file, e))
        })?;

        let folder_path = file.folder_path.ok_or_else(|| {
            AppError::Config(format!("Missing 'folder_path' in {:?}", config_file))
        })?;

        let users = parse_users(&file.users)?;
        let logging = file.logging.unwrap_or_default();

        let config = Self {
            config_file: config_file.to_path_buf(),
            folder_path,
            embed_model: file.embed_model.filter(|m| !m.trim().is_empty()),
            device: file.device.unwrap_or_else(|| "cpu".to_string()),
            users,
            embedding: file.embedding.unwrap_or_default(),
            llm: file.llm.unwrap_or_default(),
            retrieval: file.retrieval.unwrap_or_default(),
            chunking: file.chunking.unwrap_or_default(),
            prompt: file.prompt.unwrap_or_default(),
            log_level: logging.level,
            verbose: false,
            no_color: logging.color.map(|c| !c).unwrap_or(false),
            tree: ConfigNode::from(&value),
        };

        config.validate()?;
        Ok(config)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// Flags take precedence over the file. `log_level` (the `--log-level`
    /// flag, or `RUST_LOG` as resolved by clap) wins outright; otherwise
    /// `verbose` forces `debug` even when the file sets `logging.level`.
    pub fn with_overrides(
        mut self,
        folder_path: Option<PathBuf>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(folder_path) = folder_path {
            self.folder_path = folder_path;
        }

        if verbose {
            self.verbose = true;
        }

        match log_level {
            Some(log_level) => self.log_level = Some(log_level),
            None if verbose => self.log_level = Some("debug".to_string()),
            None => {}
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Validate value ranges and provider names.
    pub fn validate(&self) -> AppResult<()> {
        if self.chunking.chunk_size == 0 {
            return Err(AppError::Config("chunk_size must be positive".to_string()));
        }

        if self.chunking.chunk_overlap >= self.chunking.chunk_size {
            return Err(AppError::Config(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.chunking.chunk_overlap, self.chunking.chunk_size
            )));
        }

        if self.retrieval.top_k == 0 {
            return Err(AppError::Config("top_k must be positive".to_string()));
        }

        if self.embedding.dimensions == 0 {
            return Err(AppError::Config(
                "embedding dimensions must be positive".to_string(),
            ));
        }

        if !KNOWN_EMBEDDING_PROVIDERS.contains(&self.embedding.provider.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown embedding provider: {}. Supported: {}",
                self.embedding.provider,
                KNOWN_EMBEDDING_PROVIDERS.join(", ")
            )));
        }

        if !KNOWN_LLM_PROVIDERS.contains(&self.llm.provider.to_lowercase().as_str()) {
            return Err(AppError::Config(format!(
                "Unknown LLM provider: {}. Supported: {}",
                self.llm.provider,
                KNOWN_LLM_PROVIDERS.join(", ")
            )));
        }

        Ok(())
    }

    /// The embedding model, required by every command that embeds text.
    pub fn require_embed_model(&self) -> AppResult<&str> {
        self.embed_model.as_deref().ok_or_else(|| {
            AppError::Config(format!(
                "Missing 'embed_model' in {:?}; it is required to index or query",
                self.config_file
            ))
        })
    }

    /// Every folder name referenced under a `folders` key, in document order,
    /// duplicates included.
    pub fn folder_names(&self) -> Vec<String> {
        collect_folder_names(&self.tree, FOLDERS_KEY)
    }

    /// Folder names to index, deduplicated in first-seen order.
    pub fn indexable_folders(&self) -> Vec<String> {
        let mut unique: Vec<String> = Vec::new();
        for name in self.folder_names() {
            if !unique.contains(&name) {
                unique.push(name);
            }
        }
        unique
    }

    /// Raw configuration tree.
    pub fn tree(&self) -> &ConfigNode {
        &self.tree
    }

    /// Source documents for a folder.
    pub fn documents_dir(&self, folder: &str) -> PathBuf {
        self.folder_path.join(DOCUMENTS_DIR).join(folder)
    }

    /// Root of all per-folder vector stores.
    pub fn vectorstore_root(&self) -> PathBuf {
        self.folder_path.join(VECTORSTORE_DIR)
    }

    /// Vector store for a folder.
    pub fn vectorstore_dir(&self, folder: &str) -> PathBuf {
        self.vectorstore_root().join(folder)
    }
}

fn parse_users(mapping: &serde_yaml::Mapping) -> AppResult<Vec<UserEntry>> {
    let mut users = Vec::with_capacity(mapping.len());

    for (key, value) in mapping {
        let username = match key {
            serde_yaml::Value::String(s) => s.clone(),
            other => {
                return Err(AppError::Config(format!(
                    "User names must be strings, got {:?}",
                    other
                )))
            }
        };

        let info: UserInfo = if value.is_null() {
            UserInfo {
                email: None,
                folders: Vec::new(),
            }
        } else {
            serde_yaml::from_value(value.clone()).map_err(|e| {
                AppError::Config(format!("Invalid entry for user '{}': {}", username, e))
            })?
        };

        users.push(UserEntry {
            username,
            email: info.email,
            folders: info.folders,
        });
    }

    Ok(users)
}
