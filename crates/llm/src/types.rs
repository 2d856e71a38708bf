//! Provider identification.

/// Supported language model providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderType {
    AzureOpenAi,
    Ollama,
}

impl ProviderType {
    /// Parse provider type from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "azure" | "azure-openai" => Some(Self::AzureOpenAi),
            "ollama" => Some(Self::Ollama),
            _ => None,
        }
    }
}
