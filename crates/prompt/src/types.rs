//! Prompt types.

use serde::{Deserialize, Serialize};

/// A fully built prompt ready for LLM execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuiltPrompt {
    /// System instruction carrying the organizations and retrieved context
    pub system: String,

    /// User turn carrying the question and chat history
    pub user: String,
}

impl BuiltPrompt {
    /// Create a new built prompt.
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
        }
    }
}
