//! Grounding prompt assembly for orgdocs.
//!
//! Renders the system instruction from a Handlebars template parameterized
//! by organization names and retrieved context, and lays out the user turn.

pub mod builder;
pub mod loader;
pub mod types;

pub use builder::build_prompt;
pub use loader::{PromptTemplate, BUILTIN_TEMPLATE};
pub use types::BuiltPrompt;
