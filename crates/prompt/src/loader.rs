//! Grounding template loading.

use orgdocs_core::{AppError, AppResult};
use std::path::Path;

/// Built-in grounding instruction.
///
/// Placeholders: `{{organizations}}` and `{{context}}`.
pub const BUILTIN_TEMPLATE: &str = r#"You are an expert support agent at {{organizations}}.

Your task is to answer customer queries related to {{organizations}}.

**Only respond if the question is related to the provided earnings call notes.**

Do not provide unverified or fabricated information, and ask follow-up questions if the query is unclear. Provide accurate answer in a proper formatted manner with working links and resources wherever applicable. Never provide wrong links.

Use the following context and chat history to answer the user's question:

----------------

{{context}}

**Formatting Guidelines:**

- If a question can be best answered using a table format (e.g., comparing features, listing data, or summarizing details), then provide the answer in a tabular format.
- Use simple markdown tables to ensure clarity. Here's an example of a markdown table:

```
| Column 1 | Column 2 | Column 3 |
|----------|----------|----------|
| Value 1  | Value 2  | Value 3  |
```

- If the response doesn't require a table, use bullet points, numbered lists, or standard paragraphs for clarity.
"#;

/// A system instruction template.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptTemplate {
    /// Where the template came from, for logging
    pub source: String,

    /// Handlebars source text
    pub text: String,
}

impl PromptTemplate {
    /// The built-in grounding template.
    pub fn builtin() -> Self {
        Self {
            source: "builtin".to_string(),
            text: BUILTIN_TEMPLATE.to_string(),
        }
    }

    /// Load a template override from disk.
    ///
    /// # Example
    /// ```no_run
    /// use orgdocs_prompt::PromptTemplate;
    /// use std::path::Path;
    ///
    /// # fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let template = PromptTemplate::from_file(Path::new("prompts/grounding.hbs"))?;
    /// println!("Loaded template from {}", template.source);
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_file(path: &Path) -> AppResult<Self> {
        tracing::debug!("Loading prompt template from: {:?}", path);

        if !path.exists() {
            return Err(AppError::Prompt(format!(
                "Prompt template not found: {:?}",
                path
            )));
        }

        let text = std::fs::read_to_string(path).map_err(|e| {
            AppError::Prompt(format!("Failed to read prompt template {:?}: {}", path, e))
        })?;

        if text.trim().is_empty() {
            return Err(AppError::Prompt(format!(
                "Prompt template is empty: {:?}",
                path
            )));
        }

        if !text.contains("context") {
            tracing::warn!(
                "Prompt template {:?} has no context placeholder; retrieved passages will be dropped",
                path
            );
        }

        Ok(Self {
            source: path.display().to_string(),
            text,
        })
    }

    /// Template from config, falling back to the built-in one.
    pub fn resolve(path: Option<&Path>) -> AppResult<Self> {
        match path {
            Some(p) => Self::from_file(p),
            None => Ok(Self::builtin()),
        }
    }
}
