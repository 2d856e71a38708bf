//! Prompt builder for rendering the grounding template.

use crate::loader::PromptTemplate;
use crate::types::BuiltPrompt;
use handlebars::Handlebars;
use orgdocs_core::{AppError, AppResult, Turn};
use serde::Serialize;

#[derive(Serialize)]
struct SystemVars<'a> {
    organizations: &'a str,
    context: &'a str,
}

/// Build the grounding prompt for one question.
///
/// The system part is `template` rendered with the organization names and
/// every chunk text joined by blank lines. Chunks pass through verbatim and
/// untruncated. The user part carries the organizations, the serialized
/// history and the question.
///
/// # Example
/// ```
/// use orgdocs_prompt::{build_prompt, PromptTemplate};
///
/// let built = build_prompt(
///     &PromptTemplate::builtin(),
///     &["OrgA".to_string()],
///     &["Revenue grew 10% in Q1".to_string()],
///     &[],
///     "How did revenue change?",
/// ).unwrap();
/// assert!(built.system.contains("Revenue grew 10% in Q1"));
/// assert!(built.user.ends_with("Helpful Answer:"));
/// ```
pub fn build_prompt(
    template: &PromptTemplate,
    organization_names: &[String],
    chunk_texts: &[String],
    chat_history: &[Turn],
    question: &str,
) -> AppResult<BuiltPrompt> {
    let organizations = format_list(organization_names);
    let context = chunk_texts.join("\n\n");

    tracing::debug!(
        "Building prompt from template '{}' with {} chunks ({} chars of context)",
        template.source,
        chunk_texts.len(),
        context.len()
    );

    let system = render_template(
        &template.text,
        &SystemVars {
            organizations: &organizations,
            context: &context,
        },
    )?;

    let user = format!(
        "Organization Names: {}\nChat History: {}\nQuestion: {}\nHelpful Answer:",
        organizations,
        format_history(chat_history),
        question
    );

    Ok(BuiltPrompt::new(system, user))
}

/// Render a Handlebars template with variables.
fn render_template<T: Serialize>(template: &str, variables: &T) -> AppResult<String> {
    let mut handlebars = Handlebars::new();

    // Plain text output; chunk text must pass through untouched.
    handlebars.register_escape_fn(handlebars::no_escape);

    handlebars
        .register_template_string("system", template)
        .map_err(|e| AppError::Prompt(format!("Failed to register template: {}", e)))?;

    handlebars
        .render("system", variables)
        .map_err(|e| AppError::Prompt(format!("Failed to render template: {}", e)))
}

/// `['OrgA', 'OrgB']`
fn format_list(items: &[String]) -> String {
    let quoted: Vec<String> = items.iter().map(|s| quote(s)).collect();
    format!("[{}]", quoted.join(", "))
}

/// `[]`, or `[('question', 'answer'), ...]`
fn format_history(history: &[Turn]) -> String {
    let pairs: Vec<String> = history
        .iter()
        .map(|turn| format!("({}, {})", quote(&turn.question), quote(&turn.answer)))
        .collect();
    format!("[{}]", pairs.join(", "))
}

/// Quote a string in list-literal form: single quotes, unless the text
/// holds a `'` and no `"`.
fn quote(s: &str) -> String {
    let delim = if s.contains('\'') && !s.contains('"') {
        '"'
    } else {
        '\''
    };

    let mut out = String::with_capacity(s.len() + 2);
    out.push(delim);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == delim => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(delim);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn orgs(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_render_simple_template() {
        let vars = SystemVars {
            organizations: "['OrgA']",
            context: "a < b & c",
        };
        let result = render_template("At {{organizations}}: {{context}}", &vars).unwrap();
        assert_eq!(result, "At ['OrgA']: a < b & c");
    }

    #[test]
    fn test_chunks_pass_through_verbatim() {
        let chunks = vec![
            "Revenue grew 10% in Q1".to_string(),
            "Margins: <b>\"flat\"</b> & stable".to_string(),
        ];
        let built = build_prompt(
            &PromptTemplate::builtin(),
            &orgs(&["OrgA", "OrgB"]),
            &chunks,
            &[],
            "Compare revenue",
        )
        .unwrap();

        assert!(built
            .system
            .contains("Revenue grew 10% in Q1\n\nMargins: <b>\"flat\"</b> & stable"));
        assert!(built
            .system
            .starts_with("You are an expert support agent at ['OrgA', 'OrgB']."));
    }

    #[test]
    fn test_user_turn_layout() {
        let built = build_prompt(
            &PromptTemplate::builtin(),
            &orgs(&["OrgA"]),
            &[],
            &[],
            "What changed?",
        )
        .unwrap();

        assert_eq!(
            built.user,
            "Organization Names: ['OrgA']\nChat History: []\nQuestion: What changed?\nHelpful Answer:"
        );
    }

    #[test]
    fn test_history_serialization() {
        let history = vec![Turn {
            question: "What's new?".to_string(),
            answer: "Q1 results".to_string(),
        }];
        let built = build_prompt(
            &PromptTemplate::builtin(),
            &orgs(&["OrgA"]),
            &[],
            &history,
            "And Q2?",
        )
        .unwrap();

        assert!(built
            .user
            .contains("Chat History: [(\"What's new?\", 'Q1 results')]"));
    }

    #[test]
    fn test_quote_switches_delimiter_for_apostrophes() {
        assert_eq!(quote("OrgA"), "'OrgA'");
        assert_eq!(quote("What's new?"), "\"What's new?\"");
        assert_eq!(quote("say \"hi\""), "'say \"hi\"'");
        assert_eq!(quote("it's \"both\""), "'it\\'s \"both\"'");
        assert_eq!(quote("a\\b"), "'a\\\\b'");
        assert_eq!(quote("line one\nline two"), "'line one\\nline two'");
    }

    #[test]
    fn test_empty_context_still_renders() {
        let built =
            build_prompt(&PromptTemplate::builtin(), &orgs(&[]), &[], &[], "Anything?").unwrap();
        assert!(built.system.contains("----------------\n\n\n"));
        assert!(built.user.starts_with("Organization Names: []"));
    }

    #[test]
    fn test_invalid_template_is_prompt_error() {
        let template = PromptTemplate {
            source: "test".to_string(),
            text: "{{#if}}".to_string(),
        };
        let result = build_prompt(&template, &orgs(&["OrgA"]), &[], &[], "q");
        assert!(matches!(result, Err(AppError::Prompt(_))));
    }
}
