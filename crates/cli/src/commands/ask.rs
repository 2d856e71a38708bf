//! Ask command handler.
//!
//! Logs in, answers one question over the user's folders, logs out.

use super::Credentials;
use clap::Args;
use orgdocs_core::{config::AppConfig, Access, AppResult, Session};
use orgdocs_knowledge::{answer, Answer};
use orgdocs_llm::create_client;
use orgdocs_prompt::PromptTemplate;

/// Answer one question from the folders a user may read
#[derive(Args, Debug)]
pub struct AskCommand {
    #[command(flatten)]
    pub credentials: Credentials,

    /// The question to ask
    pub question: String,

    /// Output as JSON (answer plus the retrieved sources)
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let session = match Session::login(
            config,
            &self.credentials.username,
            &self.credentials.email,
        ) {
            Some(session) => session,
            None => {
                println!("{}", Access::NOT_FOUND_MESSAGE);
                return Ok(());
            }
        };

        let embedder = super::embedder(config)?;
        let llm = create_client(&config.llm)?;
        let template = PromptTemplate::resolve(config.prompt.template_path.as_deref())?;

        let result = answer(
            config,
            embedder.as_ref(),
            llm.as_ref(),
            &template,
            &session,
            &self.question,
        )
        .await?;

        if self.json {
            super::print_json(&answer_json(&result))?;
        } else {
            println!("{}", result.text);
        }

        session.logout();
        Ok(())
    }
}

/// JSON view of an answer with its sources.
pub fn answer_json(result: &Answer) -> serde_json::Value {
    let sources: Vec<serde_json::Value> = result
        .context
        .iter()
        .map(|r| {
            serde_json::json!({
                "folder": r.folder,
                "source": r.chunk.source,
                "page": r.chunk.page,
                "score": r.score,
            })
        })
        .collect();

    serde_json::json!({
        "answer": result.text,
        "sources": sources,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use orgdocs_knowledge::{Chunk, RetrievedChunk};

    #[test]
    fn test_answer_json_lists_sources_in_order() {
        let result = Answer {
            text: "Revenue grew 10% in Q1.".to_string(),
            context: vec![
                RetrievedChunk {
                    folder: "OrgA".to_string(),
                    chunk: Chunk {
                        id: "a".to_string(),
                        source: "q1.pdf".to_string(),
                        page: 2,
                        position: 0,
                        text: "Revenue grew 10% in Q1".to_string(),
                    },
                    score: 0.5,
                },
                RetrievedChunk {
                    folder: "OrgB".to_string(),
                    chunk: Chunk {
                        id: "b".to_string(),
                        source: "notes.pdf".to_string(),
                        page: 1,
                        position: 3,
                        text: "Flat".to_string(),
                    },
                    score: 0.25,
                },
            ],
        };

        let json = answer_json(&result);
        assert_eq!(json["answer"], "Revenue grew 10% in Q1.");
        assert_eq!(json["sources"][0]["folder"], "OrgA");
        assert_eq!(json["sources"][0]["page"], 2);
        assert_eq!(json["sources"][1]["source"], "notes.pdf");
    }
}
