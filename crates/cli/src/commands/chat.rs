//! Interactive chat command handler.

use super::Credentials;
use clap::Args;
use orgdocs_core::{config::AppConfig, Access, AppResult, Session};
use orgdocs_knowledge::answer;
use orgdocs_llm::create_client;
use orgdocs_prompt::PromptTemplate;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Chat over the folders a user may read; history carries across turns
#[derive(Args, Debug)]
pub struct ChatCommand {
    #[command(flatten)]
    pub credentials: Credentials,
}

impl ChatCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let mut session = match Session::login(
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

        println!(
            "Logged in as {} ({}). Type 'exit' to log out.",
            session.username(),
            session.folders().join(", ")
        );

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            print!("> ");
            std::io::stdout().flush()?;

            let Some(line) = lines.next_line().await? else {
                break;
            };
            let question = line.trim();
            if question.is_empty() {
                continue;
            }
            if question.eq_ignore_ascii_case("exit") || question.eq_ignore_ascii_case("quit") {
                break;
            }

            // A failed turn ends that question, not the session.
            match answer(
                config,
                embedder.as_ref(),
                llm.as_ref(),
                &template,
                &session,
                question,
            )
            .await
            {
                Ok(result) => {
                    println!("{}\n", result.text);
                    session.record_turn(question, result.text);
                }
                Err(e) => {
                    tracing::error!("Question failed: {}", e);
                    eprintln!("Error: {}", e);
                }
            }
        }

        session.logout();
        Ok(())
    }
}
