//! Per-login query session.
//!
//! A session is created by a successful login and ends on logout or drop.
//! It carries the granted folders and the prior turns of the conversation.

use uuid::Uuid;

use crate::access::{resolve_access, Access};
use crate::config::AppConfig;

/// One question/answer exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub question: String,
    pub answer: String,
}

/// An authenticated query session.
#[derive(Debug, Clone)]
pub struct Session {
    id: Uuid,
    username: String,
    folders: Vec<String>,
    history: Vec<Turn>,
}

impl Session {
    /// Log in; `None` when the username/email pair is unknown.
    pub fn login(config: &AppConfig, username: &str, email: &str) -> Option<Self> {
        match resolve_access(config, username, email) {
            Access::Granted(folders) => {
                let session = Self {
                    id: Uuid::new_v4(),
                    username: username.to_string(),
                    folders,
                    history: Vec::new(),
                };
                tracing::info!(
                    session = %session.id,
                    "Logged in '{}' with access to [{}]",
                    session.username,
                    session.folders.join(", ")
                );
                Some(session)
            }
            Access::NotFound => None,
        }
    }

    /// End the session.
    pub fn logout(self) {
        tracing::info!(
            session = %self.id,
            "Logged out '{}' after {} turns",
            self.username,
            self.history.len()
        );
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Folders this session may query.
    pub fn folders(&self) -> &[String] {
        &self.folders
    }

    pub fn history(&self) -> &[Turn] {
        &self.history
    }

    /// Append a completed exchange to the history.
    pub fn record_turn(&mut self, question: impl Into<String>, answer: impl Into<String>) {
        self.history.push(Turn {
            question: question.into(),
            answer: answer.into(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn config() -> AppConfig {
        AppConfig::from_yaml_str(
            "folder_path: /data\nusers:\n  Alice:\n    email: alice@x.com\n    folders: [OrgA]\n",
            Path::new("config.yaml"),
        )
        .unwrap()
    }

    #[test]
    fn test_login_grants_folders() {
        let session = Session::login(&config(), "alice", "alice@x.com").unwrap();
        assert_eq!(session.folders(), &["OrgA".to_string()]);
        assert_eq!(session.username(), "alice");
        assert!(session.history().is_empty());
    }

    #[test]
    fn test_wrong_email_creates_no_session() {
        assert!(Session::login(&config(), "Alice", "alice@y.com").is_none());
    }

    #[test]
    fn test_history_accumulates() {
        let mut session = Session::login(&config(), "Alice", "alice@x.com").unwrap();
        session.record_turn("q1", "a1");
        session.record_turn("q2", "a2");
        assert_eq!(session.history().len(), 2);
        assert_eq!(session.history()[1].question, "q2");
        session.logout();
    }

    #[test]
    fn test_sessions_have_distinct_ids() {
        let config = config();
        let a = Session::login(&config, "Alice", "alice@x.com").unwrap();
        let b = Session::login(&config, "Alice", "alice@x.com").unwrap();
        assert_ne!(a.id(), b.id());
    }
}
