//! Access control: which folders a login may query.
//!
//! This is a flat lookup against the configured users, not a security
//! boundary. A failed lookup is a normal outcome, not an error.

use crate::config::AppConfig;

/// Outcome of an access lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    /// Login matched; the user may query these folders.
    Granted(Vec<String>),
    /// No configured user matches the username/email pair.
    NotFound,
}

impl Access {
    /// Message shown to the user when the login does not match.
    pub const NOT_FOUND_MESSAGE: &'static str = "User or email not found !!!";

    /// Folders granted, if any.
    pub fn folders(&self) -> Option<&[String]> {
        match self {
            Access::Granted(folders) => Some(folders),
            Access::NotFound => None,
        }
    }
}

/// Resolve the folders a `(username, email)` pair may access.
///
/// Usernames compare case-insensitively, emails exactly. The first match in
/// configuration order wins. Users without an email never match.
pub fn resolve_access(config: &AppConfig, username: &str, email: &str) -> Access {
    let wanted = username.to_lowercase();

    let found = config.users.iter().find(|user| {
        user.username.to_lowercase() == wanted && user.email.as_deref() == Some(email)
    });

    match found {
        Some(user) => {
            tracing::debug!(
                "Access granted to '{}' for {} folders",
                user.username,
                user.folders.len()
            );
            Access::Granted(user.folders.clone())
        }
        None => {
            tracing::debug!("No user matches '{}'", username);
            Access::NotFound
        }
    }
}
