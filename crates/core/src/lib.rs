//! Orgdocs Core Library
//!
//! Foundational pieces shared by every orgdocs crate:
//! - Error handling (`AppError`, `AppResult`)
//! - Logging infrastructure
//! - Configuration loading and folder discovery
//! - Access control and query sessions

pub mod access;
pub mod config;
pub mod error;
pub mod folders;
pub mod logging;
pub mod session;

// Re-export commonly used types
pub use access::{resolve_access, Access};
pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use session::{Session, Turn};
