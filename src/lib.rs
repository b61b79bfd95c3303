//! # Insurance Manager
//!
//! Local record keeper for insurance clients and their policies.
//!
//! Insurance Manager provides:
//! - A client/policy data model with an explicit foreign-key relationship
//! - SQLite-backed storage with transactional inserts
//! - A validating session layer that tracks the "current" client
//! - Terminal presentation: results tables, messages and an interactive shell

pub mod model;
pub mod storage;
pub mod session;
pub mod config;
pub mod ui;
pub mod shell;

// Re-exports for convenient access
pub use model::{Client, NewPolicy, Policy, PolicyForm, PolicyRecord};
pub use session::{Session, ValidationError};
pub use storage::SqliteStore;

/// Result type alias for Insurance Manager operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Insurance Manager operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True when the user input failed a precondition and the store was never touched
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }

    /// True when the database rejected or failed the operation
    pub fn is_storage(&self) -> bool {
        matches!(self, Error::Storage(_))
    }
}
