//! Repository Module
//!
//! Provides CRUD operations for the category and product tables.
//! Write operations used inside cascades accept any SQLite executor so the
//! engine can route them through one transaction.

pub mod category;
pub mod product;

// Re-exports
pub use category::{CategoryPatch, CategoryRepository};
pub use product::ProductRepository;

use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => RepoError::NotFound(err.to_string()),
            _ => RepoError::Database(err.to_string()),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Build a `?, ?, ...` placeholder list for an `IN (...)` clause
pub(crate) fn in_placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}
