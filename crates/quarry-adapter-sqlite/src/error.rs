//! Error types for the storage gateway.

use thiserror::Error;

/// Errors raised by the storage gateway.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No session could be opened: bad URL, pool closed, or acquire timeout.
    #[error("failed to acquire database session: {0}")]
    Acquire(#[source] sqlx::Error),

    /// A statement failed to prepare or execute.
    #[error("Database error: {0}")]
    Query(#[source] sqlx::Error),

    /// A column value could not be decoded.
    #[error("failed to decode column {column}: {source}")]
    Decode {
        column: String,
        #[source]
        source: sqlx::Error,
    },

    /// The transaction could not be committed.
    #[error("failed to commit session: {0}")]
    Commit(#[source] sqlx::Error),

    /// Schema creation or reset failed.
    #[error("schema bootstrap failed: {0}")]
    Bootstrap(#[source] sqlx::Error),

    /// IO error while preparing the database file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// Whether the store could not be reached at all, as opposed to a single
    /// statement failing.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, StoreError::Acquire(_))
    }
}
