//! Error taxonomy for the writer.
//!
//! Connection-level and argument-validation errors always propagate.
//! Statement-level errors are soft by default (see [`crate::executor`])
//! and only become `Error::Statement` in strict mode.

use thiserror::Error;

/// Errors surfaced by [`crate::writer::TableWriter`] operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The database file could not be opened.
    #[error("failed to open database {path}: {source}")]
    Connection {
        path: String,
        #[source]
        source: rusqlite::Error,
    },

    /// An operation that requires an open handle was invoked without one.
    #[error("not connected to the database")]
    NotConnected,

    /// Out-of-range field selector or mismatched column/value lengths.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The backend rejected a statement (strict mode only).
    #[error("statement failed: {0}")]
    Statement(#[from] rusqlite::Error),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;
