//! Core error types for the quotes service.
//!
//! This module defines database-agnostic error types. Storage-specific errors
//! (from Diesel, SQLite, etc.) are converted to these types by the storage layer.

use std::time::Duration;
use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the quotes service.
///
/// The service layer guarantees that callers only ever see `Validation`,
/// `NotFound` or `OperationFailed`; the remaining variants are produced by
/// repositories and deadlines and get wrapped on the way out.
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid quote data: {0}")]
    Validation(#[from] ValidationError),

    #[error("quote not found")]
    NotFound,

    #[error("Database operation failed: {0}")]
    Database(#[from] DatabaseError),

    #[error("operation timed out after {0:?}")]
    Timeout(Duration),

    #[error("failed to {operation}: {source}")]
    OperationFailed {
        operation: &'static str,
        source: Box<Error>,
    },

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl Error {
    /// True when the error means "no such record", whichever layer raised it.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::NotFound | Error::Database(DatabaseError::NotFound(_))
        )
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }
}

/// Database-agnostic error type for storage operations.
///
/// This enum uses `String` for all error details, allowing the storage layer
/// to convert storage-specific errors (Diesel, SQLite, etc.) into this format.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to establish a database connection.
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// Failed to create or configure the connection pool.
    #[error("Failed to create database pool: {0}")]
    PoolCreationFailed(String),

    /// A database query failed to execute.
    #[error("Database query failed: {0}")]
    QueryFailed(String),

    /// The requested record was not found.
    #[error("Record not found: {0}")]
    NotFound(String),

    /// Database migration failed.
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Internal/unexpected database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

/// Validation errors for user input.
///
/// The display strings are part of the HTTP contract and are returned to clients verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("author is required")]
    AuthorRequired,

    #[error("quote is required")]
    QuoteRequired,

    #[error("author must be less than {max} characters")]
    AuthorTooLong { max: usize },

    #[error("quote must be less than {max} characters")]
    QuoteTooLong { max: usize },

    #[error("invalid quote ID")]
    InvalidId(i64),
}
