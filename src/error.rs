//! Error types for Fileshelf.

use thiserror::Error;

/// Common error type for Fileshelf.
#[derive(Error, Debug)]
pub enum ShelfError {
    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Resource already exists (e.g. duplicate email).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Bad credentials, or an invalid, expired or misissued token.
    #[error("authentication error: {0}")]
    Unauthenticated(String),

    /// The caller is known but not allowed to perform the operation.
    #[error("permission denied: {0}")]
    Forbidden(String),

    /// Validation error for user input.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A storage path that resolves outside the blob root.
    #[error("invalid storage path: {0}")]
    InvalidPath(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Database error.
    ///
    /// Errors from sqlx are converted into this variant.
    #[error("database error: {0}")]
    Database(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Unexpected internal failure (hashing, token signing).
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<sqlx::Error> for ShelfError {
    fn from(e: sqlx::Error) -> Self {
        ShelfError::Database(e.to_string())
    }
}

/// Result type alias for Fileshelf operations.
pub type Result<T> = std::result::Result<T, ShelfError>;
