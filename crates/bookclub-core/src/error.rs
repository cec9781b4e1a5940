//! Error types for bookclub-core

use thiserror::Error;

/// Result type alias using bookclub-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in bookclub-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// libSQL error
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The remote endpoint answered with an error-tagged body
    #[error("Remote store error: {0}")]
    Remote(String),

    /// Remote collection schema does not match the row types
    #[error("Schema error: {0}")]
    Schema(String),

    /// HTTP client could not be constructed
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}
