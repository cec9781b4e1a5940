use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] bookclub_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("No entry found for id: {0}")]
    NotFound(String),
    #[error("{0} is not an admin")]
    NotAdmin(String),
    #[error("No email set. Run `bookclub user set --name NAME --email EMAIL` or pass --email.")]
    MissingEmail,
    #[error("Configuration error: {0}")]
    Config(String),
}
