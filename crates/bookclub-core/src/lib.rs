//! bookclub-core - Core library for the book club store
//!
//! Members keep a shared reading list, nominate and vote on the next book and
//! genre, and share study guides. A spreadsheet behind a script endpoint is the
//! system of record; a local libSQL mirror keeps everything usable when that
//! endpoint is unset or unreachable.

pub mod adapters;
pub mod club;
pub mod config;
pub mod db;
pub mod error;
pub mod gateway;
pub mod models;
pub mod schema;
pub mod util;

#[cfg(test)]
mod test_support;

pub use club::BookClub;
pub use config::ClubConfig;
pub use error::{Error, Result};
pub use gateway::{Action, RemoteStore, ScriptGateway};
pub use models::{Entry, Session, SyncStatus};
