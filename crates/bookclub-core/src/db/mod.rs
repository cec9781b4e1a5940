//! Local storage layer for the book club mirror

mod connection;
mod migrations;
mod mirror;

pub use connection::Database;
pub use mirror::{LocalMirror, MirrorKey};
