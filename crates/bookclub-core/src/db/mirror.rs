//! Local mirror of the remote collections.
//!
//! A key-value store with one JSON document per collection (an ordered
//! sequence) plus the current-user record. It is a cache: the remote store
//! wins whenever it is reachable.

use std::fmt;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::Database;
use crate::error::{Error, Result};
use crate::util::unix_millis_now;

/// Named documents held by the mirror
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MirrorKey {
    Books,
    Guides,
    Votes,
    GenreVotes,
    GenreHistory,
    CurrentUser,
}

impl MirrorKey {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Books => "books",
            Self::Guides => "guides",
            Self::Votes => "votes",
            Self::GenreVotes => "genre-votes",
            Self::GenreHistory => "genre-history",
            Self::CurrentUser => "current-user",
        }
    }
}

impl fmt::Display for MirrorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// libSQL-backed local mirror
pub struct LocalMirror {
    db: Database,
}

impl LocalMirror {
    /// Open (or create) the mirror database file
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self {
            db: Database::open(path).await?,
        })
    }

    /// In-memory mirror, primarily for tests
    pub async fn open_in_memory() -> Result<Self> {
        Ok(Self {
            db: Database::open_in_memory().await?,
        })
    }

    /// Raw JSON text stored under `key`
    pub async fn get_raw(&self, key: MirrorKey) -> Result<Option<String>> {
        let mut rows = self
            .db
            .connection()
            .query(
                "SELECT value FROM mirror_entries WHERE key = ?",
                [key.as_str()],
            )
            .await?;

        if let Some(row) = rows.next().await? {
            let value: String = row.get(0)?;
            Ok(Some(value))
        } else {
            Ok(None)
        }
    }

    /// Replace the document stored under `key`
    pub async fn put<T: Serialize + ?Sized>(&self, key: MirrorKey, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.db
            .connection()
            .execute(
                "INSERT OR REPLACE INTO mirror_entries (key, value, updated_at) VALUES (?, ?, ?)",
                libsql::params![key.as_str(), raw, unix_millis_now()],
            )
            .await?;
        Ok(())
    }

    /// Load a mirrored sequence; a missing document loads as empty.
    ///
    /// An unreadable document is an error and stays stored untouched.
    pub async fn load_list<T: DeserializeOwned>(&self, key: MirrorKey) -> Result<Vec<T>> {
        let Some(raw) = self.get_raw(key).await? else {
            return Ok(Vec::new());
        };
        serde_json::from_str(&raw).map_err(|error| {
            tracing::error!(%key, "Unreadable mirror document: {error}");
            Error::Serialization(error)
        })
    }

    pub async fn store_list<T: Serialize>(&self, key: MirrorKey, items: &[T]) -> Result<()> {
        self.put(key, items).await
    }
}
