//! Mirror entry wrapper carrying local sync status.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A key that identifies an entry in the local mirror, using UUID v7
/// (time-sortable).
///
/// This is never sent to the remote store as an entity id. In local-only mode
/// it doubles as the entity id until a remote store assigns one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocalKey(Uuid);

impl LocalKey {
    /// Create a new unique local key
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Get the string representation of this key
    #[must_use]
    pub fn as_str(&self) -> String {
        self.0.to_string()
    }
}

impl Default for LocalKey {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for LocalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for LocalKey {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Whether the remote store has acknowledged an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    /// Written locally, not yet acknowledged by the remote store
    Pending,
    /// Created while no endpoint was configured; pushed once one is
    Local,
    /// Acknowledged by the remote store
    #[default]
    Confirmed,
}

/// An entity as stored in the local mirror.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry<T> {
    pub local_key: LocalKey,
    #[serde(default)]
    pub status: SyncStatus,
    pub item: T,
}

impl<T> Entry<T> {
    /// Wrap an item created locally and awaiting remote acknowledgement.
    pub fn pending(item: T) -> Self {
        Self {
            local_key: LocalKey::new(),
            status: SyncStatus::Pending,
            item,
        }
    }

    /// Wrap an item that came from the remote store.
    pub fn confirmed(item: T) -> Self {
        Self {
            local_key: LocalKey::new(),
            status: SyncStatus::Confirmed,
            item,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == SyncStatus::Pending
    }

    /// Whether the remote store has never seen this entry.
    pub fn is_unsynced(&self) -> bool {
        self.status != SyncStatus::Confirmed
    }
}
