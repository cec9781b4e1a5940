//! Shared list/create/delete orchestration for mirrored collections.

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};

use crate::db::{LocalMirror, MirrorKey};
use crate::gateway::{Action, RemoteStore};
use crate::models::{Entry, SyncStatus};
use crate::{Error, Result};

/// Where new entries go in the mirrored sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Newest first
    Prepend,
    /// Oldest first
    Append,
}

/// An entity type stored in a remote sheet and mirrored locally.
pub trait Collection: Clone + Serialize + DeserializeOwned {
    /// Remote row shape
    type Row: Serialize + DeserializeOwned;

    const MIRROR_KEY: MirrorKey;
    const READ: Action;
    const SAVE: Action;
    const PLACEMENT: Placement;

    fn from_row(row: Self::Row) -> Self;
    fn to_row(&self) -> Self::Row;
    fn id(&self) -> Option<&str>;
    fn set_id(&mut self, id: String);
}

/// What happened when a new entry was pushed to the remote store
#[derive(Debug)]
enum PushOutcome {
    /// No endpoint configured; the mirror is the only store
    LocalOnly,
    /// Remote accepted the row; carries the id it assigned, if it sent one
    Accepted(Option<String>),
    /// Endpoint configured but not reachable
    Unavailable,
    /// Remote answered and refused the row
    Rejected(Error),
}

/// Counts from a pending-entry retry pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RetryReport {
    pub confirmed: usize,
    pub still_pending: usize,
    pub rejected: usize,
}

/// What a delete did remotely and locally
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Deletion {
    /// The remote store answered the delete call
    pub acknowledged: bool,
    /// A mirror entry was removed
    pub removed: bool,
}

impl Deletion {
    /// Whether anything, remote or local, handled the id.
    pub const fn handled(self) -> bool {
        self.acknowledged || self.removed
    }
}

impl RetryReport {
    pub const fn merge(self, other: Self) -> Self {
        Self {
            confirmed: self.confirmed + other.confirmed,
            still_pending: self.still_pending + other.still_pending,
            rejected: self.rejected + other.rejected,
        }
    }
}

/// Generic adapter over one collection
pub struct CollectionAdapter<'a, R, T> {
    remote: &'a R,
    mirror: &'a LocalMirror,
    _collection: PhantomData<T>,
}

impl<'a, R: RemoteStore, T: Collection> CollectionAdapter<'a, R, T> {
    pub const fn new(remote: &'a R, mirror: &'a LocalMirror) -> Self {
        Self {
            remote,
            mirror,
            _collection: PhantomData,
        }
    }

    /// Read the collection, preferring remote data over the mirror.
    ///
    /// Remote rows refresh the mirror's confirmed entries; entries the remote
    /// has never seen are kept and included in the result. A rejected read
    /// yields an empty list.
    pub async fn list(&self) -> Result<Vec<Entry<T>>> {
        let mirrored = self.load().await?;

        let value = match self.remote.call(T::READ, None).await {
            Ok(Some(value)) => value,
            Ok(None) => return Ok(mirrored),
            Err(error) => {
                tracing::error!(action = %T::READ, "Remote read failed: {error}");
                return Ok(Vec::new());
            }
        };

        let confirmed = decode_rows::<T::Row>(T::READ, value)
            .into_iter()
            .map(T::from_row)
            .map(|item| {
                // Keep local keys stable for rows the mirror already knew
                let local_key = item.id().and_then(|id| {
                    mirrored
                        .iter()
                        .find(|entry| !entry.is_unsynced() && entry.item.id() == Some(id))
                        .map(|entry| entry.local_key)
                });
                let mut entry = Entry::confirmed(item);
                if let Some(local_key) = local_key {
                    entry.local_key = local_key;
                }
                entry
            })
            .collect::<Vec<_>>();
        let unsynced = mirrored
            .into_iter()
            .filter(Entry::is_unsynced)
            .collect::<Vec<_>>();

        let entries = match T::PLACEMENT {
            Placement::Prepend => unsynced.into_iter().chain(confirmed).collect::<Vec<_>>(),
            Placement::Append => confirmed.into_iter().chain(unsynced).collect::<Vec<_>>(),
        };
        self.store(&entries).await?;
        Ok(entries)
    }

    /// Record a new item optimistically, push it, then reconcile the entry.
    pub async fn create(&self, item: T) -> Result<Entry<T>> {
        let entry = Entry::pending(item);
        self.update(|entries| match T::PLACEMENT {
            Placement::Prepend => entries.insert(0, entry.clone()),
            Placement::Append => entries.push(entry.clone()),
        })
        .await?;

        let outcome = self.push(&entry.item).await;
        self.reconcile(entry, outcome).await
    }

    /// Push every pending entry again.
    ///
    /// Entries created in local-only mode are pushed too once an endpoint is
    /// configured.
    pub async fn retry_pending(&self) -> Result<RetryReport> {
        let configured = self.remote.is_configured();
        let unsynced = self
            .load()
            .await?
            .into_iter()
            .filter(|entry| entry.is_pending() || (configured && entry.is_unsynced()))
            .collect::<Vec<_>>();

        let mut report = RetryReport::default();
        for entry in unsynced {
            let outcome = self.push(&entry.item).await;
            match self.reconcile(entry, outcome).await {
                Ok(entry) if entry.status == SyncStatus::Confirmed => report.confirmed += 1,
                Ok(_) => report.still_pending += 1,
                Err(Error::Remote(message)) => {
                    tracing::error!(action = %T::SAVE, "Dropped pending entry rejected by remote: {message}");
                    report.rejected += 1;
                }
                Err(error) => return Err(error),
            }
        }

        if report != RetryReport::default() {
            tracing::info!(
                collection = %T::MIRROR_KEY,
                "Retried pending entries: {} confirmed, {} pending, {} rejected",
                report.confirmed,
                report.still_pending,
                report.rejected
            );
        }
        Ok(report)
    }

    /// Delete by remote id, or by local key for entries the remote never saw.
    pub async fn delete(&self, action: Action, id: &str) -> Result<Deletion> {
        let id = id.trim();
        if id.is_empty() {
            return Err(Error::InvalidInput("id cannot be empty".to_string()));
        }

        let local_only = self
            .load()
            .await?
            .iter()
            .any(|entry| entry.is_unsynced() && entry.local_key.as_str() == id);
        let acknowledged = !local_only && self.fire(action, Some(json!({ "id": id }))).await;

        let mut removed = false;
        self.update(|entries| {
            let before = entries.len();
            entries.retain(|entry| entry.item.id() != Some(id) && entry.local_key.as_str() != id);
            removed = entries.len() != before;
        })
        .await?;
        Ok(Deletion {
            acknowledged,
            removed,
        })
    }

    /// Clear the remote collection and empty the mirror.
    pub async fn clear(&self, action: Action) -> Result<()> {
        self.fire(action, None).await;
        self.store(&[]).await
    }

    /// Best-effort remote write; failures are logged and otherwise ignored.
    ///
    /// Returns whether the remote store answered the call.
    pub async fn fire(&self, action: Action, payload: Option<Value>) -> bool {
        match self.remote.call(action, payload).await {
            Ok(Some(_)) => true,
            Ok(None) => false,
            Err(error) => {
                tracing::error!(%action, "Remote write failed: {error}");
                false
            }
        }
    }

    /// Apply `change` to the mirrored sequence and persist it.
    pub async fn update(&self, change: impl FnOnce(&mut Vec<Entry<T>>)) -> Result<()> {
        let mut entries = self.load().await?;
        change(&mut entries);
        self.store(&entries).await
    }

    async fn load(&self) -> Result<Vec<Entry<T>>> {
        self.mirror.load_list(T::MIRROR_KEY).await
    }

    async fn store(&self, entries: &[Entry<T>]) -> Result<()> {
        self.mirror.store_list(T::MIRROR_KEY, entries).await
    }

    async fn push(&self, item: &T) -> PushOutcome {
        if !self.remote.is_configured() {
            return PushOutcome::LocalOnly;
        }

        let payload = match row_payload(item) {
            Ok(payload) => payload,
            Err(error) => return PushOutcome::Rejected(error),
        };

        match self.remote.call(T::SAVE, Some(payload)).await {
            Ok(Some(response)) => PushOutcome::Accepted(response_id(&response)),
            Ok(None) => PushOutcome::Unavailable,
            Err(error) => PushOutcome::Rejected(error),
        }
    }

    async fn reconcile(&self, mut entry: Entry<T>, outcome: PushOutcome) -> Result<Entry<T>> {
        match outcome {
            PushOutcome::LocalOnly => {
                entry.item.set_id(entry.local_key.as_str());
                entry.status = SyncStatus::Local;
            }
            PushOutcome::Accepted(Some(id)) => {
                entry.item.set_id(id);
                entry.status = SyncStatus::Confirmed;
            }
            PushOutcome::Accepted(None) => {
                tracing::debug!(
                    action = %T::SAVE,
                    "Remote accepted row without returning an id; next read will supply it"
                );
                entry.status = SyncStatus::Confirmed;
            }
            PushOutcome::Unavailable => {
                tracing::warn!(
                    action = %T::SAVE,
                    "Remote store unavailable; entry {} kept unsynced",
                    entry.local_key
                );
                return Ok(entry);
            }
            PushOutcome::Rejected(error) => {
                let local_key = entry.local_key;
                self.update(|entries| entries.retain(|candidate| candidate.local_key != local_key))
                    .await?;
                return Err(error);
            }
        }

        let confirmed = entry.clone();
        self.update(|entries| {
            if let Some(slot) = entries
                .iter_mut()
                .find(|candidate| candidate.local_key == confirmed.local_key)
            {
                *slot = confirmed;
            }
        })
        .await?;
        Ok(entry)
    }
}

/// Decode a remote list body into rows, skipping malformed ones.
pub fn decode_rows<Row: DeserializeOwned>(action: Action, value: Value) -> Vec<Row> {
    let rows = match value {
        Value::Array(rows) => rows,
        other => {
            tracing::warn!(%action, "Expected a list of rows, got {other}");
            return Vec::new();
        }
    };

    rows.into_iter()
        .filter_map(|row| match serde_json::from_value::<Row>(row) {
            Ok(row) => Some(row),
            Err(error) => {
                tracing::warn!(%action, "Skipping malformed row: {error}");
                None
            }
        })
        .collect()
}

/// Serialize an entity's row for a save action, leaving id assignment to the remote.
///
/// Local-only entries carry their local key as id; it never reaches the sheet.
fn row_payload<T: Collection>(item: &T) -> Result<Value> {
    let mut payload = serde_json::to_value(item.to_row())?;
    if let Value::Object(fields) = &mut payload {
        fields.remove("id");
    }
    Ok(payload)
}

/// Identifier the remote assigned, from `{id}` or `{data: {id}}`.
pub fn response_id(response: &Value) -> Option<String> {
    let id = response
        .get("id")
        .or_else(|| response.get("data").and_then(|data| data.get("id")))?;
    match id {
        Value::String(id) => Some(id.trim().to_string()).filter(|id| !id.is_empty()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}
