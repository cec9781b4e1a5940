//! Book nomination and voting adapter

use serde_json::json;

use super::collection::{Collection, CollectionAdapter, Placement, RetryReport};
use crate::db::{LocalMirror, MirrorKey};
use crate::gateway::{Action, RemoteStore};
use crate::models::{Entry, NewVotingOption, Session, VotingOption, VotingOptionRow};
use crate::util::rfc3339_now;
use crate::{Error, Result};

impl Collection for VotingOption {
    type Row = VotingOptionRow;

    const MIRROR_KEY: MirrorKey = MirrorKey::Votes;
    const READ: Action = Action::GetVotes;
    const SAVE: Action = Action::SaveVote;
    const PLACEMENT: Placement = Placement::Append;

    fn from_row(row: VotingOptionRow) -> Self {
        row.into()
    }

    fn to_row(&self) -> VotingOptionRow {
        self.into()
    }

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_id(&mut self, id: String) {
        self.id = Some(id);
    }
}

/// What a vote did remotely and locally
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VoteOutcome {
    /// The remote store answered the vote call
    pub acknowledged: bool,
    /// Count on the mirrored nomination after the vote, when it is mirrored
    pub votes: Option<u64>,
}

impl VoteOutcome {
    /// Whether anything, remote or local, counted the vote.
    pub const fn counted(self) -> bool {
        self.acknowledged || self.votes.is_some()
    }
}

/// Nominations for the next book and their vote counts
pub struct Voting<'a, R> {
    inner: CollectionAdapter<'a, R, VotingOption>,
}

impl<'a, R: RemoteStore> Voting<'a, R> {
    pub const fn new(remote: &'a R, mirror: &'a LocalMirror) -> Self {
        Self {
            inner: CollectionAdapter::new(remote, mirror),
        }
    }

    pub async fn list(&self) -> Result<Vec<Entry<VotingOption>>> {
        self.inner.list().await
    }

    /// Nominate a book on behalf of the session's member.
    pub async fn suggest(
        &self,
        session: &Session,
        draft: NewVotingOption,
    ) -> Result<Entry<VotingOption>> {
        let option = draft.into_option(&session.name, rfc3339_now())?;
        self.inner.create(option).await
    }

    /// Add one vote to a nomination.
    ///
    /// The remote sheet finds the row by id and the counter by its `votes`
    /// header. The mirror entry is bumped when present; there is no
    /// idempotency key, so every call counts.
    pub async fn increment(&self, id: &str) -> Result<VoteOutcome> {
        let id = id.trim();
        if id.is_empty() {
            return Err(Error::InvalidInput("id cannot be empty".to_string()));
        }

        let acknowledged = self.inner.fire(Action::Vote, Some(json!({ "id": id }))).await;

        let mut votes = None;
        self.inner
            .update(|entries| {
                if let Some(entry) = entries.iter_mut().find(|entry| {
                    entry.item.id.as_deref() == Some(id) || entry.local_key.as_str() == id
                }) {
                    entry.item.votes = entry.item.votes.saturating_add(1);
                    votes = Some(entry.item.votes);
                }
            })
            .await?;

        if votes.is_none() {
            tracing::debug!("No mirrored nomination with id {id}; mirror unchanged");
        }
        Ok(VoteOutcome {
            acknowledged,
            votes,
        })
    }

    /// Remove every nomination, remotely and from the mirror.
    pub async fn clear(&self) -> Result<()> {
        self.inner.clear(Action::ClearVotes).await
    }

    pub async fn retry_pending(&self) -> Result<RetryReport> {
        self.inner.retry_pending().await
    }
}
