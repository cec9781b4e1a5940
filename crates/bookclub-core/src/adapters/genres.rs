//! Genre tally adapter
//!
//! Unlike the other collections, genre tallies are never created by members:
//! the eight canonical genres always exist, and reads overlay whatever counts
//! the remote sheet or mirror holds onto that fixed list.

use serde_json::json;

use super::collection::decode_rows;
use crate::db::{LocalMirror, MirrorKey};
use crate::gateway::{Action, RemoteStore};
use crate::models::{
    canonical_genre, canonicalize, GenreHistoryRecord, GenreHistoryRow, GenreVote, GenreVoteRow,
    Session, GENRES,
};
use crate::util::{emails_match, rfc3339_now};
use crate::{Error, Result};

pub struct Genres<'a, R> {
    remote: &'a R,
    mirror: &'a LocalMirror,
}

impl<'a, R: RemoteStore> Genres<'a, R> {
    pub const fn new(remote: &'a R, mirror: &'a LocalMirror) -> Self {
        Self { remote, mirror }
    }

    /// Current tallies for the canonical genres, in canonical order.
    pub async fn list(&self) -> Result<Vec<GenreVote>> {
        match self.remote.call(Action::GetGenreVotes, None).await {
            Ok(Some(value)) => {
                let retrieved = decode_rows::<GenreVoteRow>(Action::GetGenreVotes, value)
                    .into_iter()
                    .map(GenreVote::from)
                    .collect::<Vec<_>>();
                let genres = canonicalize(&retrieved);
                self.mirror.store_list(MirrorKey::GenreVotes, &genres).await?;
                Ok(genres)
            }
            Ok(None) => self.mirrored().await,
            Err(error) => {
                tracing::error!(action = %Action::GetGenreVotes, "Remote read failed: {error}");
                Ok(canonicalize(&[]))
            }
        }
    }

    /// Record one vote for `name` by the session's member.
    ///
    /// Returns the mirrored tally for that genre after the vote.
    pub async fn increment(&self, session: &Session, name: &str) -> Result<u64> {
        if !session.has_email() {
            return Err(Error::InvalidInput(
                "an email is required to vote for a genre".to_string(),
            ));
        }
        let Some(genre) = canonical_genre(name) else {
            return Err(Error::InvalidInput(format!(
                "'{}' is not one of: {}",
                name.trim(),
                GENRES.join(", ")
            )));
        };

        let record = GenreHistoryRecord {
            email: session.email.clone(),
            genre_name: genre.to_string(),
            voted_at: rfc3339_now(),
        };
        let payload = json!({
            "id": genre,
            "name": genre,
            "email": record.email,
            "voted_at": record.voted_at,
        });
        if let Err(error) = self.remote.call(Action::VoteGenre, Some(payload)).await {
            tracing::error!(action = %Action::VoteGenre, "Genre vote rejected: {error}");
            return Err(error);
        }

        let mut genres = self.mirrored().await?;
        let mut votes = 0;
        if let Some(tally) = genres.iter_mut().find(|tally| tally.id == genre) {
            tally.votes = tally.votes.saturating_add(1);
            votes = tally.votes;
        }
        self.mirror.store_list(MirrorKey::GenreVotes, &genres).await?;

        let mut history = self.mirrored_history().await?;
        history.push(record);
        self.mirror
            .store_list(MirrorKey::GenreHistory, &history)
            .await?;

        Ok(votes)
    }

    /// Zero every tally and forget the vote history.
    pub async fn reset(&self) -> Result<Vec<GenreVote>> {
        if let Err(error) = self.remote.call(Action::ResetGenreVotes, None).await {
            tracing::error!(action = %Action::ResetGenreVotes, "Remote write failed: {error}");
        }

        let genres = canonicalize(&[]);
        self.mirror.store_list(MirrorKey::GenreVotes, &genres).await?;
        self.mirror
            .store_list::<GenreHistoryRecord>(MirrorKey::GenreHistory, &[])
            .await?;
        Ok(genres)
    }

    /// Genre votes cast by `email`, oldest first.
    pub async fn history(&self, email: &str) -> Result<Vec<GenreHistoryRecord>> {
        let email = email.trim();
        if email.is_empty() {
            return Ok(Vec::new());
        }

        let payload = json!({ "email": email });
        match self.remote.call(Action::GetUserHistory, Some(payload)).await {
            Ok(Some(value)) => {
                let records = decode_rows::<GenreHistoryRow>(Action::GetUserHistory, value)
                    .into_iter()
                    .map(GenreHistoryRecord::from)
                    .collect::<Vec<_>>();

                // Replace this member's slice of the mirrored history
                let mut history = self.mirrored_history().await?;
                history.retain(|record| !emails_match(&record.email, email));
                history.extend(records.iter().cloned());
                self.mirror
                    .store_list(MirrorKey::GenreHistory, &history)
                    .await?;
                Ok(records)
            }
            Ok(None) => Ok(self
                .mirrored_history()
                .await?
                .into_iter()
                .filter(|record| emails_match(&record.email, email))
                .collect()),
            Err(error) => {
                tracing::error!(action = %Action::GetUserHistory, "Remote read failed: {error}");
                Ok(Vec::new())
            }
        }
    }

    async fn mirrored(&self) -> Result<Vec<GenreVote>> {
        let stored: Vec<GenreVote> = self.mirror.load_list(MirrorKey::GenreVotes).await?;
        Ok(canonicalize(&stored))
    }

    async fn mirrored_history(&self) -> Result<Vec<GenreHistoryRecord>> {
        self.mirror.load_list(MirrorKey::GenreHistory).await
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::test_support::FakeSheet;

    fn ann() -> Session {
        Session::new("Ann", "ann@example.com")
    }

    fn names(genres: &[GenreVote]) -> Vec<&str> {
        genres.iter().map(|genre| genre.name.as_str()).collect()
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn list_always_returns_the_canonical_genres() {
        let sheet = FakeSheet::online();
        sheet.seed("genre_votes", json!({"id": "Romance", "name": "Romance", "votes": "3"}));
        sheet.seed("genre_votes", json!({"id": "Poetry", "name": "Poetry", "votes": "9"}));
        let mirror = LocalMirror::open_in_memory().await.unwrap();

        let genres = Genres::new(&sheet, &mirror).list().await.unwrap();
        assert_eq!(names(&genres), GENRES.to_vec());
        assert_eq!(genres[5].votes, 3);
        assert_eq!(genres.iter().map(|genre| genre.votes).sum::<u64>(), 3);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn list_without_any_data_is_eight_zeroes() {
        for sheet in [FakeSheet::online(), FakeSheet::offline(), FakeSheet::unconfigured()] {
            let mirror = LocalMirror::open_in_memory().await.unwrap();
            let genres = Genres::new(&sheet, &mirror).list().await.unwrap();
            assert_eq!(names(&genres), GENRES.to_vec());
            assert!(genres.iter().all(|genre| genre.votes == 0));
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn rejected_read_returns_zeroed_genres() {
        let sheet = FakeSheet::online();
        sheet.seed("genre_votes", json!({"id": "Fantasy", "votes": 2}));
        sheet.reject(Action::GetGenreVotes);
        let mirror = LocalMirror::open_in_memory().await.unwrap();

        let genres = Genres::new(&sheet, &mirror).list().await.unwrap();
        assert_eq!(genres.len(), 8);
        assert!(genres.iter().all(|genre| genre.votes == 0));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn increment_twice_counts_two_votes() {
        let sheet = FakeSheet::online();
        let mirror = LocalMirror::open_in_memory().await.unwrap();
        let genres = Genres::new(&sheet, &mirror);

        genres.increment(&ann(), "fantasy").await.unwrap();
        assert_eq!(genres.increment(&ann(), "Fantasy").await.unwrap(), 2);

        let listed = genres.list().await.unwrap();
        assert_eq!(listed[4].name, "Fantasy");
        assert_eq!(listed[4].votes, 2);
        assert_eq!(sheet.rows("user_genre_history").len(), 2);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn increment_sends_canonical_name_and_voter() {
        let sheet = FakeSheet::online();
        let mirror = LocalMirror::open_in_memory().await.unwrap();

        Genres::new(&sheet, &mirror)
            .increment(&ann(), "science fiction")
            .await
            .unwrap();

        let payload = sheet.last_payload(Action::VoteGenre).unwrap();
        assert_eq!(payload["id"], json!("Science Fiction"));
        assert_eq!(payload["name"], json!("Science Fiction"));
        assert_eq!(payload["email"], json!("ann@example.com"));
        assert!(payload["voted_at"].is_string());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn increment_requires_email_and_known_genre() {
        let sheet = FakeSheet::online();
        let mirror = LocalMirror::open_in_memory().await.unwrap();
        let genres = Genres::new(&sheet, &mirror);

        assert!(genres.increment(&Session::guest(), "Fantasy").await.is_err());
        assert!(genres.increment(&ann(), "Poetry").await.is_err());
        assert!(sheet.calls().is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn rejected_increment_leaves_mirror_unchanged() {
        let sheet = FakeSheet::online();
        sheet.reject(Action::VoteGenre);
        let mirror = LocalMirror::open_in_memory().await.unwrap();
        let genres = Genres::new(&sheet, &mirror);

        assert!(genres.increment(&ann(), "Romance").await.is_err());
        let history: Vec<GenreHistoryRecord> =
            mirror.load_list(MirrorKey::GenreHistory).await.unwrap();
        assert!(history.is_empty());
        let tallies: Vec<GenreVote> = mirror.load_list(MirrorKey::GenreVotes).await.unwrap();
        assert!(tallies.is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn offline_increment_applies_to_mirror() {
        let sheet = FakeSheet::offline();
        let mirror = LocalMirror::open_in_memory().await.unwrap();
        let genres = Genres::new(&sheet, &mirror);

        assert_eq!(genres.increment(&ann(), "Romance").await.unwrap(), 1);
        let listed = genres.list().await.unwrap();
        assert_eq!(listed[5].votes, 1);

        let history = genres.history("ANN@example.com").await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].genre_name, "Romance");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn reset_restores_zeroes_and_empties_history() {
        let sheet = FakeSheet::unconfigured();
        let mirror = LocalMirror::open_in_memory().await.unwrap();
        let genres = Genres::new(&sheet, &mirror);
        genres.increment(&ann(), "Fiction").await.unwrap();
        genres.increment(&ann(), "Fantasy").await.unwrap();

        let reset = genres.reset().await.unwrap();
        assert_eq!(reset, canonicalize(&[]));
        assert_eq!(genres.list().await.unwrap(), reset);

        let history: Vec<GenreHistoryRecord> =
            mirror.load_list(MirrorKey::GenreHistory).await.unwrap();
        assert!(history.is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn history_reads_remote_records_for_the_member() {
        let sheet = FakeSheet::online();
        let mirror = LocalMirror::open_in_memory().await.unwrap();
        let genres = Genres::new(&sheet, &mirror);
        genres.increment(&ann(), "Fiction").await.unwrap();
        genres
            .increment(&Session::new("Bo", "bo@example.com"), "Romance")
            .await
            .unwrap();

        let history = genres.history("ann@example.com").await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].email, "ann@example.com");
        assert_eq!(history[0].genre_name, "Fiction");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn history_for_blank_email_is_empty() {
        let sheet = FakeSheet::online();
        let mirror = LocalMirror::open_in_memory().await.unwrap();
        assert!(Genres::new(&sheet, &mirror)
            .history(" ")
            .await
            .unwrap()
            .is_empty());
        assert!(sheet.calls().is_empty());
    }
}
