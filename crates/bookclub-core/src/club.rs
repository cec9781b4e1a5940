//! Entry point tying the remote store, local mirror and adapters together.

use std::path::Path;

use crate::adapters::{Books, Genres, Guides, Profiles, RetryReport, Voting};
use crate::config::ClubConfig;
use crate::db::LocalMirror;
use crate::gateway::{RemoteStore, ScriptGateway};
use crate::{schema, Result};

/// The book club store: one remote endpoint plus its local mirror.
pub struct BookClub<R = ScriptGateway> {
    remote: R,
    mirror: LocalMirror,
    master_admin_email: Option<String>,
}

impl BookClub<ScriptGateway> {
    /// Open the store described by `config`, with the mirror at `mirror_path`.
    ///
    /// Row schemas are checked before anything touches the network.
    pub async fn open(config: &ClubConfig, mirror_path: impl AsRef<Path>) -> Result<Self> {
        schema::validate_all()?;

        match config.script_url.as_deref() {
            Some(url) => tracing::info!("Using remote store at {url}"),
            None => tracing::info!("Running in local-only mode (no script endpoint)"),
        }

        let remote = ScriptGateway::new(config.script_url.clone())?;
        let mirror = LocalMirror::open(mirror_path).await?;
        Ok(Self::new(remote, mirror, config.master_admin_email.clone()))
    }
}

impl<R: RemoteStore> BookClub<R> {
    pub const fn new(remote: R, mirror: LocalMirror, master_admin_email: Option<String>) -> Self {
        Self {
            remote,
            mirror,
            master_admin_email,
        }
    }

    pub const fn remote(&self) -> &R {
        &self.remote
    }

    pub const fn books(&self) -> Books<'_, R> {
        Books::new(&self.remote, &self.mirror)
    }

    pub const fn guides(&self) -> Guides<'_, R> {
        Guides::new(&self.remote, &self.mirror)
    }

    pub const fn voting(&self) -> Voting<'_, R> {
        Voting::new(&self.remote, &self.mirror)
    }

    pub const fn genres(&self) -> Genres<'_, R> {
        Genres::new(&self.remote, &self.mirror)
    }

    pub fn profiles(&self) -> Profiles<'_, R> {
        Profiles::new(
            &self.remote,
            &self.mirror,
            self.master_admin_email.as_deref(),
        )
    }

    /// Push pending entries of every creatable collection again.
    pub async fn retry_pending(&self) -> Result<RetryReport> {
        let books = self.books().retry_pending().await?;
        let guides = self.guides().retry_pending().await?;
        let voting = self.voting().retry_pending().await?;
        Ok(books.merge(guides).merge(voting))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use super::*;
    use crate::models::{NewBook, NewStudyGuide, NewVotingOption, Session};
    use crate::test_support::{Availability, FakeSheet};

    fn ann() -> Session {
        Session::new("Ann", "ann@example.com")
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn open_without_endpoint_runs_locally() {
        let tmp = tempdir().unwrap();
        let club = BookClub::open(&ClubConfig::default(), tmp.path().join("mirror.db"))
            .await
            .unwrap();
        assert!(!club.remote().is_configured());

        let entry = club
            .books()
            .create(
                &ann(),
                NewBook {
                    title: "Beloved".to_string(),
                    author: "Toni Morrison".to_string(),
                    ..NewBook::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(entry.item.id, Some(entry.local_key.as_str()));
        assert_eq!(club.books().list().await.unwrap().len(), 1);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn retry_pending_covers_every_collection() {
        let mirror = LocalMirror::open_in_memory().await.unwrap();
        let club = BookClub::new(FakeSheet::offline(), mirror, None);

        club.books()
            .create(
                &ann(),
                NewBook {
                    title: "Beloved".to_string(),
                    author: "Toni Morrison".to_string(),
                    ..NewBook::default()
                },
            )
            .await
            .unwrap();
        club.guides()
            .create(NewStudyGuide {
                title: "Questions".to_string(),
                book_title: "Beloved".to_string(),
                ..NewStudyGuide::default()
            })
            .await
            .unwrap();
        club.voting()
            .suggest(
                &ann(),
                NewVotingOption {
                    book_title: "Dune".to_string(),
                    author: "Herbert".to_string(),
                    is_member: false,
                },
            )
            .await
            .unwrap();

        club.remote().set_availability(Availability::Online);
        let report = club.retry_pending().await.unwrap();
        assert_eq!(
            report,
            RetryReport {
                confirmed: 3,
                still_pending: 0,
                rejected: 0,
            }
        );
        assert_eq!(club.retry_pending().await.unwrap(), RetryReport::default());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn master_admin_is_passed_to_profiles() {
        let mirror = LocalMirror::open_in_memory().await.unwrap();
        let club = BookClub::new(
            FakeSheet::unconfigured(),
            mirror,
            Some("ann@example.com".to_string()),
        );
        assert!(club.profiles().is_admin(&ann()).await);
    }
}
