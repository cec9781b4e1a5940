//! Study guide adapter

use super::collection::{Collection, CollectionAdapter, Deletion, Placement, RetryReport};
use crate::db::{LocalMirror, MirrorKey};
use crate::gateway::{Action, RemoteStore};
use crate::models::{Entry, NewStudyGuide, StudyGuide, StudyGuideRow};
use crate::util::rfc3339_now;
use crate::Result;

impl Collection for StudyGuide {
    type Row = StudyGuideRow;

    const MIRROR_KEY: MirrorKey = MirrorKey::Guides;
    const READ: Action = Action::GetGuides;
    const SAVE: Action = Action::SaveGuide;
    const PLACEMENT: Placement = Placement::Prepend;

    fn from_row(row: StudyGuideRow) -> Self {
        row.into()
    }

    fn to_row(&self) -> StudyGuideRow {
        self.into()
    }

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_id(&mut self, id: String) {
        self.id = Some(id);
    }
}

pub struct Guides<'a, R> {
    inner: CollectionAdapter<'a, R, StudyGuide>,
}

impl<'a, R: RemoteStore> Guides<'a, R> {
    pub const fn new(remote: &'a R, mirror: &'a LocalMirror) -> Self {
        Self {
            inner: CollectionAdapter::new(remote, mirror),
        }
    }

    pub async fn list(&self) -> Result<Vec<Entry<StudyGuide>>> {
        self.inner.list().await
    }

    pub async fn create(&self, draft: NewStudyGuide) -> Result<Entry<StudyGuide>> {
        let guide = draft.into_guide(rfc3339_now())?;
        self.inner.create(guide).await
    }

    pub async fn delete(&self, id: &str) -> Result<Deletion> {
        self.inner.delete(Action::DeleteGuide, id).await
    }

    pub async fn retry_pending(&self) -> Result<RetryReport> {
        self.inner.retry_pending().await
    }
}
