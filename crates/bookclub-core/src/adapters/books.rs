//! Reading list adapter

use super::collection::{Collection, CollectionAdapter, Deletion, Placement, RetryReport};
use crate::db::{LocalMirror, MirrorKey};
use crate::gateway::{Action, RemoteStore};
use crate::models::{Book, BookRow, Entry, NewBook, Session};
use crate::util::rfc3339_now;
use crate::Result;

impl Collection for Book {
    type Row = BookRow;

    const MIRROR_KEY: MirrorKey = MirrorKey::Books;
    const READ: Action = Action::GetBooks;
    const SAVE: Action = Action::SaveBook;
    const PLACEMENT: Placement = Placement::Prepend;

    fn from_row(row: BookRow) -> Self {
        row.into()
    }

    fn to_row(&self) -> BookRow {
        self.into()
    }

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_id(&mut self, id: String) {
        self.id = Some(id);
    }
}

/// Books on the reading list
pub struct Books<'a, R> {
    inner: CollectionAdapter<'a, R, Book>,
}

impl<'a, R: RemoteStore> Books<'a, R> {
    pub const fn new(remote: &'a R, mirror: &'a LocalMirror) -> Self {
        Self {
            inner: CollectionAdapter::new(remote, mirror),
        }
    }

    pub async fn list(&self) -> Result<Vec<Entry<Book>>> {
        self.inner.list().await
    }

    /// Add a book attributed to the session's member.
    pub async fn create(&self, session: &Session, draft: NewBook) -> Result<Entry<Book>> {
        let book = draft.into_book(&session.name, rfc3339_now())?;
        self.inner.create(book).await
    }

    pub async fn delete(&self, id: &str) -> Result<Deletion> {
        self.inner.delete(Action::DeleteBook, id).await
    }

    pub async fn retry_pending(&self) -> Result<RetryReport> {
        self.inner.retry_pending().await
    }
}
