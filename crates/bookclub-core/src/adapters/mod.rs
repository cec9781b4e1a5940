//! Entity adapters
//!
//! Each adapter maps one collection between its entity shape and the remote
//! row shape, talks to the [`RemoteStore`](crate::gateway::RemoteStore) and
//! keeps the [`LocalMirror`](crate::db::LocalMirror) current.

mod books;
mod collection;
mod genres;
mod guides;
mod profiles;
mod voting;

pub use books::Books;
pub use collection::{
    decode_rows, response_id, Collection, CollectionAdapter, Deletion, Placement,
    RetryReport,
};
pub use genres::Genres;
pub use guides::Guides;
pub use profiles::Profiles;
pub use voting::{VoteOutcome, Voting};
