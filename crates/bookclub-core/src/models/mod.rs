//! Data models for the book club

mod book;
pub mod coerce;
mod entry;
mod genre;
mod guide;
mod user;
mod voting;

pub use book::{Book, BookRow, NewBook};
pub use entry::{Entry, LocalKey, SyncStatus};
pub use genre::{
    canonical_genre, canonicalize, GenreHistoryRecord, GenreHistoryRow, GenreVote, GenreVoteRow,
    GENRES,
};
pub use guide::{format_file_size, NewStudyGuide, StudyGuide, StudyGuideRow};
pub use user::{is_valid_email, Session, UserRow, GUEST_NAME};
pub use voting::{NewVotingOption, VotingOption, VotingOptionRow};
