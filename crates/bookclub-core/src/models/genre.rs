//! Genre tally and per-user genre vote history

use serde::{Deserialize, Serialize};

use super::coerce;

/// The fixed set of genres members can vote on, in display order.
pub const GENRES: [&str; 8] = [
    "Fiction",
    "Non-Fiction",
    "Mystery & Thriller",
    "Science Fiction",
    "Fantasy",
    "Romance",
    "Biography & Memoir",
    "Historical Fiction",
];

/// Vote tally for one genre. The id is the genre name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenreVote {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub votes: u64,
}

impl GenreVote {
    pub fn zeroed(name: &str) -> Self {
        Self {
            id: name.to_string(),
            name: name.to_string(),
            votes: 0,
        }
    }
}

/// Row shape of the remote `genre_votes` sheet
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GenreVoteRow {
    #[serde(default, deserialize_with = "coerce::string")]
    pub id: String,
    #[serde(default, deserialize_with = "coerce::opt_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "coerce::count")]
    pub votes: u64,
}

impl From<GenreVoteRow> for GenreVote {
    fn from(row: GenreVoteRow) -> Self {
        let name = row.name.unwrap_or_else(|| row.id.clone());
        Self {
            id: row.id,
            name,
            votes: row.votes,
        }
    }
}

/// Resolve user input to the canonical genre name, case-insensitively.
pub fn canonical_genre(name: &str) -> Option<&'static str> {
    let name = name.trim();
    GENRES
        .iter()
        .copied()
        .find(|genre| genre.eq_ignore_ascii_case(name))
}

/// Overlay retrieved tallies onto the canonical genre list.
///
/// The result always holds exactly the canonical genres in canonical order.
/// Missing genres get zero votes; unknown ids are dropped.
pub fn canonicalize(retrieved: &[GenreVote]) -> Vec<GenreVote> {
    GENRES
        .iter()
        .map(|genre| {
            let votes = retrieved
                .iter()
                .find(|vote| vote.id.trim().eq_ignore_ascii_case(genre))
                .map_or(0, |vote| vote.votes);
            GenreVote {
                votes,
                ..GenreVote::zeroed(genre)
            }
        })
        .collect()
}

/// One genre vote cast by a member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenreHistoryRecord {
    pub email: String,
    pub genre_name: String,
    pub voted_at: String,
}

/// Row shape of the remote `user_genre_history` sheet
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GenreHistoryRow {
    #[serde(default, deserialize_with = "coerce::string")]
    pub email: String,
    #[serde(default, deserialize_with = "coerce::string")]
    pub genre_name: String,
    #[serde(default, deserialize_with = "coerce::string")]
    pub voted_at: String,
}

impl From<GenreHistoryRow> for GenreHistoryRecord {
    fn from(row: GenreHistoryRow) -> Self {
        Self {
            email: row.email,
            genre_name: row.genre_name,
            voted_at: row.voted_at,
        }
    }
}
