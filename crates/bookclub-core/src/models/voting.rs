//! Voting option (book nomination) model

use serde::{Deserialize, Serialize};

use super::book::required;
use super::coerce;
use crate::Result;

/// A book nominated for the next club read
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VotingOption {
    #[serde(default)]
    pub id: Option<String>,
    pub book_title: String,
    pub author: String,
    pub suggested_by: String,
    #[serde(default)]
    pub is_member: bool,
    #[serde(default)]
    pub votes: u64,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// User-submitted fields for a nomination
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewVotingOption {
    pub book_title: String,
    pub author: String,
    pub is_member: bool,
}

impl NewVotingOption {
    /// Validate the draft; every nomination starts with zero votes.
    pub fn into_option(self, suggested_by: &str, created_at: String) -> Result<VotingOption> {
        Ok(VotingOption {
            id: None,
            book_title: required(self.book_title, "book title")?,
            author: required(self.author, "author")?,
            suggested_by: suggested_by.trim().to_string(),
            is_member: self.is_member,
            votes: 0,
            created_at: Some(created_at),
        })
    }
}

/// Row shape of the remote `voting_options` sheet
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VotingOptionRow {
    #[serde(default, deserialize_with = "coerce::opt_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "coerce::string")]
    pub book_title: String,
    #[serde(default, deserialize_with = "coerce::string")]
    pub author: String,
    #[serde(default, deserialize_with = "coerce::string")]
    pub suggested_by: String,
    #[serde(default, deserialize_with = "coerce::flag")]
    pub is_member: bool,
    #[serde(default, deserialize_with = "coerce::count")]
    pub votes: u64,
    #[serde(default, deserialize_with = "coerce::opt_string")]
    pub created_at: Option<String>,
}

impl From<VotingOptionRow> for VotingOption {
    fn from(row: VotingOptionRow) -> Self {
        Self {
            id: row.id,
            book_title: row.book_title,
            author: row.author,
            suggested_by: row.suggested_by,
            is_member: row.is_member,
            votes: row.votes,
            created_at: row.created_at,
        }
    }
}

impl From<&VotingOption> for VotingOptionRow {
    fn from(option: &VotingOption) -> Self {
        Self {
            id: option.id.clone(),
            book_title: option.book_title.clone(),
            author: option.author.clone(),
            suggested_by: option.suggested_by.clone(),
            is_member: option.is_member,
            votes: option.votes,
            created_at: option.created_at.clone(),
        }
    }
}
