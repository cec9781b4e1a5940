//! Column schemas of the remote spreadsheet collections.
//!
//! The remote script finds columns by header name, so these lists are the
//! contract shared with it. [`validate_all`] checks at startup that the row
//! types the adapters send and receive match these lists exactly.

use std::collections::BTreeSet;

use serde::Serialize;
use serde_json::Value;

use crate::models::{
    BookRow, GenreHistoryRow, GenreVoteRow, StudyGuideRow, UserRow, VotingOptionRow,
};
use crate::{Error, Result};

/// Cell type of a sheet column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Number,
    Flag,
    /// Non-negative vote counter
    Count,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub kind: ColumnKind,
}

const fn col(name: &'static str, kind: ColumnKind) -> Column {
    Column { name, kind }
}

/// Ordered column list of one sheet. The first column is the row key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetSchema {
    pub sheet: &'static str,
    pub columns: &'static [Column],
}

use ColumnKind::{Count, Flag, Number, Text};

pub const BOOKS: SheetSchema = SheetSchema {
    sheet: "books",
    columns: &[
        col("id", Text),
        col("title", Text),
        col("author", Text),
        col("cover_url", Text),
        col("date_read", Text),
        col("rating", Number),
        col("notes", Text),
        col("added_by", Text),
        col("is_member", Flag),
        col("created_at", Text),
    ],
};

pub const STUDY_GUIDES: SheetSchema = SheetSchema {
    sheet: "study_guides",
    columns: &[
        col("id", Text),
        col("title", Text),
        col("book_title", Text),
        col("file_url", Text),
        col("file_name", Text),
        col("file_size", Number),
        col("uploaded_at", Text),
    ],
};

pub const VOTING_OPTIONS: SheetSchema = SheetSchema {
    sheet: "voting_options",
    columns: &[
        col("id", Text),
        col("book_title", Text),
        col("author", Text),
        col("suggested_by", Text),
        col("is_member", Flag),
        col("votes", Count),
        col("created_at", Text),
    ],
};

pub const GENRE_VOTES: SheetSchema = SheetSchema {
    sheet: "genre_votes",
    columns: &[col("id", Text), col("name", Text), col("votes", Count)],
};

pub const USERS: SheetSchema = SheetSchema {
    sheet: "users",
    columns: &[
        col("email", Text),
        col("name", Text),
        col("is_admin", Flag),
        col("last_active", Text),
    ],
};

pub const USER_GENRE_HISTORY: SheetSchema = SheetSchema {
    sheet: "user_genre_history",
    columns: &[
        col("email", Text),
        col("genre_name", Text),
        col("voted_at", Text),
    ],
};

impl SheetSchema {
    /// Column the remote script uses to locate a row
    pub const fn key_column(&self) -> &Column {
        &self.columns[0]
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name == name)
    }

    /// Check a row type serializes to exactly this schema's columns, with
    /// cell types compatible with each column kind.
    pub fn validate_row<R: Serialize + Default>(&self) -> Result<()> {
        let mut seen = BTreeSet::new();
        for column in self.columns {
            if !seen.insert(column.name) {
                return Err(self.error(format!("duplicate column '{}'", column.name)));
            }
        }

        let Value::Object(sample) = serde_json::to_value(R::default())? else {
            return Err(self.error("row type does not serialize to an object".to_string()));
        };

        let row_keys = sample.keys().map(String::as_str).collect::<BTreeSet<_>>();
        if row_keys != seen {
            let missing = seen.difference(&row_keys).copied().collect::<Vec<_>>();
            let extra = row_keys.difference(&seen).copied().collect::<Vec<_>>();
            return Err(self.error(format!(
                "row fields differ from columns (missing: [{}], unexpected: [{}])",
                missing.join(", "),
                extra.join(", ")
            )));
        }

        for column in self.columns {
            let cell = &sample[column.name];
            let compatible = match column.kind {
                Text => cell.is_string() || cell.is_null(),
                Number => cell.is_number() || cell.is_null(),
                Flag => cell.is_boolean(),
                Count => cell.is_u64(),
            };
            if !compatible {
                return Err(self.error(format!(
                    "column '{}' expects {:?} but row holds {cell}",
                    column.name, column.kind
                )));
            }
        }

        Ok(())
    }

    fn error(&self, message: String) -> Error {
        Error::Schema(format!("{}: {message}", self.sheet))
    }
}

/// Validate every collection schema against its row type.
pub fn validate_all() -> Result<()> {
    BOOKS.validate_row::<BookRow>()?;
    STUDY_GUIDES.validate_row::<StudyGuideRow>()?;
    VOTING_OPTIONS.validate_row::<VotingOptionRow>()?;
    GENRE_VOTES.validate_row::<GenreVoteRow>()?;
    USERS.validate_row::<UserRow>()?;
    USER_GENRE_HISTORY.validate_row::<GenreHistoryRow>()?;

    for schema in [VOTING_OPTIONS, GENRE_VOTES] {
        if schema.column("votes").map(|column| column.kind) != Some(Count) {
            return Err(schema.error("missing 'votes' counter column".to_string()));
        }
    }
    Ok(())
}
