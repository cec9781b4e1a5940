//! Reading list book model

use serde::{Deserialize, Serialize};

use super::coerce;
use crate::util::normalize_text_option;
use crate::{Error, Result};

/// A book on the club's reading list
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Identifier assigned by the remote store
    #[serde(default)]
    pub id: Option<String>,
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub cover_url: Option<String>,
    #[serde(default)]
    pub date_read: Option<String>,
    /// Club rating, usually 0-5
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
    /// Display name of the member who added the book
    pub added_by: String,
    #[serde(default)]
    pub is_member: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// User-submitted fields for a new book
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub cover_url: Option<String>,
    pub date_read: Option<String>,
    pub rating: Option<f64>,
    pub notes: Option<String>,
    pub is_member: bool,
}

impl NewBook {
    /// Validate the draft and attribute it to `added_by`.
    pub fn into_book(self, added_by: &str, created_at: String) -> Result<Book> {
        let title = required(self.title, "title")?;
        let author = required(self.author, "author")?;
        if let Some(rating) = self.rating {
            if !(0.0..=5.0).contains(&rating) {
                return Err(Error::InvalidInput(format!(
                    "rating must be between 0 and 5, got {rating}"
                )));
            }
        }

        Ok(Book {
            id: None,
            title,
            author,
            cover_url: normalize_text_option(self.cover_url),
            date_read: normalize_text_option(self.date_read),
            rating: self.rating,
            notes: normalize_text_option(self.notes),
            added_by: added_by.trim().to_string(),
            is_member: self.is_member,
            created_at: Some(created_at),
        })
    }
}

/// Row shape of the remote `books` sheet
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BookRow {
    #[serde(default, deserialize_with = "coerce::opt_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "coerce::string")]
    pub title: String,
    #[serde(default, deserialize_with = "coerce::string")]
    pub author: String,
    #[serde(default, deserialize_with = "coerce::opt_string")]
    pub cover_url: Option<String>,
    #[serde(default, deserialize_with = "coerce::opt_string")]
    pub date_read: Option<String>,
    #[serde(default, deserialize_with = "coerce::opt_f64")]
    pub rating: Option<f64>,
    #[serde(default, deserialize_with = "coerce::opt_string")]
    pub notes: Option<String>,
    #[serde(default, deserialize_with = "coerce::string")]
    pub added_by: String,
    #[serde(default, deserialize_with = "coerce::flag")]
    pub is_member: bool,
    #[serde(default, deserialize_with = "coerce::opt_string")]
    pub created_at: Option<String>,
}

impl From<BookRow> for Book {
    fn from(row: BookRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            author: row.author,
            cover_url: row.cover_url,
            date_read: row.date_read,
            rating: row.rating,
            notes: row.notes,
            added_by: row.added_by,
            is_member: row.is_member,
            created_at: row.created_at,
        }
    }
}

impl From<&Book> for BookRow {
    fn from(book: &Book) -> Self {
        Self {
            id: book.id.clone(),
            title: book.title.clone(),
            author: book.author.clone(),
            cover_url: book.cover_url.clone(),
            date_read: book.date_read.clone(),
            rating: book.rating,
            notes: book.notes.clone(),
            added_by: book.added_by.clone(),
            is_member: book.is_member,
            created_at: book.created_at.clone(),
        }
    }
}

pub(crate) fn required(value: String, field: &str) -> Result<String> {
    normalize_text_option(Some(value))
        .ok_or_else(|| Error::InvalidInput(format!("{field} is required")))
}
