//! Study guide model

use serde::{Deserialize, Serialize};

use super::book::required;
use super::coerce;
use crate::util::normalize_text_option;
use crate::Result;

/// A study guide uploaded for a book.
///
/// There is no file storage behind a guide: `file_url` is whatever transient
/// handle the uploader had, and only the name and size are meaningful later.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyGuide {
    #[serde(default)]
    pub id: Option<String>,
    pub title: String,
    pub book_title: String,
    #[serde(default)]
    pub file_url: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
    /// File size in bytes
    #[serde(default)]
    pub file_size: Option<u64>,
    #[serde(default)]
    pub uploaded_at: Option<String>,
}

/// User-submitted fields for a new study guide
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewStudyGuide {
    pub title: String,
    pub book_title: String,
    pub file_url: Option<String>,
    pub file_name: Option<String>,
    pub file_size: Option<u64>,
}

impl NewStudyGuide {
    pub fn into_guide(self, uploaded_at: String) -> Result<StudyGuide> {
        Ok(StudyGuide {
            id: None,
            title: required(self.title, "title")?,
            book_title: required(self.book_title, "book title")?,
            file_url: normalize_text_option(self.file_url),
            file_name: normalize_text_option(self.file_name),
            file_size: self.file_size,
            uploaded_at: Some(uploaded_at),
        })
    }
}

/// Row shape of the remote `study_guides` sheet
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StudyGuideRow {
    #[serde(default, deserialize_with = "coerce::opt_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "coerce::string")]
    pub title: String,
    #[serde(default, deserialize_with = "coerce::string")]
    pub book_title: String,
    #[serde(default, deserialize_with = "coerce::opt_string")]
    pub file_url: Option<String>,
    #[serde(default, deserialize_with = "coerce::opt_string")]
    pub file_name: Option<String>,
    #[serde(default, deserialize_with = "coerce::opt_u64")]
    pub file_size: Option<u64>,
    #[serde(default, deserialize_with = "coerce::opt_string")]
    pub uploaded_at: Option<String>,
}

impl From<StudyGuideRow> for StudyGuide {
    fn from(row: StudyGuideRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            book_title: row.book_title,
            file_url: row.file_url,
            file_name: row.file_name,
            file_size: row.file_size,
            uploaded_at: row.uploaded_at,
        }
    }
}

impl From<&StudyGuide> for StudyGuideRow {
    fn from(guide: &StudyGuide) -> Self {
        Self {
            id: guide.id.clone(),
            title: guide.title.clone(),
            book_title: guide.book_title.clone(),
            file_url: guide.file_url.clone(),
            file_name: guide.file_name.clone(),
            file_size: guide.file_size,
            uploaded_at: guide.uploaded_at.clone(),
        }
    }
}

/// Human-readable file size, e.g. `1.5 MB`.
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    #[allow(clippy::cast_precision_loss)]
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{size:.1} {}", UNITS[unit])
    }
}
