use std::path::{Path, PathBuf};

use bookclub_core::adapters::Collection;
use bookclub_core::models::{
    format_file_size, Book, GenreHistoryRecord, GenreVote, StudyGuide, VotingOption,
};
use bookclub_core::{BookClub, ClubConfig, Entry, RemoteStore, Session, SyncStatus};
use serde::Serialize;

use crate::error::CliError;

/// Resolve configuration and open the store.
pub async fn open_club(
    mirror_path: Option<PathBuf>,
    endpoint: Option<String>,
) -> Result<BookClub, CliError> {
    let config = ClubConfig::from_env()?.with_script_url(endpoint)?;
    let mirror_path = resolve_mirror_path(mirror_path, &config)?;
    tracing::debug!("Using local mirror at {}", mirror_path.display());
    Ok(BookClub::open(&config, &mirror_path).await?)
}

pub fn resolve_mirror_path(
    cli_mirror_path: Option<PathBuf>,
    config: &ClubConfig,
) -> Result<PathBuf, CliError> {
    match cli_mirror_path.or_else(|| config.mirror_path.clone()) {
        Some(path) => Ok(path),
        None => default_mirror_path(),
    }
}

pub fn default_mirror_path() -> Result<PathBuf, CliError> {
    dirs::data_dir()
        .map(|dir| dir.join("bookclub").join("mirror.db"))
        .ok_or_else(|| CliError::Config("Failed to resolve CLI data directory".to_string()))
}

/// Fail unless the session's member is an admin.
pub async fn require_admin<R: RemoteStore>(
    club: &BookClub<R>,
    session: &Session,
) -> Result<(), CliError> {
    if club.profiles().is_admin(session).await {
        Ok(())
    } else if session.has_email() {
        Err(CliError::NotAdmin(session.email.clone()))
    } else {
        Err(CliError::NotAdmin(session.name.clone()))
    }
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Id shown to the user: the remote id, or the local key while pending.
pub fn entry_id<T: Collection>(entry: &Entry<T>) -> String {
    entry
        .item
        .id()
        .map_or_else(|| entry.local_key.as_str(), ToString::to_string)
}

fn sync_marker<T>(entry: &Entry<T>) -> &'static str {
    match entry.status {
        SyncStatus::Pending => " (pending)",
        SyncStatus::Local => " (local)",
        SyncStatus::Confirmed => "",
    }
}

fn member_marker(is_member: bool) -> &'static str {
    if is_member {
        " [member]"
    } else {
        ""
    }
}

pub fn format_book_lines(books: &[Entry<Book>]) -> Vec<String> {
    books
        .iter()
        .map(|entry| {
            let book = &entry.item;
            let rating = book
                .rating
                .map(|rating| format!("  {rating:.1}/5"))
                .unwrap_or_default();
            format!(
                "{}  {} by {}{}{}  added by {}{}",
                entry_id(entry),
                book.title,
                book.author,
                member_marker(book.is_member),
                rating,
                book.added_by,
                sync_marker(entry)
            )
        })
        .collect()
}

pub fn format_guide_lines(guides: &[Entry<StudyGuide>]) -> Vec<String> {
    guides
        .iter()
        .map(|entry| {
            let guide = &entry.item;
            let file = match (&guide.file_name, guide.file_size) {
                (Some(name), Some(size)) => format!("  {name} ({})", format_file_size(size)),
                (Some(name), None) => format!("  {name}"),
                _ => String::new(),
            };
            format!(
                "{}  {} for {}{}{}",
                entry_id(entry),
                guide.title,
                guide.book_title,
                file,
                sync_marker(entry)
            )
        })
        .collect()
}

pub fn format_vote_lines(options: &[Entry<VotingOption>]) -> Vec<String> {
    options
        .iter()
        .map(|entry| {
            let option = &entry.item;
            format!(
                "{}  {:>3} votes  {} by {}{}  suggested by {}{}",
                entry_id(entry),
                option.votes,
                option.book_title,
                option.author,
                member_marker(option.is_member),
                option.suggested_by,
                sync_marker(entry)
            )
        })
        .collect()
}

pub fn format_genre_lines(genres: &[GenreVote]) -> Vec<String> {
    genres
        .iter()
        .map(|genre| format!("{:>3}  {}", genre.votes, genre.name))
        .collect()
}

pub fn format_history_lines(history: &[GenreHistoryRecord]) -> Vec<String> {
    history
        .iter()
        .map(|record| format!("{}  {}", record.voted_at, record.genre_name))
        .collect()
}

/// Name and size of a local study guide file
pub fn guide_file(path: &Path) -> Result<(String, u64), CliError> {
    let metadata = std::fs::metadata(path)?;
    if !metadata.is_file() {
        return Err(CliError::Config(format!("{} is not a file", path.display())));
    }
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| CliError::Config(format!("{} has no file name", path.display())))?;
    Ok((name, metadata.len()))
}
