use bookclub_core::models::NewBook;
use bookclub_core::{BookClub, RemoteStore};

use crate::cli::BookCommands;
use crate::commands::common::{entry_id, format_book_lines, print_json, require_admin};
use crate::error::CliError;

pub async fn run_books<R: RemoteStore>(
    club: &BookClub<R>,
    command: BookCommands,
) -> Result<(), CliError> {
    match command {
        BookCommands::List { json } => run_list(club, json).await,
        BookCommands::Add {
            title,
            author,
            cover_url,
            date_read,
            rating,
            notes,
            member,
        } => {
            let draft = NewBook {
                title,
                author,
                cover_url,
                date_read,
                rating,
                notes,
                is_member: member,
            };
            run_add(club, draft).await
        }
        BookCommands::Delete { id } => run_delete(club, &id).await,
    }
}

async fn run_list<R: RemoteStore>(club: &BookClub<R>, as_json: bool) -> Result<(), CliError> {
    let books = club.books().list().await?;
    if as_json {
        return print_json(&books);
    }
    if books.is_empty() {
        println!("No books yet");
    }
    for line in format_book_lines(&books) {
        println!("{line}");
    }
    Ok(())
}

pub async fn run_add<R: RemoteStore>(club: &BookClub<R>, draft: NewBook) -> Result<(), CliError> {
    let session = club.profiles().current_user().await?;
    let entry = club.books().create(&session, draft).await?;
    if entry.is_pending() {
        println!("{} (pending)", entry_id(&entry));
    } else {
        println!("{}", entry_id(&entry));
    }
    Ok(())
}

pub async fn run_delete<R: RemoteStore>(club: &BookClub<R>, id: &str) -> Result<(), CliError> {
    let session = club.profiles().current_user().await?;
    require_admin(club, &session).await?;

    if club.books().delete(id).await?.handled() {
        println!("{}", id.trim());
        Ok(())
    } else {
        Err(CliError::NotFound(id.trim().to_string()))
    }
}
