use std::path::Path;

use bookclub_core::models::NewStudyGuide;
use bookclub_core::{BookClub, RemoteStore};

use crate::cli::GuideCommands;
use crate::commands::common::{
    entry_id, format_guide_lines, guide_file, print_json, require_admin,
};
use crate::error::CliError;

pub async fn run_guides<R: RemoteStore>(
    club: &BookClub<R>,
    command: GuideCommands,
) -> Result<(), CliError> {
    match command {
        GuideCommands::List { json } => {
            let guides = club.guides().list().await?;
            if json {
                return print_json(&guides);
            }
            if guides.is_empty() {
                println!("No study guides yet");
            }
            for line in format_guide_lines(&guides) {
                println!("{line}");
            }
            Ok(())
        }
        GuideCommands::Add {
            title,
            book_title,
            file,
        } => run_add(club, title, book_title, file.as_deref()).await,
        GuideCommands::Delete { id } => {
            let session = club.profiles().current_user().await?;
            require_admin(club, &session).await?;
            if club.guides().delete(&id).await?.handled() {
                println!("{}", id.trim());
                Ok(())
            } else {
                Err(CliError::NotFound(id.trim().to_string()))
            }
        }
    }
}

pub async fn run_add<R: RemoteStore>(
    club: &BookClub<R>,
    title: String,
    book_title: String,
    file: Option<&Path>,
) -> Result<(), CliError> {
    let (file_name, file_size) = match file {
        Some(path) => {
            let (name, size) = guide_file(path)?;
            (Some(name), Some(size))
        }
        None => (None, None),
    };

    let entry = club
        .guides()
        .create(NewStudyGuide {
            title,
            book_title,
            file_url: None,
            file_name,
            file_size,
        })
        .await?;
    println!("{}", entry_id(&entry));
    Ok(())
}
