use bookclub_core::{BookClub, RemoteStore};

use crate::cli::GenreCommands;
use crate::commands::common::{format_genre_lines, format_history_lines, print_json, require_admin};
use crate::error::CliError;

pub async fn run_genres<R: RemoteStore>(
    club: &BookClub<R>,
    command: GenreCommands,
) -> Result<(), CliError> {
    match command {
        GenreCommands::List { json } => {
            let genres = club.genres().list().await?;
            if json {
                return print_json(&genres);
            }
            for line in format_genre_lines(&genres) {
                println!("{line}");
            }
        }
        GenreCommands::Vote { name } => {
            let session = club.profiles().current_user().await?;
            if !session.has_email() {
                return Err(CliError::MissingEmail);
            }
            let votes = club.genres().increment(&session, &name).await?;
            println!("{votes}");
        }
        GenreCommands::Reset => {
            let session = club.profiles().current_user().await?;
            require_admin(club, &session).await?;
            club.genres().reset().await?;
            println!("Reset all genre votes");
        }
        GenreCommands::History { email } => {
            let email = match email {
                Some(email) => email,
                None => {
                    let session = club.profiles().current_user().await?;
                    if !session.has_email() {
                        return Err(CliError::MissingEmail);
                    }
                    session.email
                }
            };
            let history = club.genres().history(&email).await?;
            if history.is_empty() {
                println!("No genre votes for {email}");
            }
            for line in format_history_lines(&history) {
                println!("{line}");
            }
        }
    }
    Ok(())
}
