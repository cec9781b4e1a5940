use bookclub_core::models::NewVotingOption;
use bookclub_core::{BookClub, RemoteStore};

use crate::cli::VoteCommands;
use crate::commands::common::{entry_id, format_vote_lines, print_json, require_admin};
use crate::error::CliError;

pub async fn run_votes<R: RemoteStore>(
    club: &BookClub<R>,
    command: VoteCommands,
) -> Result<(), CliError> {
    match command {
        VoteCommands::List { json } => {
            let options = club.voting().list().await?;
            if json {
                return print_json(&options);
            }
            if options.is_empty() {
                println!("No nominations yet");
            }
            for line in format_vote_lines(&options) {
                println!("{line}");
            }
            Ok(())
        }
        VoteCommands::Suggest {
            title,
            author,
            member,
        } => {
            let session = club.profiles().current_user().await?;
            let entry = club
                .voting()
                .suggest(
                    &session,
                    NewVotingOption {
                        book_title: title,
                        author,
                        is_member: member,
                    },
                )
                .await?;
            println!("{}", entry_id(&entry));
            Ok(())
        }
        VoteCommands::Vote { id } => {
            let outcome = club.voting().increment(&id).await?;
            match outcome.votes {
                Some(votes) => println!("{votes}"),
                None if outcome.acknowledged => println!("Vote recorded for {}", id.trim()),
                None => return Err(CliError::NotFound(id.trim().to_string())),
            }
            Ok(())
        }
        VoteCommands::Clear => {
            let session = club.profiles().current_user().await?;
            require_admin(club, &session).await?;
            club.voting().clear().await?;
            println!("Cleared all nominations");
            Ok(())
        }
    }
}
