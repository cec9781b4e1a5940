use bookclub_core::{BookClub, RemoteStore};

use crate::cli::AdminCommands;
use crate::commands::user::describe;
use crate::error::CliError;

pub async fn run_admin<R: RemoteStore>(
    club: &BookClub<R>,
    command: AdminCommands,
) -> Result<(), CliError> {
    match command {
        AdminCommands::Check => {
            let session = club.profiles().current_user().await?;
            if club.profiles().is_admin(&session).await {
                println!("{} is an admin", describe(&session));
            } else {
                println!("{} is not an admin", describe(&session));
            }
        }
    }
    Ok(())
}
