use bookclub_core::{BookClub, RemoteStore, Session};

use crate::cli::UserCommands;
use crate::error::CliError;

pub async fn run_user<R: RemoteStore>(
    club: &BookClub<R>,
    command: UserCommands,
) -> Result<(), CliError> {
    let profiles = club.profiles();
    match command {
        UserCommands::Show => {
            println!("{}", describe(&profiles.current_user().await?));
        }
        UserCommands::Set { name, email } => {
            let session = profiles
                .set_current_user(Session::new(name, email.unwrap_or_default()))
                .await?;
            profiles.sync_profile(&session).await;
            println!("{}", describe(&session));
        }
        UserCommands::Sync => {
            let session = profiles.current_user().await?;
            if !session.has_email() {
                return Err(CliError::MissingEmail);
            }
            profiles.sync_profile(&session).await;
            println!("{}", describe(&session));
        }
    }
    Ok(())
}

pub fn describe(session: &Session) -> String {
    if session.has_email() {
        format!("{} <{}>", session.name, session.email)
    } else {
        session.name.clone()
    }
}
