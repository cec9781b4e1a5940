use bookclub_core::{BookClub, RemoteStore};

use crate::cli::PendingCommands;
use crate::error::CliError;

pub async fn run_pending<R: RemoteStore>(
    club: &BookClub<R>,
    command: PendingCommands,
) -> Result<(), CliError> {
    match command {
        PendingCommands::Retry => {
            let report = club.retry_pending().await?;
            println!(
                "{} confirmed, {} still pending, {} rejected",
                report.confirmed, report.still_pending, report.rejected
            );
        }
    }
    Ok(())
}
