//! Book club CLI - reading list, nominations and genre votes from the terminal
//!
//! Talks to the club's spreadsheet script when `BOOKCLUB_SCRIPT_URL` is set and
//! falls back to the local mirror otherwise.

mod cli;
mod commands;
mod error;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::commands::admin::run_admin;
use crate::commands::books::run_books;
use crate::commands::common::open_club;
use crate::commands::completions::run_completions;
use crate::commands::genres::run_genres;
use crate::commands::guides::run_guides;
use crate::commands::pending::run_pending;
use crate::commands::user::run_user;
use crate::commands::votes::run_votes;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("bookclub=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Commands::Completions { shell, output } = &cli.command {
        return run_completions(*shell, output.as_deref());
    }

    let club = open_club(cli.mirror_path, cli.endpoint).await?;
    match cli.command {
        Commands::Books { command } => run_books(&club, command).await,
        Commands::Guides { command } => run_guides(&club, command).await,
        Commands::Votes { command } => run_votes(&club, command).await,
        Commands::Genres { command } => run_genres(&club, command).await,
        Commands::User { command } => run_user(&club, command).await,
        Commands::Admin { command } => run_admin(&club, command).await,
        Commands::Pending { command } => run_pending(&club, command).await,
        Commands::Completions { shell, output } => run_completions(shell, output.as_deref()),
    }
}
