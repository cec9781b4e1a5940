use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "bookclub")]
#[command(about = "Reading list, nominations and genre votes for the book club")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Optional path to the local mirror database file
    #[arg(long, global = true, value_name = "PATH")]
    pub mirror_path: Option<PathBuf>,

    /// Remote script endpoint (overrides BOOKCLUB_SCRIPT_URL)
    #[arg(long, global = true, value_name = "URL")]
    pub endpoint: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage the reading list
    Books {
        #[command(subcommand)]
        command: BookCommands,
    },
    /// Manage study guides
    Guides {
        #[command(subcommand)]
        command: GuideCommands,
    },
    /// Nominate and vote on the next book
    Votes {
        #[command(subcommand)]
        command: VoteCommands,
    },
    /// Vote on genres
    Genres {
        #[command(subcommand)]
        command: GenreCommands,
    },
    /// Show or set the member using this device
    User {
        #[command(subcommand)]
        command: UserCommands,
    },
    /// Admin utilities
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },
    /// Entries created while the remote store was unreachable
    Pending {
        #[command(subcommand)]
        command: PendingCommands,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
    #[value(name = "powershell")]
    PowerShell,
}

#[derive(Subcommand)]
pub enum BookCommands {
    /// List books, newest first
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add a book to the reading list
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        author: String,
        #[arg(long, value_name = "URL")]
        cover_url: Option<String>,
        #[arg(long, value_name = "DATE")]
        date_read: Option<String>,
        /// Rating from 0 to 5
        #[arg(long)]
        rating: Option<f64>,
        #[arg(long)]
        notes: Option<String>,
        /// The book was written by a club member
        #[arg(long)]
        member: bool,
    },
    /// Delete a book (admin only)
    Delete {
        /// Book id
        id: String,
    },
}

#[derive(Subcommand)]
pub enum GuideCommands {
    /// List study guides, newest first
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Share a study guide
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        book_title: String,
        /// Local file whose name and size are recorded
        #[arg(long, value_name = "PATH")]
        file: Option<PathBuf>,
    },
    /// Delete a study guide (admin only)
    Delete {
        /// Guide id
        id: String,
    },
}

#[derive(Subcommand)]
pub enum VoteCommands {
    /// List nominations in the order they were made
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Nominate a book
    Suggest {
        #[arg(long)]
        title: String,
        #[arg(long)]
        author: String,
        /// The book was written by a club member
        #[arg(long)]
        member: bool,
    },
    /// Vote for a nomination
    Vote {
        /// Nomination id
        id: String,
    },
    /// Remove every nomination (admin only)
    Clear,
}

#[derive(Subcommand)]
pub enum GenreCommands {
    /// Show genre tallies
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Vote for a genre
    Vote {
        /// Genre name, case-insensitive
        name: String,
    },
    /// Reset every tally to zero (admin only)
    Reset,
    /// Show genre votes cast by a member
    History {
        /// Member email (defaults to the current user)
        #[arg(long, value_name = "EMAIL")]
        email: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum UserCommands {
    /// Show the current user
    Show,
    /// Set the current user and sync the profile
    Set {
        #[arg(long)]
        name: String,
        #[arg(long, value_name = "EMAIL")]
        email: Option<String>,
    },
    /// Push the current user's profile to the remote store
    Sync,
}

#[derive(Subcommand)]
pub enum AdminCommands {
    /// Report whether the current user is an admin
    Check,
}

#[derive(Subcommand)]
pub enum PendingCommands {
    /// Push pending entries to the remote store again
    Retry,
}
