//! Grind - Review recent LeetCode activity from the terminal
//!
//! This is the main entry point for the grind command-line tool.

use clap::{Parser, Subcommand};
use log::{error, warn};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "grind", version, about = "Sync and review LeetCode activity")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Sync recent submissions and list them newest first
    Submissions {
        /// How many days back to walk (defaults to the configured lookback)
        days: Option<i64>,

        /// Only show problems whose title contains this text
        #[arg(long)]
        filter: Option<String>,
    },
    /// Sync every solved problem and list them page by page
    Progress {
        /// Only show problems whose title contains this text
        #[arg(long)]
        filter: Option<String>,
    },
    /// Print your saved note for a problem
    Note {
        /// Problem slug, e.g. two-sum
        slug: String,
    },
    /// Show the stored record for a problem
    Show {
        /// Problem slug, e.g. two-sum
        slug: String,
    },
    /// Open a problem in the browser
    Open {
        /// Problem slug, e.g. two-sum
        slug: String,
    },
}

fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    // Bootstrap config directory
    if let Err(e) = config::init() {
        warn!("Failed to initialize config directory: {}", e);
    }

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Submissions { days, filter } => commands::submissions(days, filter.as_deref()),
        Command::Progress { filter } => commands::progress(filter.as_deref()),
        Command::Note { slug } => commands::note(&slug),
        Command::Show { slug } => commands::show(&slug),
        Command::Open { slug } => commands::open(&slug),
    };

    if let Err(e) = result {
        error!("{:#}", e);
        std::process::exit(1);
    }
}
