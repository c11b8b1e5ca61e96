//! Sales Weekly Pulse CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Create the tables
//! pulse-cli migrate
//!
//! # Insert the default reps if the table is empty
//! pulse-cli seed
//!
//! # Manage reps
//! pulse-cli reps list
//! pulse-cli reps add -n "Camille" -e camille@example.com
//! pulse-cli reps delete <id>
//! ```
//!
//! The database URL is read the same way the server reads it
//! (`PULSE_DATABASE_URL`, then `DATABASE_URL`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "pulse-cli")]
#[command(author, version, about = "Sales Weekly Pulse CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Insert the default reps into an empty table
    Seed,
    /// Manage sales reps
    Reps {
        #[command(subcommand)]
        action: RepAction,
    },
}

#[derive(Subcommand)]
enum RepAction {
    /// List reps by name
    List,
    /// Add a rep
    Add {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Contact email (free text)
        #[arg(short, long)]
        email: Option<String>,
    },
    /// Delete a rep; past audits keep its name
    Delete {
        /// Rep id
        id: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), commands::CommandError> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed => commands::seed::default_reps().await?,
        Commands::Reps { action } => match action {
            RepAction::List => commands::reps::list().await?,
            RepAction::Add { name, email } => commands::reps::add(&name, email.as_deref()).await?,
            RepAction::Delete { id } => commands::reps::delete(&id).await?,
        },
    }
    Ok(())
}
