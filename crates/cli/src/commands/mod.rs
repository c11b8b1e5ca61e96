//! CLI subcommands.

pub mod migrate;
pub mod reps;
pub mod seed;

use sqlx::PgPool;

use sales_pulse_web::config::{ConfigError, PulseConfig};
use sales_pulse_web::db::{self, RepositoryError};
use sales_pulse_web::models::SalesRepError;

/// Errors from any subcommand.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("PULSE_DATABASE_URL (or DATABASE_URL) is not set")]
    MissingDatabaseUrl,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Invalid rep: {0}")]
    SalesRep(#[from] SalesRepError),

    #[error("Invalid rep id: {0}")]
    InvalidId(String),
}

/// Connect to the configured database.
///
/// Unlike the server, the CLI refuses to run against the placeholder URL.
pub async fn connect() -> Result<PgPool, CommandError> {
    let config = PulseConfig::from_env()?;
    if config.database_url_is_placeholder {
        return Err(CommandError::MissingDatabaseUrl);
    }

    tracing::info!("Connecting to database...");
    Ok(db::create_pool(&config.database_url).await?)
}
