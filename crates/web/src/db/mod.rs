//! Data access for `sales_reps` and `audits`.
//!
//! # Tables
//!
//! - `sales_reps` - Reps that can be audited
//! - `audits` - One immutable row per weekly submission
//!
//! Handlers never talk to the database directly; they go through the
//! [`PulseStore`] trait so the whole application can run on the in-memory
//! implementation (`PULSE_STORAGE=memory`, tests) or against `PostgreSQL`.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/web/migrations/` and run via:
//! ```bash
//! cargo run -p sales-pulse-cli -- migrate
//! ```

pub mod audits;
pub mod memory;
pub mod postgres;
pub mod sales_reps;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use sales_pulse_core::{Email, SalesRepId};

use crate::models::{Audit, AuditSummary, NewAudit, NewSalesRep, SalesRep, ScorePoint};

pub use memory::MemoryPulseStore;
pub use postgres::PgPulseStore;

/// How many past scores feed the trend on the results step.
pub const RECENT_SCORES_LIMIT: usize = sales_pulse_core::trend::HISTORY_LENGTH;

/// How many audits the dashboard lists.
pub const DASHBOARD_AUDIT_LIMIT: usize = 50;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(sqlx::Error),

    /// The database could not be reached (pool timeout, I/O, TLS).
    #[error("database unavailable: {0}")]
    Unavailable(sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation.
    #[error("constraint violation: {0}")]
    Conflict(String),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_) => Self::Unavailable(err),
            sqlx::Error::Database(ref db_err)
                if db_err.is_unique_violation() || db_err.is_check_violation() =>
            {
                Self::Conflict(db_err.message().to_owned())
            }
            other => Self::Database(other),
        }
    }
}

/// Result of [`PulseStore::seed_defaults_once`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// The table was empty; this many reps were inserted.
    Seeded(usize),
    /// Reps already existed; nothing was written.
    AlreadySeeded,
}

/// Storage operations the application needs.
///
/// Every method reports failure through `RepositoryError`; callers decide
/// whether to fall back to the local mirror.
#[async_trait]
pub trait PulseStore: Send + Sync {
    /// Check the store is reachable.
    async fn ping(&self) -> Result<(), RepositoryError>;

    /// Insert an audit and return the stored record.
    async fn insert_audit(&self, audit: NewAudit) -> Result<Audit, RepositoryError>;

    /// Latest scores of one manager/rep pair, newest first.
    async fn list_recent_scores(
        &self,
        manager_email: &Email,
        sales_rep_name: &str,
        limit: usize,
    ) -> Result<Vec<ScorePoint>, RepositoryError>;

    /// Latest audits across everyone, newest first.
    async fn list_all_recent(&self, limit: usize) -> Result<Vec<AuditSummary>, RepositoryError>;

    /// All reps, ordered by name.
    async fn list_reps(&self) -> Result<Vec<SalesRep>, RepositoryError>;

    async fn create_rep(&self, rep: NewSalesRep) -> Result<SalesRep, RepositoryError>;

    /// Delete a rep. Audits keep their copy of the rep's name.
    ///
    /// Returns `RepositoryError::NotFound` if no rep has this id.
    async fn delete_rep(&self, id: SalesRepId) -> Result<(), RepositoryError>;

    /// Insert the default reps if, and only if, there are no reps at all.
    async fn seed_defaults_once(&self) -> Result<SeedOutcome, RepositoryError>;
}

/// Create a connected `PostgreSQL` pool (used by the CLI).
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Create a pool that connects on first use.
///
/// The server must start even when the database is down, so nothing is
/// dialled here; `acquire_timeout` bounds how long a request waits before
/// falling back.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection string cannot be parsed.
pub fn create_lazy_pool(
    database_url: &secrecy::SecretString,
    acquire_timeout: Duration,
) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(acquire_timeout)
        .connect_lazy(database_url.expose_secret())
}

/// Convert a `usize` limit for a `LIMIT $n` bind.
pub(crate) fn sql_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}
