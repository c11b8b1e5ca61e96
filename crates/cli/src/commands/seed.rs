//! Seed the default reps.
//!
//! Safe to run any number of times, including concurrently with the server:
//! the reps are only inserted while the table is empty.

use sales_pulse_web::db::{PgPulseStore, PulseStore, SeedOutcome};
use tracing::info;

use super::{CommandError, connect};

/// Insert the default reps if `sales_reps` is empty.
pub async fn default_reps() -> Result<(), CommandError> {
    let pool = connect().await?;
    let store = PgPulseStore::new(pool);

    match store.seed_defaults_once().await? {
        SeedOutcome::Seeded(count) => info!(count, "Default reps inserted"),
        SeedOutcome::AlreadySeeded => info!("Reps already present, nothing to do"),
    }
    Ok(())
}
