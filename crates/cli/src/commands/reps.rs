//! Rep management commands.

use sales_pulse_core::SalesRepId;
use sales_pulse_web::db::{PgPulseStore, PulseStore};
use sales_pulse_web::models::NewSalesRep;
use tracing::info;

use super::{CommandError, connect};

/// Print every rep, one per line.
pub async fn list() -> Result<(), CommandError> {
    let store = PgPulseStore::new(connect().await?);
    let reps = store.list_reps().await?;

    #[allow(clippy::print_stdout)]
    for rep in &reps {
        println!(
            "{}\t{}\t{}",
            rep.id,
            rep.name,
            rep.email.as_deref().unwrap_or("-")
        );
    }
    info!(count = reps.len(), "Reps listed");
    Ok(())
}

/// Create a rep.
pub async fn add(name: &str, email: Option<&str>) -> Result<(), CommandError> {
    let rep = NewSalesRep::new(name, email)?;
    let store = PgPulseStore::new(connect().await?);
    let created = store.create_rep(rep).await?;

    info!(id = %created.id, name = %created.name, "Rep created");
    Ok(())
}

/// Delete a rep by id.
pub async fn delete(id: &str) -> Result<(), CommandError> {
    let id: SalesRepId = id
        .parse()
        .map_err(|_| CommandError::InvalidId(id.to_string()))?;
    let store = PgPulseStore::new(connect().await?);
    store.delete_rep(id).await?;

    info!(%id, "Rep deleted");
    Ok(())
}
