//! Sales rep repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use sales_pulse_core::SalesRepId;

use super::{RepositoryError, SeedOutcome};
use crate::models::{NewSalesRep, SalesRep};

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct SalesRepRow {
    id: Uuid,
    name: String,
    email: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<SalesRepRow> for SalesRep {
    fn from(row: SalesRepRow) -> Self {
        Self {
            id: SalesRepId::new(row.id),
            name: row.name,
            email: row.email,
            created_at: row.created_at,
        }
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for `sales_reps`.
pub struct SalesRepRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SalesRepRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all reps ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<SalesRep>, RepositoryError> {
        let rows = sqlx::query_as::<_, SalesRepRow>(
            r"
            SELECT id, name, email, created_at
            FROM sales_reps
            ORDER BY name ASC, created_at ASC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Insert a rep.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, rep: &NewSalesRep) -> Result<SalesRep, RepositoryError> {
        let row = sqlx::query_as::<_, SalesRepRow>(
            r"
            INSERT INTO sales_reps (name, email)
            VALUES ($1, $2)
            RETURNING id, name, email, created_at
            ",
        )
        .bind(&rep.name)
        .bind(rep.email.as_deref())
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Delete a rep by id.
    ///
    /// Audits referencing the rep keep their row; the foreign key is
    /// `ON DELETE SET NULL`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no rep has this id.
    pub async fn delete(&self, id: SalesRepId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM sales_reps WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Insert the default reps when the table is empty.
    ///
    /// Runs in one transaction holding an `EXCLUSIVE` lock on the table, so
    /// two concurrent first loads cannot both see an empty table.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement fails; the
    /// transaction is rolled back.
    pub async fn seed_defaults_once(&self) -> Result<SeedOutcome, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("LOCK TABLE sales_reps IN EXCLUSIVE MODE")
            .execute(&mut *tx)
            .await?;

        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM sales_reps)")
            .fetch_one(&mut *tx)
            .await?;

        if exists {
            tx.rollback().await?;
            return Ok(SeedOutcome::AlreadySeeded);
        }

        let defaults = NewSalesRep::defaults();
        for rep in &defaults {
            sqlx::query("INSERT INTO sales_reps (name, email) VALUES ($1, $2)")
                .bind(&rep.name)
                .bind(rep.email.as_deref())
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(SeedOutcome::Seeded(defaults.len()))
    }
}
