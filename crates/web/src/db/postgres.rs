//! `PostgreSQL` implementation of [`PulseStore`].

use async_trait::async_trait;
use sqlx::PgPool;

use sales_pulse_core::{Email, SalesRepId};

use super::audits::AuditRepository;
use super::sales_reps::SalesRepRepository;
use super::{PulseStore, RepositoryError, SeedOutcome};
use crate::models::{Audit, AuditSummary, NewAudit, NewSalesRep, SalesRep, ScorePoint};

/// Store backed by a `PostgreSQL` pool.
#[derive(Debug, Clone)]
pub struct PgPulseStore {
    pool: PgPool,
}

impl PgPulseStore {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    fn audits(&self) -> AuditRepository<'_> {
        AuditRepository::new(&self.pool)
    }

    fn reps(&self) -> SalesRepRepository<'_> {
        SalesRepRepository::new(&self.pool)
    }
}

#[async_trait]
impl PulseStore for PgPulseStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn insert_audit(&self, audit: NewAudit) -> Result<Audit, RepositoryError> {
        self.audits().insert(&audit).await
    }

    async fn list_recent_scores(
        &self,
        manager_email: &Email,
        sales_rep_name: &str,
        limit: usize,
    ) -> Result<Vec<ScorePoint>, RepositoryError> {
        self.audits()
            .recent_scores(manager_email, sales_rep_name, limit)
            .await
    }

    async fn list_all_recent(&self, limit: usize) -> Result<Vec<AuditSummary>, RepositoryError> {
        self.audits().recent(limit).await
    }

    async fn list_reps(&self) -> Result<Vec<SalesRep>, RepositoryError> {
        self.reps().list().await
    }

    async fn create_rep(&self, rep: NewSalesRep) -> Result<SalesRep, RepositoryError> {
        self.reps().create(&rep).await
    }

    async fn delete_rep(&self, id: SalesRepId) -> Result<(), RepositoryError> {
        self.reps().delete(id).await
    }

    async fn seed_defaults_once(&self) -> Result<SeedOutcome, RepositoryError> {
        self.reps().seed_defaults_once().await
    }
}
