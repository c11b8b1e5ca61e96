//! In-process implementation of [`PulseStore`].
//!
//! Follows the same rules as the `PostgreSQL` schema: audits are never
//! changed except for their rep reference being cleared when the rep is
//! deleted, and seeding only happens on an empty rep table.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use sales_pulse_core::{AuditId, Email, SalesRepId};

use super::{PulseStore, RepositoryError, SeedOutcome};
use crate::models::{Audit, AuditSummary, NewAudit, NewSalesRep, SalesRep, ScorePoint};

#[derive(Debug, Default)]
struct Tables {
    reps: Vec<SalesRep>,
    /// Insertion order, oldest first.
    audits: Vec<Audit>,
}

/// Store that keeps everything in memory; contents are lost on restart.
#[derive(Debug, Default)]
pub struct MemoryPulseStore {
    tables: RwLock<Tables>,
}

impl MemoryPulseStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PulseStore for MemoryPulseStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }

    async fn insert_audit(&self, mut audit: NewAudit) -> Result<Audit, RepositoryError> {
        let mut tables = self.tables.write().await;
        if audit
            .sales_rep_id
            .is_some_and(|id| !tables.reps.iter().any(|rep| rep.id == id))
        {
            audit.sales_rep_id = None;
        }
        let audit = Audit::from_new(AuditId::generate(), audit, Utc::now());
        tables.audits.push(audit.clone());
        Ok(audit)
    }

    async fn list_recent_scores(
        &self,
        manager_email: &Email,
        sales_rep_name: &str,
        limit: usize,
    ) -> Result<Vec<ScorePoint>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .audits
            .iter()
            .rev()
            .filter(|audit| audit.is_for(manager_email, sales_rep_name))
            .take(limit)
            .map(Audit::score_point)
            .collect())
    }

    async fn list_all_recent(&self, limit: usize) -> Result<Vec<AuditSummary>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .audits
            .iter()
            .rev()
            .take(limit)
            .map(Audit::summary)
            .collect())
    }

    async fn list_reps(&self) -> Result<Vec<SalesRep>, RepositoryError> {
        let mut reps = self.tables.read().await.reps.clone();
        reps.sort_by(|a, b| a.name.cmp(&b.name).then(a.created_at.cmp(&b.created_at)));
        Ok(reps)
    }

    async fn create_rep(&self, rep: NewSalesRep) -> Result<SalesRep, RepositoryError> {
        let rep = SalesRep::local(rep);
        self.tables.write().await.reps.push(rep.clone());
        Ok(rep)
    }

    async fn delete_rep(&self, id: SalesRepId) -> Result<(), RepositoryError> {
        let mut tables = self.tables.write().await;
        let before = tables.reps.len();
        tables.reps.retain(|rep| rep.id != id);
        if tables.reps.len() == before {
            return Err(RepositoryError::NotFound);
        }

        for audit in &mut tables.audits {
            if audit.sales_rep_id == Some(id) {
                audit.sales_rep_id = None;
            }
        }
        Ok(())
    }

    async fn seed_defaults_once(&self) -> Result<SeedOutcome, RepositoryError> {
        let mut tables = self.tables.write().await;
        if !tables.reps.is_empty() {
            return Ok(SeedOutcome::AlreadySeeded);
        }

        tables.reps = SalesRep::local_defaults();
        Ok(SeedOutcome::Seeded(tables.reps.len()))
    }
}
