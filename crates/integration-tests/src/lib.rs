//! Integration tests for Sales Weekly Pulse.
//!
//! # Running Tests
//!
//! ```bash
//! # In-process tests (memory store, no database needed)
//! cargo test -p sales-pulse-integration-tests
//!
//! # Against a running server and a database
//! PULSE_BASE_URL=http://localhost:3000 \
//! PULSE_DATABASE_URL=postgres://localhost/pulse_test \
//!     cargo test -p sales-pulse-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `pulse_service` - Fallback and history behaviour of the service layer
//! - `router` - Full router driven in-process with `tower::ServiceExt`
//! - `postgres_store` - `PgPulseStore` SQL against a real database (ignored by default)
//! - `server_smoke` - HTTP checks against a live server (ignored by default)
//!
//! This library holds the shared fixtures: a store that fails on demand
//! and builders for drafts and application state.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use sales_pulse_core::{AuditDraft, Email, SalesRepId};
use sales_pulse_web::config::{PulseConfig, StorageBackend};
use sales_pulse_web::db::{MemoryPulseStore, PulseStore, RepositoryError, SeedOutcome};
use sales_pulse_web::models::{Audit, AuditSummary, NewAudit, NewSalesRep, SalesRep, ScorePoint};
use sales_pulse_web::state::AppState;

/// A store operation that [`FaultyStore`] can be told to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Ping,
    InsertAudit,
    RecentScores,
    AllRecent,
    ListReps,
    CreateRep,
    DeleteRep,
    Seed,
}

impl Op {
    /// Every operation.
    pub const ALL: [Self; 8] = [
        Self::Ping,
        Self::InsertAudit,
        Self::RecentScores,
        Self::AllRecent,
        Self::ListReps,
        Self::CreateRep,
        Self::DeleteRep,
        Self::Seed,
    ];
}

/// In-memory store that reports the chosen operations as unavailable,
/// the way a pool timeout would surface. Every call is counted.
#[derive(Default)]
pub struct FaultyStore {
    inner: MemoryPulseStore,
    failing: HashSet<Op>,
    calls: [AtomicUsize; Op::ALL.len()],
}

impl FaultyStore {
    /// A store where nothing fails yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store where every operation fails.
    #[must_use]
    pub fn down() -> Self {
        Self::new().failing(Op::ALL)
    }

    /// Make `ops` fail from now on.
    #[must_use]
    pub fn failing(mut self, ops: impl IntoIterator<Item = Op>) -> Self {
        self.failing.extend(ops);
        self
    }

    /// The underlying store, to inspect what was written.
    #[must_use]
    pub const fn inner(&self) -> &MemoryPulseStore {
        &self.inner
    }

    /// How many times `op` was called, failed calls included.
    #[must_use]
    pub fn calls(&self, op: Op) -> usize {
        self.calls
            .get(op as usize)
            .map_or(0, |count| count.load(Ordering::Relaxed))
    }

    fn check(&self, op: Op) -> Result<(), RepositoryError> {
        if let Some(count) = self.calls.get(op as usize) {
            count.fetch_add(1, Ordering::Relaxed);
        }
        if self.failing.contains(&op) {
            Err(RepositoryError::Unavailable(sqlx::Error::PoolTimedOut))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl PulseStore for FaultyStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        self.check(Op::Ping)?;
        self.inner.ping().await
    }

    async fn insert_audit(&self, audit: NewAudit) -> Result<Audit, RepositoryError> {
        self.check(Op::InsertAudit)?;
        self.inner.insert_audit(audit).await
    }

    async fn list_recent_scores(
        &self,
        manager_email: &Email,
        sales_rep_name: &str,
        limit: usize,
    ) -> Result<Vec<ScorePoint>, RepositoryError> {
        self.check(Op::RecentScores)?;
        self.inner
            .list_recent_scores(manager_email, sales_rep_name, limit)
            .await
    }

    async fn list_all_recent(&self, limit: usize) -> Result<Vec<AuditSummary>, RepositoryError> {
        self.check(Op::AllRecent)?;
        self.inner.list_all_recent(limit).await
    }

    async fn list_reps(&self) -> Result<Vec<SalesRep>, RepositoryError> {
        self.check(Op::ListReps)?;
        self.inner.list_reps().await
    }

    async fn create_rep(&self, rep: NewSalesRep) -> Result<SalesRep, RepositoryError> {
        self.check(Op::CreateRep)?;
        self.inner.create_rep(rep).await
    }

    async fn delete_rep(&self, id: SalesRepId) -> Result<(), RepositoryError> {
        self.check(Op::DeleteRep)?;
        self.inner.delete_rep(id).await
    }

    async fn seed_defaults_once(&self) -> Result<SeedOutcome, RepositoryError> {
        self.check(Op::Seed)?;
        self.inner.seed_defaults_once().await
    }
}

/// A draft that passes every step.
///
/// Only `prospecting_actions` is non-zero, so the score is
/// `prospecting_actions / 3` (rounded) plus the bonuses.
#[must_use]
pub fn draft(manager_email: &str, rep: &str, prospecting_actions: u32) -> AuditDraft {
    AuditDraft {
        manager_email: manager_email.to_string(),
        sales_rep_id: None,
        sales_rep_name: rep.to_string(),
        prospecting_actions: prospecting_actions.to_string(),
        discovery_meetings: "0".to_string(),
        proposals_sent: "0".to_string(),
        signed_proposals: String::new(),
        revenue: String::new(),
        flash_test_objection: "C'est trop cher pour nous.".to_string(),
        flash_test_response: "Parlons plutôt de retour sur investissement".to_string(),
        flash_test_passed: false,
        recognition_note: "RAS".to_string(),
    }
}

/// Configuration for in-process tests: memory storage, no Sentry.
#[must_use]
pub fn test_config() -> PulseConfig {
    PulseConfig {
        storage: StorageBackend::Memory,
        ..PulseConfig::default()
    }
}

/// Application state over the given store.
#[must_use]
pub fn state_with(store: impl PulseStore + 'static) -> AppState {
    AppState::new(test_config(), Arc::new(store))
}
