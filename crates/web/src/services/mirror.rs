//! Local mirror of a browser's audits and rep list.
//!
//! Every submitted audit is written here before the database is tried, and
//! the rep list is kept in sync on every successful load. When the store is
//! unreachable, pages are served from this copy instead. There is no merge
//! back into the database and no conflict resolution: the last write wins.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::Mutex;
use tower_sessions::Session;

use sales_pulse_core::{Email, SalesRepId};

use crate::models::{Audit, AuditSummary, MirrorData, SalesRep, ScorePoint, session_keys};

/// Audits kept per session; older ones are dropped first.
pub const MIRROR_AUDIT_LIMIT: usize = crate::db::DASHBOARD_AUDIT_LIMIT;

/// Errors from reading or writing the mirror.
#[derive(Debug, Error)]
pub enum MirrorError {
    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),
}

/// Somewhere to keep the mirror between requests.
#[async_trait]
pub trait LocalMirror: Send + Sync {
    /// Read the whole mirror; an empty mirror if nothing was stored yet.
    async fn load(&self) -> Result<MirrorData, MirrorError>;

    /// Replace the whole mirror.
    async fn store(&self, data: MirrorData) -> Result<(), MirrorError>;
}

/// Mirror stored in the visitor's session.
#[derive(Debug, Clone)]
pub struct SessionMirror {
    session: Session,
}

impl SessionMirror {
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self { session }
    }
}

#[async_trait]
impl LocalMirror for SessionMirror {
    async fn load(&self) -> Result<MirrorData, MirrorError> {
        Ok(self
            .session
            .get::<MirrorData>(session_keys::MIRROR)
            .await?
            .unwrap_or_default())
    }

    async fn store(&self, data: MirrorData) -> Result<(), MirrorError> {
        self.session.insert(session_keys::MIRROR, data).await?;
        Ok(())
    }
}

/// Mirror held in process memory.
#[derive(Debug, Default)]
pub struct MemoryMirror {
    data: Mutex<MirrorData>,
}

impl MemoryMirror {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from existing contents.
    #[must_use]
    pub fn with_data(data: MirrorData) -> Self {
        Self {
            data: Mutex::new(data),
        }
    }
}

#[async_trait]
impl LocalMirror for MemoryMirror {
    async fn load(&self) -> Result<MirrorData, MirrorError> {
        Ok(self.data.lock().await.clone())
    }

    async fn store(&self, data: MirrorData) -> Result<(), MirrorError> {
        *self.data.lock().await = data;
        Ok(())
    }
}

impl MirrorData {
    /// Append an audit, dropping the oldest beyond [`MIRROR_AUDIT_LIMIT`].
    pub fn push_audit(&mut self, audit: Audit) {
        self.audits.push(audit);
        let excess = self.audits.len().saturating_sub(MIRROR_AUDIT_LIMIT);
        self.audits.drain(..excess);
    }

    /// Latest audits, newest first.
    #[must_use]
    pub fn recent_summaries(&self, limit: usize) -> Vec<AuditSummary> {
        self.audits
            .iter()
            .rev()
            .take(limit)
            .map(Audit::summary)
            .collect()
    }

    /// Latest scores of one manager/rep pair, newest first.
    #[must_use]
    pub fn recent_scores(
        &self,
        manager_email: &Email,
        sales_rep_name: &str,
        limit: usize,
    ) -> Vec<ScorePoint> {
        self.audits
            .iter()
            .rev()
            .filter(|audit| audit.is_for(manager_email, sales_rep_name))
            .take(limit)
            .map(Audit::score_point)
            .collect()
    }

    /// The mirrored rep list, initialized to the defaults on first use.
    ///
    /// The defaults are stored on first use, so their local ids stay the
    /// same across requests.
    pub fn reps_or_defaults(&mut self) -> &mut Vec<SalesRep> {
        self.reps.get_or_insert_with(SalesRep::local_defaults)
    }

    /// Remove a rep; returns whether it was present.
    pub fn remove_rep(&mut self, id: SalesRepId) -> bool {
        let Some(reps) = self.reps.as_mut() else {
            return false;
        };
        let before = reps.len();
        reps.retain(|rep| rep.id != id);
        reps.len() != before
    }
}
