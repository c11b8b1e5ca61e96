//! Orchestration of store, mirror, scoring and trend.
//!
//! Persistence failures never reach the user as errors. Each operation
//! returns an [`Outcome`]: `Live` when the store answered, `Degraded` when the
//! value came from the local mirror or from defaults. Nothing is retried.

use tracing::instrument;

use sales_pulse_core::{AuditDraft, EmailError, SalesRepId, Trend, compute_trend};

use crate::db::{DASHBOARD_AUDIT_LIMIT, PulseStore, RECENT_SCORES_LIMIT, RepositoryError};
use crate::models::{Audit, AuditSummary, MirrorData, NewAudit, NewSalesRep, SalesRep, ScorePoint};
use crate::services::mirror::LocalMirror;

/// A value plus whether it came from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    /// The store answered.
    Live(T),
    /// The store failed or had nothing; `value` is the local fallback.
    Degraded { value: T, reason: String },
}

impl<T> Outcome<T> {
    pub fn degraded(value: T, reason: impl Into<String>) -> Self {
        Self::Degraded {
            value,
            reason: reason.into(),
        }
    }

    #[must_use]
    pub const fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }

    #[must_use]
    pub const fn value(&self) -> &T {
        match self {
            Self::Live(value) | Self::Degraded { value, .. } => value,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Self::Live(value) | Self::Degraded { value, .. } => value,
        }
    }

    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Live(_) => None,
            Self::Degraded { reason, .. } => Some(reason),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Self::Live(value) => Outcome::Live(f(value)),
            Self::Degraded { value, reason } => Outcome::Degraded {
                value: f(value),
                reason,
            },
        }
    }
}

/// Errors the caller has to handle (bad input, unknown ids).
#[derive(Debug, thiserror::Error)]
pub enum PulseError {
    #[error("invalid manager email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("sales rep name cannot be empty")]
    MissingRepName,

    #[error("sales rep not found")]
    RepNotFound,
}

/// What the results step shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub audit: Audit,
    /// Oldest to newest, at most [`RECENT_SCORES_LIMIT`] entries.
    pub history: Vec<ScorePoint>,
    pub trend: Option<Trend>,
}

/// Per-request service over a store and a mirror.
pub struct PulseService<'a> {
    store: &'a dyn PulseStore,
    mirror: &'a dyn LocalMirror,
}

impl<'a> PulseService<'a> {
    #[must_use]
    pub fn new(store: &'a dyn PulseStore, mirror: &'a dyn LocalMirror) -> Self {
        Self { store, mirror }
    }

    /// Score and save a completed draft, then read back the rep's history.
    ///
    /// The mirror is written first and always. If the insert fails, history
    /// comes from the mirror too, since the store would not include this
    /// audit.
    ///
    /// # Errors
    ///
    /// Returns `PulseError` if the draft has no rep name or an invalid email.
    #[instrument(skip_all, fields(rep = %draft.rep_name()))]
    pub async fn submit_audit(
        &self,
        draft: &AuditDraft,
    ) -> Result<Outcome<Submission>, PulseError> {
        if draft.rep_name().is_empty() {
            return Err(PulseError::MissingRepName);
        }
        let new = NewAudit::from_draft(draft)?;
        let manager_email = new.manager_email.clone();
        let rep_name = new.sales_rep_name.clone();

        let local = Audit::local(new.clone());
        let mut mirror = self.load_mirror().await;
        mirror.push_audit(local.clone());
        self.save_mirror(mirror.clone()).await;

        let (audit, mut degraded) = match self.store.insert_audit(new).await {
            Ok(stored) => (stored, None),
            Err(e) => {
                tracing::warn!(error = %e, "Audit not saved, kept in local mirror");
                (local, Some(format!("audit not saved: {e}")))
            }
        };

        let recent = if degraded.is_some() {
            mirror.recent_scores(&manager_email, &rep_name, RECENT_SCORES_LIMIT)
        } else {
            match self
                .store
                .list_recent_scores(&manager_email, &rep_name, RECENT_SCORES_LIMIT)
                .await
            {
                Ok(points) => points,
                Err(e) => {
                    tracing::warn!(error = %e, "History unavailable, using local mirror");
                    degraded = Some(format!("history unavailable: {e}"));
                    mirror.recent_scores(&manager_email, &rep_name, RECENT_SCORES_LIMIT)
                }
            }
        };

        let history: Vec<ScorePoint> = recent.into_iter().rev().collect();
        let scores: Vec<u8> = history.iter().map(|p| p.total_score).collect();
        let trend = compute_trend(&scores);

        tracing::info!(
            score = audit.total_score,
            history = history.len(),
            degraded = degraded.is_some(),
            "Audit submitted"
        );

        let submission = Submission {
            audit,
            history,
            trend,
        };
        Ok(match degraded {
            None => Outcome::Live(submission),
            Some(reason) => Outcome::degraded(submission, reason),
        })
    }

    /// Rep list, seeding the defaults on first use.
    ///
    /// Falls back to the mirrored list, or to the defaults with local ids.
    #[instrument(skip_all)]
    pub async fn list_reps(&self) -> Outcome<Vec<SalesRep>> {
        if let Err(e) = self.store.seed_defaults_once().await {
            tracing::warn!(error = %e, "Could not seed default reps");
        }

        let mut mirror = self.load_mirror().await;
        match self.store.list_reps().await {
            Ok(reps) => {
                mirror.reps = Some(reps.clone());
                self.save_mirror(mirror).await;
                Outcome::Live(reps)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Rep list unavailable, using local mirror");
                let reps = mirror.reps_or_defaults().clone();
                self.save_mirror(mirror).await;
                Outcome::degraded(reps, unavailable("rep list", &e))
            }
        }
    }

    /// Create a rep, or add it to the mirrored list if the store fails.
    #[instrument(skip_all, fields(name = %rep.name))]
    pub async fn add_rep(&self, rep: NewSalesRep) -> Outcome<SalesRep> {
        let mut mirror = self.load_mirror().await;
        let outcome = match self.store.create_rep(rep.clone()).await {
            Ok(created) => {
                // Only extend a list the store already confirmed.
                if let Some(reps) = mirror.reps.as_mut() {
                    reps.push(created.clone());
                }
                Outcome::Live(created)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Rep not saved, adding locally");
                let local = SalesRep::local(rep);
                mirror.reps_or_defaults().push(local.clone());
                Outcome::degraded(local, unavailable("rep creation", &e))
            }
        };

        self.save_mirror(mirror).await;
        outcome
    }

    /// Delete a rep from the store and the mirror.
    ///
    /// A rep the store does not know but the mirror does (one added while
    /// the store was down) is removed locally and reported as live.
    ///
    /// # Errors
    ///
    /// Returns `PulseError::RepNotFound` if neither the store nor the mirror
    /// knows the id.
    #[instrument(skip_all, fields(id = %id))]
    pub async fn delete_rep(&self, id: SalesRepId) -> Result<Outcome<()>, PulseError> {
        let mut mirror = self.load_mirror().await;
        let result = self.store.delete_rep(id).await;
        let was_mirrored = mirror.remove_rep(id);
        self.save_mirror(mirror).await;

        match result {
            Ok(()) => Ok(Outcome::Live(())),
            Err(RepositoryError::NotFound) if was_mirrored => Ok(Outcome::Live(())),
            Err(RepositoryError::NotFound) => Err(PulseError::RepNotFound),
            Err(e) => {
                tracing::warn!(error = %e, "Rep not deleted, removing locally");
                Ok(Outcome::degraded((), unavailable("rep deletion", &e)))
            }
        }
    }

    /// Latest audits for the dashboard, newest first.
    ///
    /// The mirror is used when the store fails, or when it has no audits
    /// but the mirror does.
    #[instrument(skip_all)]
    pub async fn recent_audits(&self) -> Outcome<Vec<AuditSummary>> {
        match self.store.list_all_recent(DASHBOARD_AUDIT_LIMIT).await {
            Ok(audits) if !audits.is_empty() => Outcome::Live(audits),
            Ok(audits) => {
                let local = self.load_mirror().await.recent_summaries(DASHBOARD_AUDIT_LIMIT);
                if local.is_empty() {
                    Outcome::Live(audits)
                } else {
                    Outcome::degraded(local, "store returned no audits")
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Audits unavailable, using local mirror");
                let local = self.load_mirror().await.recent_summaries(DASHBOARD_AUDIT_LIMIT);
                Outcome::degraded(local, unavailable("audit list", &e))
            }
        }
    }

    async fn load_mirror(&self) -> MirrorData {
        self.mirror.load().await.unwrap_or_else(|e| {
            tracing::error!(error = %e, "Could not read local mirror");
            MirrorData::default()
        })
    }

    async fn save_mirror(&self, data: MirrorData) {
        if let Err(e) = self.mirror.store(data).await {
            tracing::error!(error = %e, "Could not write local mirror");
        }
    }
}

fn unavailable(what: &str, err: &RepositoryError) -> String {
    format!("{what} unavailable: {err}")
}
