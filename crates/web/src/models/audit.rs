//! Weekly audits.
//!
//! Audits are write-once: the score is computed when the wizard is submitted
//! and never recomputed. The rep's name is copied into the audit so history
//! survives the rep being deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use sales_pulse_core::{AuditDraft, AuditId, Email, EmailError, SalesRepId, compute_score};

/// A stored audit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Audit {
    pub id: AuditId,
    pub manager_email: Email,
    pub sales_rep_name: String,
    /// Weak reference; cleared when the rep is deleted.
    pub sales_rep_id: Option<SalesRepId>,
    pub prospecting_actions: u32,
    pub discovery_meetings: u32,
    pub proposals_sent: u32,
    pub signed_proposals: u32,
    /// Whole currency units.
    pub revenue: u32,
    pub flash_test_objection: String,
    pub flash_test_passed: bool,
    pub recognition_note: String,
    pub total_score: u8,
    pub created_at: DateTime<Utc>,
}

/// An audit about to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAudit {
    pub manager_email: Email,
    pub sales_rep_name: String,
    pub sales_rep_id: Option<SalesRepId>,
    pub prospecting_actions: u32,
    pub discovery_meetings: u32,
    pub proposals_sent: u32,
    pub signed_proposals: u32,
    pub revenue: u32,
    pub flash_test_objection: String,
    pub flash_test_passed: bool,
    pub recognition_note: String,
    pub total_score: u8,
}

impl NewAudit {
    /// Score a completed wizard draft.
    ///
    /// # Errors
    ///
    /// Returns the `EmailError` if the manager email is not email-like.
    pub fn from_draft(draft: &AuditDraft) -> Result<Self, EmailError> {
        let manager_email = draft.manager_email()?;
        let inputs = draft.score_inputs();

        Ok(Self {
            manager_email,
            sales_rep_name: draft.rep_name().to_owned(),
            sales_rep_id: draft.sales_rep_id,
            prospecting_actions: inputs.prospecting_actions,
            discovery_meetings: inputs.discovery_meetings,
            proposals_sent: inputs.proposals_sent,
            signed_proposals: inputs.signed_proposals,
            revenue: inputs.revenue,
            flash_test_objection: draft.flash_test_objection.clone(),
            flash_test_passed: draft.flash_test_passed,
            recognition_note: draft.recognition_note.clone(),
            total_score: compute_score(&inputs),
        })
    }
}

impl Audit {
    /// Materialize an audit without a database, for the local mirror.
    #[must_use]
    pub fn local(new: NewAudit) -> Self {
        Self::from_new(AuditId::generate(), new, Utc::now())
    }

    /// Attach an id and timestamp to a new audit.
    #[must_use]
    pub fn from_new(id: AuditId, new: NewAudit, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            manager_email: new.manager_email,
            sales_rep_name: new.sales_rep_name,
            sales_rep_id: new.sales_rep_id,
            prospecting_actions: new.prospecting_actions,
            discovery_meetings: new.discovery_meetings,
            proposals_sent: new.proposals_sent,
            signed_proposals: new.signed_proposals,
            revenue: new.revenue,
            flash_test_objection: new.flash_test_objection,
            flash_test_passed: new.flash_test_passed,
            recognition_note: new.recognition_note,
            total_score: new.total_score,
            created_at,
        }
    }

    /// Whether this audit belongs to the given manager/rep history.
    #[must_use]
    pub fn is_for(&self, manager_email: &Email, sales_rep_name: &str) -> bool {
        &self.manager_email == manager_email && self.sales_rep_name == sales_rep_name
    }

    #[must_use]
    pub fn summary(&self) -> AuditSummary {
        AuditSummary {
            id: self.id,
            manager_email: self.manager_email.clone(),
            sales_rep_name: self.sales_rep_name.clone(),
            total_score: self.total_score,
            created_at: self.created_at,
        }
    }

    #[must_use]
    pub const fn score_point(&self) -> ScorePoint {
        ScorePoint {
            total_score: self.total_score,
            created_at: self.created_at,
        }
    }
}

/// One past score in a manager/rep history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScorePoint {
    pub total_score: u8,
    pub created_at: DateTime<Utc>,
}

/// A row of the dashboard table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditSummary {
    pub id: AuditId,
    pub manager_email: Email,
    pub sales_rep_name: String,
    pub total_score: u8,
    pub created_at: DateTime<Utc>,
}
