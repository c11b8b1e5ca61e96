//! Audit repository for database operations.
//!
//! Audits are insert-only: no update or delete exists.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use sales_pulse_core::{AuditId, Email, SalesRepId};

use super::{RepositoryError, sql_limit};
use crate::models::{Audit, AuditSummary, NewAudit, ScorePoint};

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct AuditRow {
    id: Uuid,
    manager_email: String,
    sales_rep_name: String,
    sales_rep_id: Option<Uuid>,
    prospecting_actions: i32,
    discovery_meetings: i32,
    proposals_sent: i32,
    signed_proposals: i32,
    revenue: i32,
    flash_test_objection: String,
    flash_test_passed: bool,
    recognition_note: String,
    total_score: i32,
    created_at: DateTime<Utc>,
}

impl TryFrom<AuditRow> for Audit {
    type Error = RepositoryError;

    fn try_from(row: AuditRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: AuditId::new(row.id),
            manager_email: parse_email(&row.manager_email)?,
            sales_rep_name: row.sales_rep_name,
            sales_rep_id: row.sales_rep_id.map(SalesRepId::new),
            prospecting_actions: to_count(row.prospecting_actions, "prospecting_actions")?,
            discovery_meetings: to_count(row.discovery_meetings, "discovery_meetings")?,
            proposals_sent: to_count(row.proposals_sent, "proposals_sent")?,
            signed_proposals: to_count(row.signed_proposals, "signed_proposals")?,
            revenue: to_count(row.revenue, "revenue")?,
            flash_test_objection: row.flash_test_objection,
            flash_test_passed: row.flash_test_passed,
            recognition_note: row.recognition_note,
            total_score: to_score(row.total_score)?,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct AuditSummaryRow {
    id: Uuid,
    manager_email: String,
    sales_rep_name: String,
    total_score: i32,
    created_at: DateTime<Utc>,
}

impl TryFrom<AuditSummaryRow> for AuditSummary {
    type Error = RepositoryError;

    fn try_from(row: AuditSummaryRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: AuditId::new(row.id),
            manager_email: parse_email(&row.manager_email)?,
            sales_rep_name: row.sales_rep_name,
            total_score: to_score(row.total_score)?,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ScorePointRow {
    total_score: i32,
    created_at: DateTime<Utc>,
}

impl TryFrom<ScorePointRow> for ScorePoint {
    type Error = RepositoryError;

    fn try_from(row: ScorePointRow) -> Result<Self, Self::Error> {
        Ok(Self {
            total_score: to_score(row.total_score)?,
            created_at: row.created_at,
        })
    }
}

fn parse_email(raw: &str) -> Result<Email, RepositoryError> {
    Email::parse(raw)
        .map_err(|e| RepositoryError::DataCorruption(format!("invalid email in database: {e}")))
}

fn to_count(value: i32, column: &str) -> Result<u32, RepositoryError> {
    u32::try_from(value)
        .map_err(|_| RepositoryError::DataCorruption(format!("negative {column}: {value}")))
}

fn to_score(value: i32) -> Result<u8, RepositoryError> {
    u8::try_from(value)
        .ok()
        .filter(|score| *score <= 100)
        .ok_or_else(|| RepositoryError::DataCorruption(format!("score out of range: {value}")))
}

/// Counters are capped at `i32::MAX` on input; saturate rather than fail.
fn to_column(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for `audits`.
pub struct AuditRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AuditRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert an audit.
    ///
    /// A `sales_rep_id` with no matching rep is stored as NULL.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails, and
    /// `RepositoryError::Conflict` if a check constraint rejects the row.
    pub async fn insert(&self, audit: &NewAudit) -> Result<Audit, RepositoryError> {
        let row = sqlx::query_as::<_, AuditRow>(
            r"
            INSERT INTO audits (
                manager_email, sales_rep_name, sales_rep_id,
                prospecting_actions, discovery_meetings, proposals_sent,
                signed_proposals, revenue,
                flash_test_objection, flash_test_passed, recognition_note,
                total_score
            )
            VALUES (
                $1, $2, (SELECT id FROM sales_reps WHERE id = $3),
                $4, $5, $6, $7, $8, $9, $10, $11, $12
            )
            RETURNING id, manager_email, sales_rep_name, sales_rep_id,
                      prospecting_actions, discovery_meetings, proposals_sent,
                      signed_proposals, revenue,
                      flash_test_objection, flash_test_passed, recognition_note,
                      total_score, created_at
            ",
        )
        .bind(&audit.manager_email)
        .bind(&audit.sales_rep_name)
        .bind(audit.sales_rep_id)
        .bind(to_column(audit.prospecting_actions))
        .bind(to_column(audit.discovery_meetings))
        .bind(to_column(audit.proposals_sent))
        .bind(to_column(audit.signed_proposals))
        .bind(to_column(audit.revenue))
        .bind(&audit.flash_test_objection)
        .bind(audit.flash_test_passed)
        .bind(&audit.recognition_note)
        .bind(i32::from(audit.total_score))
        .fetch_one(self.pool)
        .await?;

        row.try_into()
    }

    /// Latest scores for one manager/rep pair, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored score is out of range.
    pub async fn recent_scores(
        &self,
        manager_email: &Email,
        sales_rep_name: &str,
        limit: usize,
    ) -> Result<Vec<ScorePoint>, RepositoryError> {
        let rows = sqlx::query_as::<_, ScorePointRow>(
            r"
            SELECT total_score, created_at
            FROM audits
            WHERE manager_email = $1 AND sales_rep_name = $2
            ORDER BY created_at DESC
            LIMIT $3
            ",
        )
        .bind(manager_email)
        .bind(sales_rep_name)
        .bind(sql_limit(limit))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Latest audits across all managers, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a row is invalid.
    pub async fn recent(&self, limit: usize) -> Result<Vec<AuditSummary>, RepositoryError> {
        let rows = sqlx::query_as::<_, AuditSummaryRow>(
            r"
            SELECT id, manager_email, sales_rep_name, total_score, created_at
            FROM audits
            ORDER BY created_at DESC
            LIMIT $1
            ",
        )
        .bind(sql_limit(limit))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }
}
