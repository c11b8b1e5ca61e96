//! Dashboard route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tower_sessions::Session;
use tracing::instrument;

use sales_pulse_core::AuditStats;

use crate::error::Result;
use crate::filters::{self, french_short_date};
use crate::models::AuditSummary;
use crate::services::{PulseService, SessionMirror};
use crate::state::AppState;

/// One line of the audit table.
#[derive(Debug, Clone)]
pub struct AuditLine {
    pub date: String,
    pub sales_rep_name: String,
    pub manager_email: String,
    pub total_score: u8,
}

impl From<&AuditSummary> for AuditLine {
    fn from(audit: &AuditSummary) -> Self {
        Self {
            date: french_short_date(&audit.created_at),
            sales_rep_name: audit.sales_rep_name.clone(),
            manager_email: audit.manager_email.to_string(),
            total_score: audit.total_score,
        }
    }
}

/// Dashboard page template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub stats: AuditStats,
    pub audits: Vec<AuditLine>,
    pub degraded: bool,
}

/// Display the dashboard.
///
/// GET /dashboard
///
/// Aggregates are computed over the audits listed, never over more.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<impl IntoResponse> {
    let mirror = SessionMirror::new(session);
    let outcome = PulseService::new(state.store(), &mirror)
        .recent_audits()
        .await;

    let degraded = outcome.is_degraded();
    let audits = outcome.into_value();
    let stats = AuditStats::from_scores(audits.iter().map(|a| a.total_score));

    Ok(DashboardTemplate {
        stats,
        audits: audits.iter().map(AuditLine::from).collect(),
        degraded,
    })
}
