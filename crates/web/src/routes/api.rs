//! JSON API route handlers.
//!
//! Same data as the pages, with the degraded flag made explicit.

use axum::{Json, extract::State};
use serde::Serialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::models::{AuditSummary, SalesRep};
use crate::services::{Outcome, PulseService, SessionMirror};
use crate::state::AppState;

/// Envelope for every API response.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub degraded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub items: T,
}

impl<T> From<Outcome<T>> for ApiResponse<T> {
    fn from(outcome: Outcome<T>) -> Self {
        match outcome {
            Outcome::Live(items) => Self {
                degraded: false,
                reason: None,
                items,
            },
            Outcome::Degraded { value, reason } => Self {
                degraded: true,
                reason: Some(reason),
                items: value,
            },
        }
    }
}

/// List reps, seeding the defaults on first use.
///
/// GET /api/reps
#[instrument(skip(state, session))]
pub async fn reps(State(state): State<AppState>, session: Session) -> Json<ApiResponse<Vec<SalesRep>>> {
    let mirror = SessionMirror::new(session);
    let outcome = PulseService::new(state.store(), &mirror).list_reps().await;
    Json(outcome.into())
}

/// Last 50 audits, newest first.
///
/// GET /api/audits/recent
#[instrument(skip(state, session))]
pub async fn recent_audits(
    State(state): State<AppState>,
    session: Session,
) -> Json<ApiResponse<Vec<AuditSummary>>> {
    let mirror = SessionMirror::new(session);
    let outcome = PulseService::new(state.store(), &mirror)
        .recent_audits()
        .await;
    Json(outcome.into())
}
