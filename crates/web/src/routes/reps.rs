//! Rep management route handlers.

use axum::{
    Form,
    extract::{Path, State},
    response::Redirect,
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use sales_pulse_core::SalesRepId;

use crate::error::{Result, add_breadcrumb};
use crate::models::NewSalesRep;
use crate::services::{PulseService, SessionMirror};
use crate::state::AppState;

/// Add rep form data.
#[derive(Debug, Deserialize)]
pub struct NewRepForm {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Add a rep.
///
/// POST /reps
///
/// A store failure still adds the rep to this session's list.
#[instrument(skip(state, session, form), fields(name = %form.name))]
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<NewRepForm>,
) -> Result<Redirect> {
    let rep = NewSalesRep::new(&form.name, form.email.as_deref())?;

    let mirror = SessionMirror::new(session);
    let outcome = PulseService::new(state.store(), &mirror).add_rep(rep).await;
    add_breadcrumb(
        "reps",
        "Added rep",
        &[("degraded", bool_str(outcome.is_degraded()))],
    );

    Ok(Redirect::to("/"))
}

/// Delete a rep. Past audits keep the rep's name.
///
/// POST /reps/{id}/delete
#[instrument(skip(state, session))]
pub async fn delete(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<SalesRepId>,
) -> Result<Redirect> {
    let mirror = SessionMirror::new(session);
    let outcome = PulseService::new(state.store(), &mirror)
        .delete_rep(id)
        .await?;
    add_breadcrumb(
        "reps",
        "Deleted rep",
        &[("degraded", bool_str(outcome.is_degraded()))],
    );

    Ok(Redirect::to("/"))
}

const fn bool_str(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}
