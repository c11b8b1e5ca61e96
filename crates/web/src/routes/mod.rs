//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Wizard (current step)
//! POST /wizard/next            - Save the step's fields and advance
//! POST /wizard/back            - Save the step's fields and go back
//! POST /wizard/reset           - Start a new audit
//!
//! # Reps
//! POST /reps                   - Add a rep
//! POST /reps/{id}/delete       - Delete a rep
//!
//! # Dashboard
//! GET  /dashboard              - Aggregates and the last 50 audits
//!
//! # JSON API
//! GET  /api/reps               - Rep list
//! GET  /api/audits/recent      - Last 50 audits
//! ```

pub mod api;
pub mod dashboard;
pub mod reps;
pub mod wizard;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the wizard routes router.
pub fn wizard_routes() -> Router<AppState> {
    Router::new()
        .route("/next", post(wizard::next))
        .route("/back", post(wizard::back))
        .route("/reset", post(wizard::reset))
}

/// Create the rep management routes router.
pub fn rep_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(reps::create))
        .route("/{id}/delete", post(reps::delete))
}

/// Create the JSON API routes router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/reps", get(api::reps))
        .route("/audits/recent", get(api::recent_audits))
}

/// Create all page and API routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(wizard::show))
        .route("/dashboard", get(dashboard::show))
        .nest("/wizard", wizard_routes())
        .nest("/reps", rep_routes())
        .nest("/api", api_routes())
}
