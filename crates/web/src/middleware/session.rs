//! Session middleware configuration.
//!
//! Sessions hold the wizard draft and the local mirror. They live in process
//! memory rather than in `PostgreSQL`, so they keep working while the
//! database is down.

use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::config::PulseConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "pulse_session";

/// Session expiry time in seconds (30 days).
const SESSION_EXPIRY_SECONDS: i64 = 30 * 24 * 60 * 60;

/// Create the session layer with an in-memory store.
#[must_use]
pub fn create_session_layer(config: &PulseConfig) -> SessionManagerLayer<MemoryStore> {
    SessionManagerLayer::new(MemoryStore::default())
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
