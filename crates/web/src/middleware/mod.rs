//! HTTP middleware stack.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request tracing)
//! 3. Security headers
//! 4. Session layer (tower-sessions with an in-memory store)

pub mod security_headers;
pub mod session;

pub use security_headers::security_headers_middleware;
pub use session::create_session_layer;
