//! Shared identity types for Sales Weekly Pulse.

pub mod email;
pub mod id;

pub use email::{Email, EmailError};
pub use id::*;
