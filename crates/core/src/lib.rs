//! Sales Weekly Pulse Core - scoring rules and shared types.
//!
//! This crate holds everything about a weekly audit that does not touch I/O:
//!
//! - [`scoring`] - turn a week's raw inputs into a 0-100 score
//! - [`trend`] - compare the two most recent scores of a manager/rep pair
//! - [`wizard`] - the five-step audit form and its gating rules
//! - [`summary`] - dashboard aggregates over recent audits
//! - [`types`] - newtype IDs and the manager email
//!
//! The `web` crate owns persistence, sessions and HTTP; this crate stays
//! free of them so the rules can be tested in isolation.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod scoring;
pub mod summary;
pub mod trend;
pub mod types;
pub mod wizard;

pub use scoring::{ScoreInputs, compute_score, parse_count};
pub use summary::{AuditStats, ScoreBand};
pub use trend::{Trend, TrendDirection, compute_trend};
pub use types::*;
pub use wizard::{AuditDraft, OBJECTIONS, Wizard, WizardError, WizardStep};
