//! Domain models.

pub mod audit;
pub mod sales_rep;
pub mod session;

pub use audit::{Audit, AuditSummary, NewAudit, ScorePoint};
pub use sales_rep::{DEFAULT_REPS, NewSalesRep, SalesRep, SalesRepError};
pub use session::{MirrorData, SubmissionView, keys as session_keys};
