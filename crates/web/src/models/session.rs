//! Values stored in the browser session.
//!
//! The session outlives database outages (it is held in process memory),
//! which is what makes it usable as the local mirror.

use serde::{Deserialize, Serialize};

use super::{Audit, SalesRep, ScorePoint};
use sales_pulse_core::Trend;

/// Outcome of the last wizard submission, kept so the results step can be
/// re-rendered without submitting again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionView {
    pub audit: Audit,
    /// Oldest to newest, at most five entries, including this audit.
    pub history: Vec<ScorePoint>,
    pub trend: Option<Trend>,
    pub degraded: bool,
}

/// Best-effort copy of this browser's audits and rep list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MirrorData {
    /// Oldest first, in submission order.
    pub audits: Vec<Audit>,
    /// `None` until a rep list has been seen or edited in this session.
    pub reps: Option<Vec<SalesRep>>,
}

/// Session keys.
pub mod keys {
    /// Current wizard step and draft.
    pub const WIZARD: &str = "pulse_wizard";

    /// Last submission shown on the results step.
    pub const SUBMISSION: &str = "pulse_submission";

    /// Local mirror of audits and reps.
    pub const MIRROR: &str = "pulse_mirror";
}
