//! Dashboard aggregates over recent audits.

use serde::{Deserialize, Serialize};

/// Scores at or above this are shown as strong weeks.
pub const HIGH_SCORE_THRESHOLD: u8 = 80;
/// Scores at or above this (and below [`HIGH_SCORE_THRESHOLD`]) are average.
pub const MEDIUM_SCORE_THRESHOLD: u8 = 50;

/// Coarse grading of a score, used to color the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreBand {
    High,
    Medium,
    Low,
}

impl ScoreBand {
    /// Band for a single score.
    #[must_use]
    pub const fn of(score: u8) -> Self {
        if score >= HIGH_SCORE_THRESHOLD {
            Self::High
        } else if score >= MEDIUM_SCORE_THRESHOLD {
            Self::Medium
        } else {
            Self::Low
        }
    }

    /// Lowercase name, used as a CSS modifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

/// Headline numbers shown above the audit table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStats {
    /// Number of audits considered.
    pub count: usize,
    /// Rounded mean score, 0 when there are no audits.
    pub average: u8,
    /// Highest score, 0 when there are no audits.
    pub best: u8,
}

impl AuditStats {
    /// Aggregate a list of scores.
    ///
    /// ```
    /// use sales_pulse_core::AuditStats;
    ///
    /// let stats = AuditStats::from_scores([40, 61, 90]);
    /// assert_eq!(stats.count, 3);
    /// assert_eq!(stats.average, 64);
    /// assert_eq!(stats.best, 90);
    /// ```
    pub fn from_scores(scores: impl IntoIterator<Item = u8>) -> Self {
        let (count, sum, best) = scores
            .into_iter()
            .fold((0_usize, 0_u64, 0_u8), |(count, sum, best), score| {
                (count + 1, sum + u64::from(score), best.max(score))
            });

        if count == 0 {
            return Self::default();
        }

        // The mean of u8 values is itself within u8 range.
        #[allow(
            clippy::cast_precision_loss,
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss
        )]
        let average = (sum as f64 / count as f64).round() as u8;

        Self {
            count,
            average,
            best,
        }
    }
}
