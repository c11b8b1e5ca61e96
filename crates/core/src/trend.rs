//! Week-over-week trend between the two most recent scores.

use serde::{Deserialize, Serialize};

/// Score changes within this many points either way are reported as stable.
pub const TREND_DEAD_ZONE: i32 = 5;

/// How many past scores the history view keeps.
pub const HISTORY_LENGTH: usize = 5;

/// Direction of the latest change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
    Stable,
}

impl TrendDirection {
    /// Lowercase name, as used in CSS classes and the JSON API.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Stable => "stable",
        }
    }
}

/// Trend between the previous score and the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trend {
    pub direction: TrendDirection,
    /// `|current - previous| / previous` as a rounded percentage.
    ///
    /// `None` when the previous score is 0, where a relative change has no
    /// meaning; only the direction is reported then.
    pub magnitude_percent: Option<u32>,
}

/// Compare the last two entries of `scores` (ordered oldest to newest).
///
/// Returns `None` with fewer than two scores.
///
/// ```
/// use sales_pulse_core::{TrendDirection, compute_trend};
///
/// let trend = compute_trend(&[50, 60]).unwrap();
/// assert_eq!(trend.direction, TrendDirection::Up);
/// assert_eq!(trend.magnitude_percent, Some(20));
/// ```
#[must_use]
pub fn compute_trend(scores: &[u8]) -> Option<Trend> {
    let [.., previous, current] = scores else {
        return None;
    };

    let diff = i32::from(*current) - i32::from(*previous);
    let direction = if diff > TREND_DEAD_ZONE {
        TrendDirection::Up
    } else if diff < -TREND_DEAD_ZONE {
        TrendDirection::Down
    } else {
        TrendDirection::Stable
    };

    let magnitude_percent = (*previous != 0).then(|| {
        let ratio = f64::from(diff.unsigned_abs()) / f64::from(*previous) * 100.0;
        // diff is at most 255 and previous at least 1, so this fits easily.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let percent = ratio.round() as u32;
        percent
    });

    Some(Trend {
        direction,
        magnitude_percent,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_needs_two_scores() {
        assert_eq!(compute_trend(&[]), None);
        assert_eq!(compute_trend(&[70]), None);
    }

    #[test]
    fn test_up() {
        let trend = compute_trend(&[50, 60]).unwrap();
        assert_eq!(trend.direction, TrendDirection::Up);
        assert_eq!(trend.magnitude_percent, Some(20));
    }

    #[test]
    fn test_down() {
        let trend = compute_trend(&[80, 60]).unwrap();
        assert_eq!(trend.direction, TrendDirection::Down);
        assert_eq!(trend.magnitude_percent, Some(25));
    }

    #[test]
    fn test_dead_zone_is_stable() {
        let trend = compute_trend(&[50, 48]).unwrap();
        assert_eq!(trend.direction, TrendDirection::Stable);
        assert_eq!(trend.magnitude_percent, Some(4));

        assert_eq!(
            compute_trend(&[50, 55]).unwrap().direction,
            TrendDirection::Stable
        );
        assert_eq!(
            compute_trend(&[50, 45]).unwrap().direction,
            TrendDirection::Stable
        );
        assert_eq!(
            compute_trend(&[50, 56]).unwrap().direction,
            TrendDirection::Up
        );
        assert_eq!(
            compute_trend(&[50, 44]).unwrap().direction,
            TrendDirection::Down
        );
    }

    #[test]
    fn test_only_last_two_count() {
        let trend = compute_trend(&[10, 90, 30, 40, 40]).unwrap();
        assert_eq!(trend.direction, TrendDirection::Stable);
        assert_eq!(trend.magnitude_percent, Some(0));
    }

    #[test]
    fn test_previous_zero_reports_direction_only() {
        let trend = compute_trend(&[0, 60]).unwrap();
        assert_eq!(trend.direction, TrendDirection::Up);
        assert_eq!(trend.magnitude_percent, None);

        let flat = compute_trend(&[0, 0]).unwrap();
        assert_eq!(flat.direction, TrendDirection::Stable);
        assert_eq!(flat.magnitude_percent, None);
    }

    #[test]
    fn test_magnitude_rounds_half_up() {
        // 1/8 = 12.5% -> 13
        let trend = compute_trend(&[8, 7]).unwrap();
        assert_eq!(trend.magnitude_percent, Some(13));
    }

    #[test]
    fn test_direction_serializes_lowercase() {
        let json = serde_json::to_string(&TrendDirection::Down).unwrap();
        assert_eq!(json, "\"down\"");
        assert_eq!(TrendDirection::Up.as_str(), "up");
    }
}
