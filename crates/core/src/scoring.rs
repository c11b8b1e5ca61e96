//! Weekly score computation.
//!
//! A week is worth at most 100 points:
//!
//! | Component | Points |
//! |-----------|--------|
//! | Activity (KPIs), weighted and normalized | 0-40 |
//! | Flash test passed | 0 or 30 |
//! | Recognition note longer than 10 characters | 0 or 30 |
//!
//! The weights, the normalizer and the thresholds are business tuning values
//! and are kept verbatim. The recognition bonus only looks at the note's
//! length, not its content.

/// Weight of one prospecting action.
pub const PROSPECTING_WEIGHT: f64 = 1.0;
/// Weight of one discovery meeting.
pub const DISCOVERY_MEETING_WEIGHT: f64 = 3.0;
/// Weight of one proposal sent.
pub const PROPOSAL_WEIGHT: f64 = 5.0;
/// Weight of one signed proposal.
pub const SIGNED_PROPOSAL_WEIGHT: f64 = 8.0;
/// Revenue is counted per thousand currency units.
pub const REVENUE_DIVISOR: f64 = 1000.0;
/// Fixed normalization constant applied to the weighted activity sum.
pub const KPI_NORMALIZER: f64 = 3.0;
/// Maximum points the activity component can contribute.
pub const KPI_CAP: f64 = 40.0;
/// Points awarded for passing the flash test.
pub const FLASH_TEST_BONUS: f64 = 30.0;
/// Points awarded for a recognition note over the length threshold.
pub const RECOGNITION_BONUS: f64 = 30.0;
/// A recognition note must be strictly longer than this (in characters).
pub const RECOGNITION_MIN_CHARS: usize = 10;

/// Largest counter value accepted from a form; keeps every value storable
/// in a `PostgreSQL` `INTEGER`.
pub const MAX_COUNT: u32 = i32::MAX.unsigned_abs();

/// Raw inputs for one weekly score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreInputs<'a> {
    pub prospecting_actions: u32,
    pub discovery_meetings: u32,
    pub proposals_sent: u32,
    pub signed_proposals: u32,
    /// Revenue in whole currency units.
    pub revenue: u32,
    pub flash_test_passed: bool,
    pub recognition_note: &'a str,
}

/// Compute the weekly score, always in `0..=100`.
///
/// ```
/// use sales_pulse_core::{ScoreInputs, compute_score};
///
/// let inputs = ScoreInputs {
///     flash_test_passed: true,
///     recognition_note: "12 characters",
///     ..ScoreInputs::default()
/// };
/// assert_eq!(compute_score(&inputs), 60);
/// ```
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn compute_score(inputs: &ScoreInputs<'_>) -> u8 {
    let kpi_raw = f64::from(inputs.prospecting_actions) * PROSPECTING_WEIGHT
        + f64::from(inputs.discovery_meetings) * DISCOVERY_MEETING_WEIGHT
        + f64::from(inputs.proposals_sent) * PROPOSAL_WEIGHT
        + f64::from(inputs.signed_proposals) * SIGNED_PROPOSAL_WEIGHT
        + f64::from(inputs.revenue) / REVENUE_DIVISOR;
    let kpi_score = (kpi_raw / KPI_NORMALIZER).min(KPI_CAP);

    let flash_score = if inputs.flash_test_passed {
        FLASH_TEST_BONUS
    } else {
        0.0
    };

    let recognition_score = if inputs.recognition_note.chars().count() > RECOGNITION_MIN_CHARS {
        RECOGNITION_BONUS
    } else {
        0.0
    };

    let total = (kpi_score + flash_score + recognition_score).round();

    // Every component is non-negative and the sum tops out at 100.
    total.clamp(0.0, 100.0) as u8
}

/// Parse a counter typed into a form.
///
/// Leading ASCII digits are kept (`"12 rdv"` is 12); empty, negative or
/// non-numeric input counts as 0. Values saturate at [`MAX_COUNT`].
#[must_use]
pub fn parse_count(raw: &str) -> u32 {
    let digits: &str = {
        let trimmed = raw.trim_start();
        let end = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        trimmed.get(..end).unwrap_or_default()
    };

    if digits.is_empty() {
        return 0;
    }

    digits.parse::<u32>().map_or(MAX_COUNT, |n| n.min(MAX_COUNT))
}
