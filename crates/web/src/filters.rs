//! Custom Askama template filters and display helpers.

use std::fmt::Display;

use chrono::{DateTime, Datelike, Utc};

use sales_pulse_core::ScoreBand;

/// Abbreviated French month names, January first.
const FRENCH_MONTHS: [&str; 12] = [
    "janv.", "févr.", "mars", "avr.", "mai", "juin", "juil.", "août", "sept.", "oct.", "nov.",
    "déc.",
];

/// CSS modifier for a score: `high`, `medium` or `low`.
///
/// Usage in templates: `<td class="score score--{{ audit.total_score|score_band }}">`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn score_band(score: impl Display, _env: &dyn askama::Values) -> askama::Result<&'static str> {
    let score = score.to_string().parse::<u8>().unwrap_or_default();
    Ok(ScoreBand::of(score).as_str())
}

/// Short French date, e.g. `12 janv. 2026`.
#[must_use]
pub fn french_short_date(date: &DateTime<Utc>) -> String {
    let month = usize::try_from(date.month0())
        .ok()
        .and_then(|m| FRENCH_MONTHS.get(m))
        .copied()
        .unwrap_or_default();
    format!("{} {} {}", date.day(), month, date.year())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_french_short_date() {
        let date = Utc.with_ymd_and_hms(2026, 1, 12, 9, 30, 0).unwrap();
        assert_eq!(french_short_date(&date), "12 janv. 2026");

        let date = Utc.with_ymd_and_hms(2025, 8, 3, 0, 0, 0).unwrap();
        assert_eq!(french_short_date(&date), "3 août 2025");
    }
}
