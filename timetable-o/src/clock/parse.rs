/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Lenient parsers for the loosely-typed room fields.
//!
//! These are free functions rather than methods so they can be used and tested
//! independently of [`Room`](crate::catalog::Room).  None of them fail hard:
//! malformed input yields `None` (or lands in the `unknown` list) and the
//! caller decides which default applies.

use super::{OperatingWindow, TimeOfDay, Weekday};

/// Parse `"HH:MM"` or `"HH:MM:SS"` into a [`TimeOfDay`].
///
/// Seconds are accepted but dropped (the engine works at minute resolution).
/// `"24:00"` is accepted; anything later, empty strings and non-numeric parts
/// return `None`.
pub fn parse_time_of_day(raw: &str) -> Option<TimeOfDay> {
    let mut parts = raw.trim().split(':');
    let hour: u16 = parts.next()?.trim().parse().ok()?;
    let minute: u16 = parts.next()?.trim().parse().ok()?;
    if let Some(seconds) = parts.next() {
        let seconds: u16 = seconds.trim().parse().ok()?;
        if seconds >= 60 {
            return None;
        }
    }
    if parts.next().is_some() {
        return None;
    }
    TimeOfDay::from_hm(hour, minute)
}

/// Resolve a room's operating window from its optional hour fields.
///
/// Each bound falls back independently to the matching bound of `default`
/// when missing, empty or malformed.  If the resolved bounds are inverted
/// (`open >= close`) the whole `default` window is used.
///
/// Returns the window plus a flag telling whether any fallback was applied.
pub fn resolve_window(
    start: Option<&str>,
    end: Option<&str>,
    default: OperatingWindow,
) -> (OperatingWindow, bool) {
    let open = start.and_then(parse_time_of_day);
    let close = end.and_then(parse_time_of_day);
    let mut defaulted = open.is_none() || close.is_none();

    let window = OperatingWindow::new(
        open.unwrap_or(default.open),
        close.unwrap_or(default.close),
    )
    .unwrap_or_else(|| {
        defaulted = true;
        default
    });

    (window, defaulted)
}

/// Split a comma-separated weekday list (`"Mon,Tue,Wed"`).
///
/// Returns the recognised days (calendar-sorted, de-duplicated) and the raw
/// tokens that did not name a teaching day.  Empty tokens are skipped.
pub fn parse_weekdays<'a, I>(tokens: I) -> (Vec<Weekday>, Vec<String>)
where
    I: IntoIterator<Item = &'a str>,
{
    let mut days = Vec::new();
    let mut unknown = Vec::new();

    for token in tokens {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        match Weekday::from_code(token) {
            Some(day) => days.push(day),
            None => unknown.push(token.to_string()),
        }
    }

    days.sort_unstable();
    days.dedup();
    (days, unknown)
}

/// Convert fractional hours into whole minutes, rounding to the nearest
/// minute (`2.67h` → `160`).  Non-finite or non-positive input yields `0`.
pub fn hours_to_minutes(hours: f64) -> u16 {
    if !hours.is_finite() || hours <= 0.0 {
        return 0;
    }
    let minutes = (hours * 60.0).round();
    if minutes >= f64::from(u16::MAX) {
        u16::MAX
    } else {
        minutes as u16
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u16, m: u16) -> TimeOfDay {
        TimeOfDay::from_hm(h, m).unwrap()
    }

    // ── parse_time_of_day ─────────────────────────────────────────────────────

    #[test]
    fn parses_both_hh_mm_and_hh_mm_ss() {
        assert_eq!(parse_time_of_day("07:00"), Some(t(7, 0)));
        assert_eq!(parse_time_of_day("21:00:00"), Some(t(21, 0)));
        assert_eq!(parse_time_of_day(" 9:05:30 "), Some(t(9, 5)));
    }

    #[test]
    fn accepts_midnight_as_end_of_day() {
        assert_eq!(parse_time_of_day("24:00:00").map(|v| v.minutes()), Some(1440));
        assert_eq!(parse_time_of_day("24:30"), None);
    }

    #[test]
    fn malformed_times_are_none() {
        for raw in ["", "7", "7am", "07:xx", "07:00:99", "07:00:00:00", "-1:00", "25:00"] {
            assert_eq!(parse_time_of_day(raw), None, "input {raw:?}");
        }
    }

    // ── resolve_window ────────────────────────────────────────────────────────

    #[test]
    fn well_formed_window_is_used_as_is() {
        let (w, defaulted) = resolve_window(Some("07:00:00"), Some("21:00:00"), OperatingWindow::DEFAULT);
        assert_eq!(w, OperatingWindow::new(t(7, 0), t(21, 0)).unwrap());
        assert!(!defaulted);
    }

    #[test]
    fn missing_fields_fall_back_per_bound() {
        let (w, defaulted) = resolve_window(None, Some("20:00"), OperatingWindow::DEFAULT);
        assert_eq!(w.open, t(8, 0));
        assert_eq!(w.close, t(20, 0));
        assert!(defaulted);

        let (w, _) = resolve_window(Some(""), Some("garbage"), OperatingWindow::DEFAULT);
        assert_eq!(w, OperatingWindow::DEFAULT);
    }

    #[test]
    fn inverted_window_falls_back_entirely() {
        // close defaults to 18:00, which is before the 19:00 opening
        let (w, defaulted) = resolve_window(Some("19:00"), None, OperatingWindow::DEFAULT);
        assert_eq!(w, OperatingWindow::DEFAULT);
        assert!(defaulted);
    }

    // ── parse_weekdays ────────────────────────────────────────────────────────

    #[test]
    fn weekday_list_is_sorted_and_deduplicated() {
        let (days, unknown) = parse_weekdays("Sat,Mon, Wed,Mon".split(','));
        assert_eq!(days, vec![Weekday::Mon, Weekday::Wed, Weekday::Sat]);
        assert!(unknown.is_empty());
    }

    #[test]
    fn unknown_tokens_are_reported_not_fatal() {
        let (days, unknown) = parse_weekdays(["Mon", "Sun", "", "Holiday"]);
        assert_eq!(days, vec![Weekday::Mon]);
        assert_eq!(unknown, vec!["Sun".to_string(), "Holiday".to_string()]);
    }

    // ── hours_to_minutes ──────────────────────────────────────────────────────

    #[test]
    fn fractional_hours_round_to_nearest_minute() {
        assert_eq!(hours_to_minutes(4.0), 240);
        assert_eq!(hours_to_minutes(2.67), 160);
        assert_eq!(hours_to_minutes(1.34), 80);
    }

    #[test]
    fn non_positive_or_nan_hours_are_zero() {
        assert_eq!(hours_to_minutes(0.0), 0);
        assert_eq!(hours_to_minutes(-2.0), 0);
        assert_eq!(hours_to_minutes(f64::NAN), 0);
    }
}
