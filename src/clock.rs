//! Clock-time parsing and minute arithmetic.
//!
//! Times are wall-clock `HH:MM` values with no date attached; arithmetic
//! wraps at midnight. Parsing is strict: one or two hour digits, exactly
//! two minute digits, in range. Anything else is treated as absent rather
//! than an error, and callers degrade the affected output.

use chrono::{NaiveTime, Timelike};

use crate::domain::TimeCount;

/// Fibonacci minute counts projected forward from the pivot.
pub const FIB_TIME_COUNTS: [u32; 3] = [13, 21, 34];

const MACRO_SKIPPED: &str = "No time or bad format. Macro window check skipped.";
const MACRO_INSIDE: &str = "Inside macro window (:45–:15) — expansion probability ↑";
const MACRO_OUTSIDE: &str = "Outside macro window (:15–:45) — consolidation probability ↑";

/// Parse `H:MM` / `HH:MM` into a time of day.
pub fn parse_clock(text: &str) -> Option<NaiveTime> {
    let trimmed = text.trim();
    let (hh, mm) = trimmed.split_once(':')?;
    if hh.is_empty() || hh.len() > 2 || mm.len() != 2 {
        return None;
    }
    if !hh.bytes().all(|b| b.is_ascii_digit()) || !mm.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let hour: u32 = hh.parse().ok()?;
    let minute: u32 = mm.parse().ok()?;
    NaiveTime::from_hms_opt(hour, minute, 0)
}

/// Minutes from `a` forward to `b`, wrapping past midnight.
///
/// Always in `0..1440`; equal times give 0.
pub fn minutes_between(a: NaiveTime, b: NaiveTime) -> i64 {
    let delta = b.signed_duration_since(a).num_minutes();
    if delta < 0 { delta + 24 * 60 } else { delta }
}

/// Add minutes to a time of day, wrapping at midnight.
pub fn add_minutes(t: NaiveTime, minutes: i64) -> NaiveTime {
    let (wrapped, _) = t.overflowing_add_signed(chrono::Duration::minutes(minutes));
    wrapped
}

pub fn fmt_clock(t: NaiveTime) -> String {
    format!("{:02}:{:02}", t.hour(), t.minute())
}

/// Project the Fibonacci minute counts forward from the pivot text.
///
/// When the pivot is absent or malformed the counts still come back,
/// just without projected clocks.
pub fn time_counts_from_pivot(pivot_text: Option<&str>) -> Vec<TimeCount> {
    let pivot = pivot_text.and_then(parse_clock);
    FIB_TIME_COUNTS
        .iter()
        .map(|&count| TimeCount {
            count,
            clock: pivot.map(|t| fmt_clock(add_minutes(t, i64::from(count)))),
        })
        .collect()
}

/// Classify a clock time against the :45-:15 macro window.
pub fn macro_window_hint(text: &str) -> String {
    match parse_clock(text) {
        None => MACRO_SKIPPED.to_string(),
        Some(t) => {
            let minute = t.minute();
            if minute >= 45 || minute < 15 {
                MACRO_INSIDE.to_string()
            } else {
                MACRO_OUTSIDE.to_string()
            }
        }
    }
}
