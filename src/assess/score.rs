//! A+ setup checklist.
//!
//! Eight named criteria. Seven evaluate automatically and feed the score;
//! criterion 7 is always a manual chart check recorded as text, so the
//! maximum score is 7. Ids carry a numeric prefix so map order matches
//! checklist order everywhere they are shown.

use std::collections::BTreeMap;

use chrono::NaiveTime;

use crate::clock::FIB_TIME_COUNTS;
use crate::domain::{ContextFlags, CriterionValue, ScoreResult};

/// Absolute impulse range (points) treated as a break of structure.
pub const STRUCTURE_BREAK_POINTS: f64 = 20.0;

const TRIGGER_NOTE: &str = "Engulfing / displacement / BOS within 3 bars of time line";

/// Inputs for one checklist evaluation.
#[derive(Debug, Clone, Copy)]
pub struct ScoreInputs {
    pub price_start: f64,
    pub price_end: f64,
    pub bars: u32,
    pub retrace_price: Option<f64>,
    pub retrace_bars: Option<u32>,
    pub pivot_time: Option<NaiveTime>,
    pub tol_bars: u32,
    pub flags: ContextFlags,
}

/// Evaluate the checklist.
///
/// Missing observations fail their criterion rather than erroring, so a
/// sparse input still scores.
pub fn score_setup(inputs: &ScoreInputs) -> ScoreResult {
    let range = (inputs.price_end - inputs.price_start).abs().max(1e-9);
    let depth = inputs
        .retrace_price
        .filter(|rp| rp.is_finite())
        .map(|rp| (inputs.price_end - rp).abs() / range);
    let time_ratio = inputs
        .retrace_bars
        .map(|rb| f64::from(rb) / f64::from(inputs.bars.max(1)));

    // Small tolerance on the price band so a retrace printed exactly at a
    // level is not lost to binary representation.
    let price_in_zone = depth.is_some_and(|d| d >= 0.5 - 1e-6 && d <= 0.618 + 1e-6);
    let time_proportionate = time_ratio.is_some_and(|r| (0.382..=0.618).contains(&r));
    let count_hit = inputs.pivot_time.is_some()
        && inputs.retrace_bars.is_some_and(|rb| {
            FIB_TIME_COUNTS
                .iter()
                .any(|&count| (i64::from(rb) - i64::from(count)).abs() <= i64::from(inputs.tol_bars))
        });
    let broke_structure =
        (inputs.price_end - inputs.price_start).abs() >= STRUCTURE_BREAK_POINTS;
    let no_deep_trap = !inputs.flags.ifvg_deep;
    let liquidity_ok = !inputs.flags.both_sides_swept;
    let no_time_distortion = !inputs.flags.both_sides_swept;

    let mut score = 0u8;
    let mut details = BTreeMap::new();
    let mut put = |id: &str, pass: bool| {
        if pass {
            score += 1;
        }
        details.insert(id.to_string(), CriterionValue::Flag(pass));
    };

    put("1_price_0.5_0.618", price_in_zone);
    put("2_time_proportion", time_proportionate);
    put("3_fib_count_hit", count_hit);
    put("4_anchor_broke_structure", broke_structure);
    put("5_no_0.786_close_proxy", no_deep_trap);
    put("6_liquidity_context_proxy", liquidity_ok);
    put("8_not_time_distortion_proxy", no_time_distortion);
    details.insert(
        "7_trigger_manual".to_string(),
        CriterionValue::Note(TRIGGER_NOTE.to_string()),
    );

    ScoreResult { score, details }
}

/// Map a score onto the badge severity used by the front ends.
pub fn quality_class(score: u8) -> crate::domain::BadgeClass {
    use crate::domain::BadgeClass;
    if score >= 6 {
        BadgeClass::Good
    } else if score >= 4 {
        BadgeClass::Warn
    } else {
        BadgeClass::Risk
    }
}
