//! Shared analysis pipeline used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! validate -> resolve bars -> levels/time counts -> assess -> score -> badge
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use crate::assess::{analyze_retrace, bias_badge, contextual_advice, resolve_bias, score_setup};
use crate::assess::score::ScoreInputs;
use crate::clock::{fmt_clock, macro_window_hint, minutes_between, parse_clock, time_counts_from_pivot};
use crate::domain::{
    AnalysisInput, Assessment, BiasBadge, BiasSide, Direction, ExpectedBarsRange, ImpulseSummary,
    LevelSet, ScoreResult, TimeCount,
};
use crate::error::AppError;
use crate::levels::{expected_retrace_bars, extension_levels, retracement_levels, round2};
use serde::Serialize;

/// All computed outputs of a single analysis run.
///
/// Serializes as the JSON result bundle the export writes.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisOutput {
    pub impulse: ImpulseSummary,
    pub macro_hint: String,
    pub expected_bars: ExpectedBarsRange,
    pub retracements: LevelSet,
    pub extensions: LevelSet,
    pub time_counts: Vec<TimeCount>,
    pub assessment: Assessment,
    pub advice: String,
    pub score: ScoreResult,
    pub bias: BiasSide,
    pub badge: BiasBadge,
}

/// Execute the full analysis and return the computed outputs.
pub fn run_analysis(input: &AnalysisInput) -> Result<AnalysisOutput, AppError> {
    // 1) Validate the anchors.
    if !(input.price_start.is_finite() && input.price_end.is_finite()) {
        return Err(AppError::input("Please provide valid A and B prices."));
    }

    // 2) Resolve the impulse length. A positive duration between the two
    //    clock times overrides the explicit bar count.
    let start = parse_clock(&input.start_time);
    let pivot = parse_clock(&input.pivot_time);
    let derived = start
        .zip(pivot)
        .map(|(s, p)| minutes_between(s, p))
        .filter(|&m| m > 0);
    let bars = match derived {
        Some(minutes) => minutes as u32,
        None => match input.bars {
            Some(n) if n >= 1 => n,
            Some(_) => return Err(AppError::input("Bar count must be at least 1.")),
            None => {
                return Err(AppError::input(
                    "Provide a bar count or both start and pivot times.",
                ));
            }
        },
    };

    // 3) Levels and time projections.
    let retracements = retracement_levels(input.price_start, input.price_end);
    let extensions = extension_levels(input.price_start, input.price_end);
    let expected_bars = expected_retrace_bars(bars);
    let pivot_text = input.pivot_time.trim();
    let time_counts = time_counts_from_pivot((!pivot_text.is_empty()).then_some(pivot_text));

    // 4) Macro window, falling back to the pivot when "now" is blank.
    let now_text = input.now_time.trim();
    let macro_hint = macro_window_hint(if now_text.is_empty() { pivot_text } else { now_text });

    // 5) Assessment, advice, score, badge.
    let assessment = analyze_retrace(
        input.price_start,
        input.price_end,
        input.retrace_price,
        bars,
        input.retrace_bars,
    );
    let advice = contextual_advice(input.flags);
    let score = score_setup(&ScoreInputs {
        price_start: input.price_start,
        price_end: input.price_end,
        bars,
        retrace_price: input.retrace_price,
        retrace_bars: input.retrace_bars,
        pivot_time: pivot,
        tol_bars: input.tol_bars,
        flags: input.flags,
    });
    let bias = resolve_bias(input.htf_bias, input.price_start, input.price_end);
    let badge = bias_badge(&assessment);

    let impulse = ImpulseSummary {
        direction: Direction::from_prices(input.price_start, input.price_end),
        price_start: input.price_start,
        price_end: input.price_end,
        range_points: round2((input.price_end - input.price_start).abs()),
        bars,
        start_time: start.map(fmt_clock),
        pivot_end_time: pivot.map(fmt_clock),
    };

    Ok(AnalysisOutput {
        impulse,
        macro_hint,
        expected_bars,
        retracements,
        extensions,
        time_counts,
        assessment,
        advice,
        score,
        bias,
        badge,
    })
}
