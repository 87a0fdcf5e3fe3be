//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the level/assessment code stays clean and testable
//! - output changes are localized (important for future snapshot tests)

use crate::app::pipeline::AnalysisOutput;
use crate::assess::quality_class;
use crate::domain::{CriterionValue, GapSide, ImpulseSummary, LevelSet, ScoreResult};
use crate::gap::{GapAnalysis, Overlap};

const GAP_GOLDEN_ADVISORY: &str =
    "→ FVG overlaps 0.5–0.618: high‑conviction continuation if tapped during Fib time.";
const GAP_DEEP_ADVISORY: &str =
    "→ FVG overlaps 0.618–0.786: expect deeper return before sustained trend (or reversal risk if fast/early).";
const GAP_NO_OVERLAP: &str = "→ No overlap with prime retrace zones; treat with caution.";

/// Full analysis report for one run.
pub fn format_analysis_report(run: &AnalysisOutput) -> String {
    let mut out = String::new();
    out.push_str("=== fib - Fibonacci Impulse/Time Analysis ===\n");
    out.push_str(&impulse_line(&run.impulse));
    out.push_str(&format!(
        "Times: start={} pivot={}\n",
        run.impulse.start_time.as_deref().unwrap_or("-"),
        run.impulse.pivot_end_time.as_deref().unwrap_or("-")
    ));
    out.push_str(&format!("Macro: {}\n", run.macro_hint));
    out.push_str(&format!(
        "Expected retrace bars: min={} mid={} max={}\n",
        run.expected_bars.min, run.expected_bars.mid, run.expected_bars.max
    ));

    out.push_str("\nRetracement levels:\n");
    out.push_str(&format_level_table(&run.retracements));
    out.push_str("\nExtension levels:\n");
    out.push_str(&format_level_table(&run.extensions));

    out.push_str("\nFib time counts (minutes from pivot):\n");
    for tc in &run.time_counts {
        out.push_str(&format!(
            "  {:>2} -> {}\n",
            tc.count,
            tc.clock.as_deref().unwrap_or("-")
        ));
    }

    out.push_str("\nAssessment:\n");
    if let Some(depth) = &run.assessment.price_depth {
        out.push_str(&format!("- depth: {depth}\n"));
    }
    if let Some(speed) = &run.assessment.time_speed {
        out.push_str(&format!("- time: {speed}\n"));
    }
    out.push_str(&format!("- invalidation: {}\n", run.assessment.invalidation));

    out.push_str("\nContext advice:\n");
    for line in run.advice.lines() {
        out.push_str(&format!("- {line}\n"));
    }

    out.push('\n');
    out.push_str(&format_score_details(&run.score));

    out.push_str(&format!(
        "\n{} • HTF: {} | Quality: {}\n",
        run.badge.text,
        run.bias.label().to_uppercase(),
        quality_class(run.score.score).label()
    ));
    out
}

/// Reduced report: just the impulse echo and the level tables.
pub fn format_levels(run: &AnalysisOutput) -> String {
    let mut out = String::new();
    out.push_str(&impulse_line(&run.impulse));
    out.push_str("\nRetracement levels:\n");
    out.push_str(&format_level_table(&run.retracements));
    out.push_str("\nExtension levels:\n");
    out.push_str(&format_level_table(&run.extensions));
    out
}

/// Checklist section with the `score/7` headline.
pub fn format_score_details(score: &ScoreResult) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Setup score: {}/7 (criterion #7 is manual trigger)\n",
        score.score
    ));
    for (id, value) in &score.details {
        match value {
            CriterionValue::Flag(true) => out.push_str(&format!("  [x] {id}\n")),
            CriterionValue::Flag(false) => out.push_str(&format!("  [ ] {id}\n")),
            CriterionValue::Note(note) => out.push_str(&format!("  [-] {id}: {note}\n")),
        }
    }
    out
}

/// Gap overlap report against the golden and deep boxes.
pub fn format_gap_report(analysis: &GapAnalysis, side: GapSide) -> String {
    let mut out = String::new();
    out.push_str(&format!("=== fib - Gap Overlap Check ({}) ===\n", side.label()));
    out.push_str(&overlap_line("Golden box", analysis.golden_box, &analysis.golden));
    out.push_str(&overlap_line("Deep box", analysis.deep_box, &analysis.deep));
    if analysis.golden.len > 0.0 {
        out.push_str(GAP_GOLDEN_ADVISORY);
        out.push('\n');
    }
    if analysis.deep.len > 0.0 {
        out.push_str(GAP_DEEP_ADVISORY);
        out.push('\n');
    }
    if analysis.golden.len == 0.0 && analysis.deep.len == 0.0 {
        out.push_str(GAP_NO_OVERLAP);
        out.push('\n');
    }
    out
}

fn impulse_line(impulse: &ImpulseSummary) -> String {
    format!(
        "Impulse: {} | A={:.2} B={:.2} | range={:.2} pts | bars={}\n",
        impulse.direction.label(),
        impulse.price_start,
        impulse.price_end,
        impulse.range_points,
        impulse.bars
    )
}

fn format_level_table(levels: &LevelSet) -> String {
    let mut out = String::new();
    for (label, price) in levels.iter() {
        out.push_str(&format!("  {label:<6} {price:>9.2}\n"));
    }
    out
}

fn overlap_line(name: &str, bounds: [f64; 2], o: &Overlap) -> String {
    let span = match (o.lo, o.hi) {
        (Some(lo), Some(hi)) => format!("{lo:.2}→{hi:.2}"),
        _ => "none".to_string(),
    };
    format!(
        "{name} [{:.2}, {:.2}] overlap: {:.2} ({span})\n",
        bounds[0], bounds[1], o.len
    )
}
