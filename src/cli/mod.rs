//! Command-line parsing for the Fibonacci impulse/time analyzer.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the level/assessment code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::{GapSide, HtfBias};
use crate::io::export::DEFAULT_RESULT_FILENAME;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "fib", version, about = "Fibonacci price/time impulse analyzer")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the full analysis: levels, time counts, assessment, score, badges.
    Analyze(AnalyzeArgs),
    /// Print the retracement/extension level tables only (useful for scripting).
    Levels(AnalyzeArgs),
    /// Check a price gap (FVG/BPR) for overlap with the prime retrace zones.
    Gap(GapArgs),
    /// Launch the interactive TUI.
    ///
    /// This uses the same underlying analysis pipeline as `fib analyze`, but
    /// renders a form plus the report in a terminal UI using Ratatui. Any
    /// flags given here prefill the form.
    Tui(AnalyzeArgs),
}

/// Common options for the analysis commands.
#[derive(Debug, Parser, Clone, Default)]
pub struct AnalyzeArgs {
    /// Impulse start price (A).
    #[arg(short = 'a', long)]
    pub price_a: Option<f64>,

    /// Impulse end price (B).
    #[arg(short = 'b', long)]
    pub price_b: Option<f64>,

    /// Impulse length in bars (1-minute bars). Overridden when both clock
    /// times are given and parse to a positive duration.
    #[arg(short = 'n', long)]
    pub bars: Option<u32>,

    /// Impulse start clock time (H:MM or HH:MM).
    #[arg(long, value_name = "HH:MM")]
    pub start_time: Option<String>,

    /// Impulse end / pivot clock time (H:MM or HH:MM).
    #[arg(long, value_name = "HH:MM")]
    pub pivot_time: Option<String>,

    /// Observed retrace price so far.
    #[arg(long)]
    pub retrace_price: Option<f64>,

    /// Observed retrace duration in bars.
    #[arg(long)]
    pub retrace_bars: Option<u32>,

    /// Clock used for the macro-window check. Defaults to the pivot time.
    #[arg(long, value_name = "HH:MM")]
    pub now: Option<String>,

    /// Tolerance in bars when matching the retrace duration to the
    /// 13/21/34 Fibonacci counts.
    #[arg(long, default_value_t = 0)]
    pub tol: u32,

    /// Higher-timeframe bias override.
    #[arg(long, value_enum, default_value_t = HtfBias::Auto)]
    pub bias: HtfBias,

    /// FVG sits inside the 0.5-0.618 zone.
    #[arg(long)]
    pub fvg_golden: bool,

    /// Untouched FVG sits in the 0.618-0.786 zone.
    #[arg(long)]
    pub fvg_deep: bool,

    /// BPR overlaps the 0.5-0.618 zone.
    #[arg(long)]
    pub bpr_golden: bool,

    /// IFVG near a sweep at 0.618-0.786.
    #[arg(long)]
    pub ifvg_deep: bool,

    /// Both sides of liquidity were swept this hour.
    #[arg(long)]
    pub both_sides_swept: bool,

    /// Render the price ladder under the report (enabled by default).
    #[arg(long, default_value_t = true)]
    pub ladder: bool,

    /// Skip the price ladder.
    #[arg(long)]
    pub no_ladder: bool,

    /// Export the result bundle to JSON. Without a value the default
    /// filename is used.
    #[arg(
        long,
        value_name = "JSON",
        num_args = 0..=1,
        default_missing_value = DEFAULT_RESULT_FILENAME
    )]
    pub export: Option<PathBuf>,
}

/// Options for the standalone gap-overlap check.
#[derive(Debug, Parser)]
pub struct GapArgs {
    /// Impulse start price (A).
    #[arg(short = 'a', long)]
    pub price_a: f64,

    /// Impulse end price (B).
    #[arg(short = 'b', long)]
    pub price_b: f64,

    /// Upper gap bound.
    #[arg(long)]
    pub gap_top: f64,

    /// Lower gap bound.
    #[arg(long)]
    pub gap_bottom: f64,

    /// Which side the gap favors (annotation only).
    #[arg(long, value_enum, default_value_t = GapSide::Bullish)]
    pub side: GapSide,
}
