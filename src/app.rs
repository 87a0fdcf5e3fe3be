//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - runs the analysis pipeline
//! - prints reports/ladders
//! - writes optional exports

use clap::Parser;

use crate::cli::{AnalyzeArgs, Command, GapArgs};
use crate::domain::AnalysisInput;
use crate::error::AppError;
use crate::gap::analyze_gap;

pub mod pipeline;

/// Entry point for the `fib` binary.
pub fn run() -> Result<(), AppError> {
    // We want `fib` and `fib -a 4500 -b 4550` to behave like `fib tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing. This preserves a clean clap structure while
    // retaining the requested UX.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Analyze(args) => handle_analyze(args, OutputMode::Full),
        Command::Levels(args) => handle_analyze(args, OutputMode::LevelsOnly),
        Command::Gap(args) => handle_gap(args),
        Command::Tui(args) => crate::tui::run(args),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    Full,
    LevelsOnly,
}

fn handle_analyze(args: AnalyzeArgs, mode: OutputMode) -> Result<(), AppError> {
    let input = analysis_input_from_args(&args)?;
    let run = pipeline::run_analysis(&input)?;

    // Print terminal output.
    match mode {
        OutputMode::Full => {
            println!("{}", crate::report::format_analysis_report(&run));
        }
        OutputMode::LevelsOnly => {
            println!("{}", crate::report::format_levels(&run));
        }
    }

    if mode == OutputMode::Full && args.ladder && !args.no_ladder {
        let ladder = crate::plot::render_price_ladder(
            &run.impulse,
            &run.retracements,
            &run.extensions,
            input.retrace_price,
        );
        println!("{ladder}");
    }

    // Optional export.
    if let Some(path) = &args.export {
        crate::io::export::write_result_json(path, &run)?;
        println!("Wrote {}", path.display());
    }

    Ok(())
}

fn handle_gap(args: GapArgs) -> Result<(), AppError> {
    let bounds = [args.price_a, args.price_b, args.gap_top, args.gap_bottom];
    if bounds.iter().any(|v| !v.is_finite()) {
        return Err(AppError::input(
            "Gap check needs numeric A/B prices and gap bounds.",
        ));
    }

    let analysis = analyze_gap(args.price_a, args.price_b, args.gap_top, args.gap_bottom);
    println!("{}", crate::report::format_gap_report(&analysis, args.side));
    Ok(())
}

/// Map parsed CLI flags onto the pipeline input record.
///
/// Missing prices are the one hard error here; everything optional stays
/// optional and degrades inside the pipeline.
pub fn analysis_input_from_args(args: &AnalyzeArgs) -> Result<AnalysisInput, AppError> {
    let (Some(price_start), Some(price_end)) = (args.price_a, args.price_b) else {
        return Err(AppError::input(
            "Provide both prices: -a <price A> -b <price B>.",
        ));
    };

    Ok(AnalysisInput {
        price_start,
        price_end,
        bars: args.bars,
        start_time: args.start_time.clone().unwrap_or_default(),
        pivot_time: args.pivot_time.clone().unwrap_or_default(),
        retrace_price: args.retrace_price,
        retrace_bars: args.retrace_bars,
        now_time: args.now.clone().unwrap_or_default(),
        tol_bars: args.tol,
        htf_bias: args.bias,
        flags: crate::domain::ContextFlags {
            fvg_golden: args.fvg_golden,
            fvg_deep: args.fvg_deep,
            bpr_golden: args.bpr_golden,
            ifvg_deep: args.ifvg_deep,
            both_sides_swept: args.both_sides_swept,
        },
    })
}

/// Rewrite argv so `fib` defaults to `fib tui`.
///
/// Rules:
/// - `fib`                      -> `fib tui`
/// - `fib -a 4500 ...`          -> `fib tui -a 4500 ...`
/// - `fib --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "analyze" | "levels" | "gap" | "tui");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::HtfBias;

    fn argv(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn bare_invocation_defaults_to_tui() {
        assert_eq!(rewrite_args(argv(&["fib"])), argv(&["fib", "tui"]));
    }

    #[test]
    fn leading_flag_defaults_to_tui() {
        assert_eq!(
            rewrite_args(argv(&["fib", "-a", "4500"])),
            argv(&["fib", "tui", "-a", "4500"])
        );
    }

    #[test]
    fn explicit_subcommands_pass_through() {
        for sub in ["analyze", "levels", "gap", "tui"] {
            let before = argv(&["fib", sub, "-a", "1"]);
            assert_eq!(rewrite_args(before.clone()), before);
        }
    }

    #[test]
    fn help_and_version_pass_through() {
        for flag in ["-h", "--help", "-V", "--version", "help"] {
            let before = argv(&["fib", flag]);
            assert_eq!(rewrite_args(before.clone()), before);
        }
    }

    #[test]
    fn args_map_onto_input() {
        let args = AnalyzeArgs {
            price_a: Some(4500.0),
            price_b: Some(4550.0),
            bars: Some(55),
            pivot_time: Some("10:00".to_string()),
            retrace_price: Some(4519.0),
            retrace_bars: Some(25),
            tol: 1,
            bias: HtfBias::Bear,
            ifvg_deep: true,
            ..AnalyzeArgs::default()
        };
        let input = analysis_input_from_args(&args).unwrap();
        assert_eq!(input.price_start, 4500.0);
        assert_eq!(input.price_end, 4550.0);
        assert_eq!(input.bars, Some(55));
        assert_eq!(input.pivot_time, "10:00");
        assert_eq!(input.start_time, "");
        assert_eq!(input.tol_bars, 1);
        assert_eq!(input.htf_bias, HtfBias::Bear);
        assert!(input.flags.ifvg_deep);
        assert!(!input.flags.fvg_golden);
    }

    #[test]
    fn missing_prices_are_a_hard_error() {
        let args = AnalyzeArgs {
            price_a: Some(4500.0),
            ..AnalyzeArgs::default()
        };
        let err = analysis_input_from_args(&args).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
