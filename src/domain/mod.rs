//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - input enums shared by the CLI and the TUI (`HtfBias`, `GapSide`, `SessionPreset`)
//! - the analysis input record (`AnalysisInput`) and its context flags
//! - computed value objects (`LevelSet`, `Assessment`, `ScoreResult`, `BiasBadge`)

pub mod types;

pub use types::*;
