//! Deterministic text reports for the CLI and TUI.

pub mod format;

pub use format::*;
