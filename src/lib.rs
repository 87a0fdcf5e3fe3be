//! `fib-time` library crate.
//!
//! The binary (`fib`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - modules are reusable (e.g., future GUI/daemon, notebooks, etc.)
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod assess;
pub mod cli;
pub mod clock;
pub mod domain;
pub mod error;
pub mod gap;
pub mod io;
pub mod levels;
pub mod plot;
pub mod report;
pub mod tui;
