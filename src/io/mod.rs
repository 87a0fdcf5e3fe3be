//! Input/output helpers.
//!
//! - result bundle JSON export (`export`)

pub mod export;

pub use export::*;
