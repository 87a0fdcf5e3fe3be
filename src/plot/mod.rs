//! Terminal rendering of the level ladder.

pub mod ascii;

pub use ascii::*;
