//! Retrace assessment, context advice, setup scoring, and bias badges.

pub mod advice;
pub mod bias;
pub mod retrace;
pub mod score;

pub use advice::*;
pub use bias::*;
pub use retrace::*;
pub use score::*;
