//! Export the analysis result bundle to JSON.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts.

use std::fs::File;
use std::path::Path;

use crate::app::pipeline::AnalysisOutput;
use crate::error::AppError;

/// File name used when the user does not pick one.
pub const DEFAULT_RESULT_FILENAME: &str = "nq_fib_time_result.json";

/// Write the result bundle as pretty-printed JSON.
pub fn write_result_json(path: &Path, run: &AnalysisOutput) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::input(format!(
            "Failed to create result JSON '{}': {e}",
            path.display()
        ))
    })?;
    serde_json::to_writer_pretty(file, run)
        .map_err(|e| AppError::input(format!("Failed to write result JSON: {e}")))?;
    Ok(())
}
