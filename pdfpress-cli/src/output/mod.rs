//! User-facing output for the pdfpress binary.
//!
//! This module handles:
//! - Formatted status messages honouring quiet and verbose modes
//! - The page rendering progress bar
//! - The JSON report printed with `--json`

pub mod formatter;
pub mod progress;

pub use formatter::OutputFormatter;
pub use progress::{ProgressBar, ProgressStyle};

use pdfpress::io::LoadStatistics;
use serde::Serialize;
use std::path::Path;

/// Machine-readable summary of one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// Where the output was written.
    pub output: String,
    /// Total size of the inputs in bytes.
    pub original_size: u64,
    /// Size of the output in bytes.
    pub new_size: u64,
}

impl Report {
    /// Build a report for an output written to `output`.
    pub fn new(output: &Path, original_size: u64, new_size: u64) -> Self {
        Self {
            output: output.display().to_string(),
            original_size,
            new_size,
        }
    }

    /// Render as a single JSON line.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Display load statistics to the user.
pub fn display_load_statistics(formatter: &OutputFormatter, stats: &LoadStatistics) {
    if stats.failure_count > 0 {
        formatter.warning(&format!(
            "Warning: {} file(s) failed to load",
            stats.failure_count
        ));
    }

    formatter.info(&format!(
        "Loaded {} file(s) in {:.2}s: {}",
        stats.success_count,
        stats.total_time.as_secs_f64(),
        stats.format_total_size()
    ));
}
