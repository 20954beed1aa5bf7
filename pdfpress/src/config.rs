//! Configuration module for pdfpress.
//!
//! This module holds the option types shared by the engines and the
//! normalized configuration that the CLI builds from its arguments. It handles:
//! - Lenient parsing of compression level names
//! - Validation of argument combinations
//! - Default output naming

use anyhow::{Result, bail};
use serde::Serialize;
use std::{
    convert::Infallible,
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
    time::{SystemTime, UNIX_EPOCH},
};

/// Requested compression tier.
///
/// Unrecognized names never fail: they degrade to [`CompressionLevel::Medium`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionLevel {
    /// Structural re-serialization only. Keeps text and vector content.
    Low,
    /// Rasterize pages at 90% scale, JPEG quality 0.60.
    #[default]
    Medium,
    /// Rasterize pages at 70% scale, JPEG quality 0.40.
    High,
}

impl CompressionLevel {
    /// Parse a level name, falling back to `Medium` for anything unknown.
    ///
    /// Names are trimmed and matched case-insensitively. `"extreme"` is an
    /// alias for `High`.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdfpress::config::CompressionLevel;
    ///
    /// assert_eq!(CompressionLevel::from_name("LOW"), CompressionLevel::Low);
    /// assert_eq!(CompressionLevel::from_name("extreme"), CompressionLevel::High);
    /// assert_eq!(CompressionLevel::from_name("ultra"), CompressionLevel::Medium);
    /// ```
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "low" => Self::Low,
            "medium" => Self::Medium,
            "high" | "extreme" => Self::High,
            "" => Self::Medium,
            other => {
                log::warn!("Unknown compression level '{other}', using medium");
                Self::Medium
            }
        }
    }

    /// Canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl FromStr for CompressionLevel {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::from_name(s))
    }
}

impl fmt::Display for CompressionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output file overwrite behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverwriteMode {
    /// Prompt the user before overwriting (default).
    #[default]
    Prompt,
    /// Always overwrite without prompting.
    Force,
    /// Never overwrite, error if file exists.
    NoClobber,
}

/// The document operation to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Concatenate the inputs in order.
    Merge {
        /// Input PDF file paths (in merge order).
        inputs: Vec<PathBuf>,
    },
    /// Extract a page subset from one input.
    Split {
        /// Input PDF file path.
        input: PathBuf,
        /// Page range expression, e.g. `"1-3,5"`.
        pages: String,
    },
    /// Shrink one input.
    Compress {
        /// Input PDF file path.
        input: PathBuf,
        /// Requested compression tier.
        level: CompressionLevel,
    },
}

impl Operation {
    /// All input paths this operation reads.
    pub fn inputs(&self) -> &[PathBuf] {
        match self {
            Self::Merge { inputs } => inputs,
            Self::Split { input, .. } | Self::Compress { input, .. } => std::slice::from_ref(input),
        }
    }

    /// Short name used in messages and default file names.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Merge { .. } => "merge",
            Self::Split { .. } => "split",
            Self::Compress { .. } => "compress",
        }
    }

    /// Output file name used when none is given, stamped with the current time.
    pub fn default_output(&self) -> PathBuf {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        self.default_output_at(millis)
    }

    fn default_output_at(&self, millis: u128) -> PathBuf {
        match self {
            Self::Merge { .. } => PathBuf::from(format!("merged_{millis}.pdf")),
            Self::Split { .. } => PathBuf::from(format!("split_{millis}.pdf")),
            Self::Compress { input, .. } => {
                let name = input
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "output.pdf".to_string());
                PathBuf::from(format!("compressed_{millis}_{name}"))
            }
        }
    }
}

/// Complete configuration for one CLI invocation.
///
/// This structure contains all settings needed to run an operation,
/// derived and validated from CLI arguments.
#[derive(Debug, Clone)]
pub struct Config {
    /// Operation and its inputs.
    pub operation: Operation,

    /// Output PDF file path.
    pub output: PathBuf,

    /// File overwrite behavior.
    pub overwrite_mode: OverwriteMode,

    /// Quiet mode - suppress non-error output.
    pub quiet: bool,

    /// Verbose output mode.
    pub verbose: bool,

    /// Print a JSON report instead of human-readable messages.
    pub json: bool,

    /// Number of files loaded concurrently (None = auto-detect).
    pub jobs: Option<usize>,

    /// Directory containing the PDFium shared library.
    pub pdfium_dir: Option<PathBuf>,
}

impl Config {
    /// Create a configuration with defaults for everything but the operation.
    pub fn new(operation: Operation, output: PathBuf) -> Self {
        Self {
            operation,
            output,
            overwrite_mode: OverwriteMode::default(),
            quiet: false,
            verbose: false,
            json: false,
            jobs: None,
            pdfium_dir: None,
        }
    }

    /// Returns a reference to inputs.
    pub fn inputs(&self) -> &[PathBuf] {
        self.operation.inputs()
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No input files are specified
    /// - Verbose and quiet modes are both enabled
    /// - Jobs count is zero
    /// - The output path is also an input path
    pub fn validate(&self) -> Result<()> {
        if self.inputs().is_empty() {
            bail!("No input files specified");
        }

        if self.verbose && self.quiet {
            bail!("Cannot use both --verbose and --quiet");
        }

        if let Some(jobs) = self.jobs
            && jobs == 0
        {
            bail!("Number of jobs must be at least 1");
        }

        if let Some(input) = self.inputs().iter().find(|input| same_path(input, &self.output)) {
            bail!(
                "Output file cannot be the same as an input file: {}",
                input.display()
            );
        }

        Ok(())
    }

    /// Get the effective number of concurrent loads.
    ///
    /// Returns the configured job count, or the number of CPU cores if auto-detect.
    pub fn effective_jobs(&self) -> usize {
        self.jobs.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }

    /// Check if human-readable output should be displayed.
    pub fn should_print(&self) -> bool {
        !self.quiet && !self.json
    }
}

fn same_path(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
