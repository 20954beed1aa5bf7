//! CLI argument parsing for pdfpress.
//!
//! This module defines the command-line interface structure using `clap`.
//! It handles argument parsing and conversion into a validated
//! [`Config`].

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

use pdfpress::config::{CompressionLevel, Config, Operation, OverwriteMode};
use pdfpress::error::{PdfPressError, Result};
use pdfpress::split::DEFAULT_RANGE;
use pdfpress::utils::collect_paths_for_patterns;

/// Merge, split and compress PDF documents.
///
/// pdfpress concatenates documents, extracts page ranges, and shrinks
/// documents either structurally or by re-rendering every page as a JPEG.
#[derive(Parser, Debug)]
#[command(name = "pdfpress")]
#[command(version)]
#[command(about = "Merge, split and compress PDF documents", long_about = None)]
#[command(author)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Operation to perform
    #[command(subcommand)]
    pub command: Command,

    /// Output PDF file path
    ///
    /// Defaults to a timestamped name in the current directory:
    /// merged_<ms>.pdf, split_<ms>.pdf or compressed_<ms>_<input>.
    #[arg(short, long, value_name = "FILE", global = true)]
    pub output: Option<PathBuf>,

    /// Force overwrite of existing output file without confirmation
    #[arg(short, long, global = true)]
    pub force: bool,

    /// Never overwrite existing output file
    ///
    /// If the output file already exists, exit with an error
    /// instead of prompting or overwriting.
    #[arg(long, conflicts_with = "force", global = true)]
    pub no_clobber: bool,

    /// Suppress all non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    pub quiet: bool,

    /// Verbose output (-v for statistics and info logs, -vv for debug logs)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Print a JSON report instead of human-readable messages
    ///
    /// The report has the shape {"output": ..., "originalSize": ..., "newSize": ...}.
    #[arg(long, global = true)]
    pub json: bool,

    /// Number of input files loaded concurrently
    ///
    /// Default is number of CPU cores. Use 1 for sequential loading.
    #[arg(short, long, value_name = "N", global = true)]
    pub jobs: Option<usize>,

    /// Directory containing the PDFium shared library
    ///
    /// Only needed for the medium and high compression levels.
    #[arg(long, value_name = "DIR", env = "PDFIUM_DYNAMIC_LIB_PATH", global = true)]
    pub pdfium_dir: Option<PathBuf>,
}

/// Available operations.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Concatenate PDF files in order
    ///
    /// Examples:
    ///   pdfpress merge a.pdf b.pdf -o both.pdf
    ///   pdfpress merge "chapters/*.pdf" -o book.pdf
    Merge {
        /// Input files or glob patterns, merged in the order given
        #[arg(required = true, value_name = "FILE")]
        inputs: Vec<String>,
    },

    /// Extract pages from a PDF file
    ///
    /// Examples:
    ///   pdfpress split report.pdf --pages "1-3, 7" -o excerpt.pdf
    Split {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Pages to keep, 1-based, e.g. "1-3, 7"
        ///
        /// Pages beyond the end of the document are ignored. Pages are
        /// written in ascending order without duplicates.
        #[arg(short, long, value_name = "RANGE", default_value = DEFAULT_RANGE)]
        pages: String,
    },

    /// Reduce the size of a PDF file
    ///
    /// - low: re-serialize with compressed object streams, keeps text
    /// - medium: render pages at 90% scale as JPEG (quality 60)
    /// - high: render pages at 70% scale as JPEG (quality 40)
    ///
    /// Rendered output is discarded in favor of the original at medium
    /// when it does not come out smaller.
    Compress {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Compression level: low, medium or high
        ///
        /// Unrecognized names fall back to medium.
        #[arg(short, long, value_name = "LEVEL", default_value = "medium")]
        level: String,
    },
}

impl Cli {
    /// Convert CLI arguments into a validated Config.
    ///
    /// Merge inputs are glob-expanded here, so this touches the filesystem.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A merge pattern is malformed or a literal input is missing
    /// - Merge patterns expand to no files
    /// - Configuration validation fails
    pub fn to_config(&self) -> Result<Config> {
        let operation = match &self.command {
            Command::Merge { inputs } => {
                let inputs = collect_paths_for_patterns(inputs)?;
                if inputs.is_empty() {
                    return Err(PdfPressError::NoInput);
                }
                Operation::Merge { inputs }
            }
            Command::Split { input, pages } => Operation::Split {
                input: input.clone(),
                pages: pages.clone(),
            },
            Command::Compress { input, level } => Operation::Compress {
                input: input.clone(),
                level: CompressionLevel::from_name(level),
            },
        };

        let output = self
            .output
            .clone()
            .unwrap_or_else(|| operation.default_output());

        let mut config = Config::new(operation, output);
        config.overwrite_mode = self.overwrite_mode();
        config.quiet = self.quiet;
        config.verbose = self.verbose > 0;
        config.json = self.json;
        config.jobs = self.jobs;
        config.pdfium_dir = self.pdfium_dir.clone();

        config.validate().map_err(|e| {
            PdfPressError::invalid_config(format!("Configuration validation failed: {e}"))
        })?;

        Ok(config)
    }

    fn overwrite_mode(&self) -> OverwriteMode {
        if self.force {
            OverwriteMode::Force
        } else if self.no_clobber {
            OverwriteMode::NoClobber
        } else {
            OverwriteMode::Prompt
        }
    }
}
