//! Loading input files into memory.
//!
//! The engines operate on byte buffers; this module gets those buffers off
//! the filesystem for the CLI. It provides:
//! - Async loading with clear errors for missing or unreadable files
//! - Ordered loading of many files with bounded concurrency
//! - Load statistics
//!
//! # Examples
//!
//! ```no_run
//! use pdfpress::io::reader::PdfReader;
//! use std::path::PathBuf;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let reader = PdfReader::new();
//! let paths = vec![PathBuf::from("a.pdf"), PathBuf::from("b.pdf")];
//! let (results, stats) = reader.load_all(&paths, 4).await;
//! # Ok(())
//! # }
//! ```

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use futures::stream::{self, StreamExt};

use crate::error::{PdfPressError, Result};
use crate::utils::format_file_size;

/// How far into a file the `%PDF-` signature may appear.
const SIGNATURE_WINDOW: usize = 1024;

/// An input file read into memory.
#[derive(Debug, Clone)]
pub struct LoadedFile {
    /// File contents.
    pub bytes: Vec<u8>,

    /// Path to the source file.
    pub path: PathBuf,

    /// Time taken to read the file.
    pub load_time: Duration,
}

impl LoadedFile {
    /// File size in bytes.
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Result of a load operation (success or failure).
pub type LoadResult = Result<LoadedFile>;

/// Statistics for a batch load operation.
#[derive(Debug, Clone)]
pub struct LoadStatistics {
    /// Number of files successfully loaded.
    pub success_count: usize,

    /// Number of files that failed to load.
    pub failure_count: usize,

    /// Total time taken for all loads.
    pub total_time: Duration,

    /// Total size of successfully loaded files.
    pub total_size: u64,
}

impl LoadStatistics {
    fn from_results(results: &[LoadResult], total_time: Duration) -> Self {
        let success_count = results.iter().filter(|r| r.is_ok()).count();
        let total_size = results
            .iter()
            .filter_map(|r| r.as_ref().ok())
            .map(LoadedFile::size)
            .sum();

        Self {
            success_count,
            failure_count: results.len() - success_count,
            total_time,
            total_size,
        }
    }

    /// Format total size as human-readable string.
    pub fn format_total_size(&self) -> String {
        format_file_size(self.total_size)
    }
}

/// Reads input files for the engines.
#[derive(Debug, Clone)]
pub struct PdfReader {
    /// Whether to check for a PDF signature after reading.
    verify: bool,
}

impl PdfReader {
    /// Create a new reader that checks the PDF signature.
    pub fn new() -> Self {
        Self { verify: true }
    }

    /// Create a reader that skips the signature check and leaves all
    /// validation to the parser.
    pub fn without_verification() -> Self {
        Self { verify: false }
    }

    /// Read a single file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file does not exist
    /// - The path is not a regular file
    /// - The file cannot be read
    /// - Verification is on and the file has no `%PDF-` signature
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use pdfpress::io::reader::PdfReader;
    /// # use std::path::Path;
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let reader = PdfReader::new();
    /// let loaded = reader.load(Path::new("document.pdf")).await?;
    /// println!("Read {} bytes in {:?}", loaded.size(), loaded.load_time);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn load(&self, path: &Path) -> Result<LoadedFile> {
        let start = Instant::now();

        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|e| access_error(path, e))?;
        if !metadata.is_file() {
            return Err(PdfPressError::not_a_file(path.to_path_buf()));
        }

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| access_error(path, e))?;

        if self.verify && !has_pdf_signature(&bytes) {
            return Err(PdfPressError::corrupt_document(format!(
                "{} does not start with a PDF header",
                path.display()
            )));
        }

        log::debug!("Read {} ({} bytes)", path.display(), bytes.len());

        Ok(LoadedFile {
            bytes,
            path: path.to_path_buf(),
            load_time: start.elapsed(),
        })
    }

    /// Read many files with at most `workers` reads in flight.
    ///
    /// # Returns
    ///
    /// A vector of results in the same order as the input paths.
    pub async fn load_parallel(&self, paths: &[PathBuf], workers: usize) -> Vec<LoadResult> {
        let workers = workers.max(1);

        let tasks = paths.iter().map(|path| {
            let reader = self.clone();
            let path = path.clone();
            async move { reader.load(&path).await }
        });

        stream::iter(tasks).buffered(workers).collect().await
    }

    /// Read all files and report aggregate statistics.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use pdfpress::io::reader::PdfReader;
    /// # use std::path::PathBuf;
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let reader = PdfReader::new();
    /// let paths = vec![PathBuf::from("a.pdf"), PathBuf::from("b.pdf")];
    ///
    /// let (results, stats) = reader.load_all(&paths, 4).await;
    /// println!("Loaded {} of {} files in {:?}",
    ///          stats.success_count,
    ///          paths.len(),
    ///          stats.total_time);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn load_all(
        &self,
        paths: &[PathBuf],
        max_workers: usize,
    ) -> (Vec<LoadResult>, LoadStatistics) {
        let start = Instant::now();
        let results = self.load_parallel(paths, max_workers).await;
        let stats = LoadStatistics::from_results(&results, start.elapsed());
        (results, stats)
    }
}

impl Default for PdfReader {
    fn default() -> Self {
        Self::new()
    }
}

fn access_error(path: &Path, error: std::io::Error) -> PdfPressError {
    match error.kind() {
        ErrorKind::NotFound => PdfPressError::file_not_found(path.to_path_buf()),
        _ => PdfPressError::FileNotAccessible {
            path: path.to_path_buf(),
            source: error,
        },
    }
}

fn has_pdf_signature(bytes: &[u8]) -> bool {
    let window = &bytes[..bytes.len().min(SIGNATURE_WINDOW)];
    window.windows(5).any(|w| w == b"%PDF-")
}
