//! Core PDF merging implementation.
//!
//! Sources are parsed up front; only when every one of them is readable are
//! their pages copied, in source order, into one fresh document.

use std::time::{Duration, Instant};

use crate::document::{OutputDocument, SerializeOptions, SourceDocument};
use crate::error::{PdfPressError, Result};
use crate::utils::format_file_size;

/// Statistics about a merge operation.
#[derive(Debug, Clone)]
pub struct MergeStatistics {
    /// Number of PDFs merged.
    pub files_merged: usize,

    /// Total number of pages in merged document.
    pub total_pages: usize,

    /// Total size of the inputs in bytes.
    pub input_size: u64,

    /// Size of the merged document in bytes.
    pub output_size: u64,

    /// Total time taken for merge.
    pub merge_time: Duration,
}

impl MergeStatistics {
    /// Format input size as human-readable string.
    pub fn format_input_size(&self) -> String {
        format_file_size(self.input_size)
    }

    /// Format output size as human-readable string.
    pub fn format_output_size(&self) -> String {
        format_file_size(self.output_size)
    }
}

/// Result of a merge operation.
#[derive(Debug, Clone)]
pub struct MergeResult {
    /// The merged PDF.
    pub bytes: Vec<u8>,

    /// Statistics about the merge.
    pub statistics: MergeStatistics,
}

/// PDF merger that concatenates documents.
#[derive(Debug, Clone, Default)]
pub struct Merger {
    options: SerializeOptions,
}

impl Merger {
    /// Create a new merger with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the given serialization options for the merged document.
    pub fn with_options(options: SerializeOptions) -> Self {
        Self { options }
    }

    /// Merge PDF buffers into one document.
    ///
    /// The result holds every page of `sources[0]`, then every page of
    /// `sources[1]`, and so on, each in its original order.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `sources` is empty ([`PdfPressError::NoInput`])
    /// - any source cannot be parsed; the error carries its position
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use pdfpress::merge::Merger;
    /// # fn example(a: Vec<u8>, b: Vec<u8>) -> pdfpress::Result<()> {
    /// let merger = Merger::new();
    /// let result = merger.merge(&[a, b])?;
    /// println!("Merged {} files into {} pages",
    ///          result.statistics.files_merged,
    ///          result.statistics.total_pages);
    /// # Ok(())
    /// # }
    /// ```
    pub fn merge<B: AsRef<[u8]>>(&self, sources: &[B]) -> Result<MergeResult> {
        let merge_start = Instant::now();

        if sources.is_empty() {
            return Err(PdfPressError::NoInput);
        }

        let documents = sources
            .iter()
            .enumerate()
            .map(|(index, source)| {
                SourceDocument::parse(source.as_ref()).map_err(|e| e.at_source(index))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut merged = OutputDocument::new();
        for (index, document) in documents.iter().enumerate() {
            let all_pages: Vec<usize> = (0..document.page_count()).collect();
            for handle in merged.copy_pages(document, &all_pages)? {
                merged.append_page(handle)?;
            }
            log::debug!(
                "Appended {} page(s) from input #{}",
                document.page_count(),
                index + 1
            );
        }

        let total_pages = merged.page_count();
        let bytes = merged.serialize(self.options)?;

        let statistics = MergeStatistics {
            files_merged: documents.len(),
            total_pages,
            input_size: sources.iter().map(|s| s.as_ref().len() as u64).sum(),
            output_size: bytes.len() as u64,
            merge_time: merge_start.elapsed(),
        };

        log::info!(
            "Merged {} file(s) into {} page(s), {}",
            statistics.files_merged,
            statistics.total_pages,
            statistics.format_output_size()
        );

        Ok(MergeResult { bytes, statistics })
    }
}
