//! pdfpress - Merge, split and compress PDF documents.
//!
//! The engines work on in-memory byte buffers and never touch the filesystem:
//!
//! - [`merge`] concatenates documents in order
//! - [`split`] extracts the pages selected by a range expression such as
//!   `"1-3, 7"`
//! - [`compress`] re-serializes a document, or rasterizes every page and
//!   rebuilds the document from JPEG images
//!
//! File loading and atomic output writing for command-line callers live in
//! [`io`].
//!
//! # Examples
//!
//! ## Merge and split
//!
//! ```no_run
//! use pdfpress::{merge, split};
//!
//! # fn example(a: Vec<u8>, b: Vec<u8>) -> pdfpress::Result<()> {
//! let merged = merge::merge_pdfs(&[a, b])?;
//! let first_pages = split::split_pdf(&merged, "1-2")?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Compress with custom backends
//!
//! ```no_run
//! use pdfpress::compress::Compressor;
//! use pdfpress::config::CompressionLevel;
//! use pdfpress::raster::{JpegEncoder, PdfiumRasterizer, RasterizerConfig};
//!
//! # fn example(input: Vec<u8>) -> pdfpress::Result<()> {
//! let rasterizer = PdfiumRasterizer::with_config(&RasterizerConfig::default())?;
//! let compressor = Compressor::new(rasterizer, JpegEncoder::new());
//! let result = compressor.compress_with_progress(&input, CompressionLevel::High, |p| {
//!     eprintln!("page {}/{}", p.page, p.total_pages);
//! })?;
//! println!("{} -> {} bytes", result.original_size, result.new_size);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod compress;
pub mod config;
pub mod document;
pub mod error;
pub mod io;
pub mod merge;
pub mod range;
pub mod raster;
pub mod split;
pub mod utils;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use compress::{CompressionResult, Compressor};
pub use config::{CompressionLevel, Config};
pub use error::{PdfPressError, Result};
pub use merge::{MergeResult, Merger};
pub use split::{SplitResult, Splitter};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
