//! PDF merging functionality.

pub mod merger;

pub use merger::{MergeResult, MergeStatistics, Merger};

use crate::error::Result;

/// Merge PDF buffers in order, returning the merged document's bytes.
pub fn merge_pdfs<B: AsRef<[u8]>>(sources: &[B]) -> Result<Vec<u8>> {
    Ok(Merger::new().merge(sources)?.bytes)
}
