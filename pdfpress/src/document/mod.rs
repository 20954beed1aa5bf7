//! In-memory PDF documents.
//!
//! [`SourceDocument`] is a parsed, read-only input. [`OutputDocument`] is a
//! fresh document assembled from pages copied out of sources or built from
//! rendered images, and finally serialized to bytes.

mod import;
mod output;
mod source;

pub use output::{OutputDocument, PageHandle, SerializeOptions};
pub use source::{PageSize, SourceDocument};
