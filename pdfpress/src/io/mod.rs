//! File I/O for callers of the engines.

pub mod reader;
pub mod writer;

pub use reader::{LoadResult, LoadStatistics, LoadedFile, PdfReader};
pub use writer::{PdfWriter, WriteOptions, WriteStatistics};
