//! Page extraction by range expression.

use crate::document::{OutputDocument, SerializeOptions, SourceDocument};
use crate::error::Result;
use crate::range::{PageIndexSet, parse_page_range};

/// Range used when the caller does not give one.
pub const DEFAULT_RANGE: &str = "1";

/// Result of a split operation.
#[derive(Debug, Clone)]
pub struct SplitResult {
    /// The extracted PDF.
    pub bytes: Vec<u8>,
    /// Zero-based source pages that were extracted, ascending.
    pub pages: PageIndexSet,
    /// Page count of the source document.
    pub source_pages: usize,
}

/// Extracts page subsets into new documents.
#[derive(Debug, Clone, Default)]
pub struct Splitter {
    options: SerializeOptions,
}

impl Splitter {
    /// Create a splitter with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the given serialization options for extracted documents.
    pub fn with_options(options: SerializeOptions) -> Self {
        Self { options }
    }

    /// Copy the pages selected by `range` into a new document.
    ///
    /// Pages keep their source order regardless of the order they are named
    /// in `range`.
    ///
    /// # Errors
    ///
    /// Fails with a parse error for unreadable input, or with
    /// [`PdfPressError::InvalidRange`](crate::PdfPressError::InvalidRange)
    /// if `range` selects no page of the document.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use pdfpress::split::Splitter;
    /// # fn example(input: Vec<u8>) -> pdfpress::Result<()> {
    /// let result = Splitter::new().split(&input, "1-3, 7")?;
    /// println!("Extracted pages {:?}", result.pages.page_numbers());
    /// # Ok(())
    /// # }
    /// ```
    pub fn split(&self, source: &[u8], range: &str) -> Result<SplitResult> {
        let document = SourceDocument::parse(source)?;
        let pages = parse_page_range(range, document.page_count())?;

        let mut output = OutputDocument::new();
        for handle in output.copy_pages(&document, pages.as_slice())? {
            output.append_page(handle)?;
        }
        let bytes = output.serialize(self.options)?;

        log::info!(
            "Extracted {} of {} page(s), {} bytes",
            pages.len(),
            document.page_count(),
            bytes.len()
        );

        Ok(SplitResult {
            bytes,
            pages,
            source_pages: document.page_count(),
        })
    }
}

/// Extract the pages selected by `range`, returning the new document's bytes.
pub fn split_pdf(source: &[u8], range: &str) -> Result<Vec<u8>> {
    Ok(Splitter::new().split(source, range)?.bytes)
}
