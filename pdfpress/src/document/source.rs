//! Parsed input documents.

use lopdf::{Dictionary, Document, Object, ObjectId};

use crate::error::{PdfPressError, Result};

/// Page attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE_KEYS: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Guard against cyclic `Parent` chains in malformed files.
const MAX_TREE_DEPTH: usize = 64;

/// US Letter, used when no MediaBox is present anywhere in the tree.
const DEFAULT_PAGE_SIZE: PageSize = PageSize {
    width: 612.0,
    height: 792.0,
};

/// Width and height of a page in PDF points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    /// Horizontal extent.
    pub width: f32,
    /// Vertical extent.
    pub height: f32,
}

/// An immutable, parsed input PDF.
///
/// Created once per operation from the caller's bytes and dropped with it.
/// Parsing either yields a document with at least one page or fails.
#[derive(Debug)]
pub struct SourceDocument {
    document: Document,
    page_ids: Vec<ObjectId>,
}

impl SourceDocument {
    /// Parse a PDF from an in-memory buffer.
    ///
    /// # Errors
    ///
    /// - [`PdfPressError::CorruptDocument`] if the bytes are not a readable
    ///   PDF or the document has no pages
    /// - [`PdfPressError::EncryptedDocument`] if the document is encrypted
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let document = Document::load_mem(bytes)?;

        if document.is_encrypted() {
            return Err(PdfPressError::EncryptedDocument { source_index: None });
        }

        let page_ids: Vec<ObjectId> = document.get_pages().into_values().collect();
        if page_ids.is_empty() {
            return Err(PdfPressError::corrupt_document("document has no pages"));
        }

        log::debug!(
            "Parsed PDF {} ({} bytes, {} page(s))",
            document.version,
            bytes.len(),
            page_ids.len()
        );

        Ok(Self { document, page_ids })
    }

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// PDF header version, e.g. `"1.7"`.
    pub fn version(&self) -> &str {
        &self.document.version
    }

    /// Effective size of a page, with inherited MediaBox and rotation applied.
    pub fn page_size(&self, index: usize) -> Result<PageSize> {
        let page_id = self.page_id(index)?;

        let Some(media_box) = self.inherited(page_id, b"MediaBox") else {
            return Ok(DEFAULT_PAGE_SIZE);
        };
        let size = self.rectangle_size(&media_box).unwrap_or(DEFAULT_PAGE_SIZE);

        let rotate = self
            .inherited(page_id, b"Rotate")
            .and_then(|rotate| rotate.as_i64().ok())
            .unwrap_or(0);

        if rotate.rem_euclid(180) == 90 {
            Ok(PageSize {
                width: size.height,
                height: size.width,
            })
        } else {
            Ok(size)
        }
    }

    pub(crate) fn document(&self) -> &Document {
        &self.document
    }

    pub(crate) fn page_id(&self, index: usize) -> Result<ObjectId> {
        self.page_ids
            .get(index)
            .copied()
            .ok_or(PdfPressError::IndexOutOfRange {
                index,
                page_count: self.page_ids.len(),
            })
    }

    /// The page dictionary with inherited attributes copied in and `Parent`
    /// removed, ready to be grafted into another page tree.
    pub(crate) fn detached_page(&self, page_id: ObjectId) -> Result<Dictionary> {
        let mut page = self.document.get_dictionary(page_id)?.clone();

        for key in INHERITABLE_KEYS {
            if !page.has(key)
                && let Some(value) = self.inherited(page_id, key)
            {
                page.set(key.to_vec(), value);
            }
        }
        page.remove(b"Parent");

        Ok(page)
    }

    /// Look up `key` on a page, then on each ancestor until found.
    fn inherited(&self, page_id: ObjectId, key: &[u8]) -> Option<Object> {
        let mut node = self.document.get_dictionary(page_id).ok()?;

        for _ in 0..MAX_TREE_DEPTH {
            if let Ok(value) = node.get(key) {
                return Some(value.clone());
            }
            let parent = node.get(b"Parent").and_then(Object::as_reference).ok()?;
            node = self.document.get_dictionary(parent).ok()?;
        }

        None
    }

    fn rectangle_size(&self, rect: &Object) -> Option<PageSize> {
        let (_, rect) = self.document.dereference(rect).ok()?;
        let values = rect
            .as_array()
            .ok()?
            .iter()
            .map(|value| {
                self.document
                    .dereference(value)
                    .ok()
                    .and_then(|(_, value)| value.as_float().ok())
            })
            .collect::<Option<Vec<f32>>>()?;

        match values.as_slice() {
            [x0, y0, x1, y1] => Some(PageSize {
                width: (x1 - x0).abs(),
                height: (y1 - y0).abs(),
            }),
            _ => None,
        }
    }
}
