//! Documents under construction.

use std::collections::hash_map::RandomState;
use std::collections::{HashMap, HashSet};
use std::hash::{BuildHasher, Hasher};

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, ObjectId, Stream, dictionary};

use crate::document::import::Importer;
use crate::document::source::SourceDocument;
use crate::error::{PdfPressError, Result};
use crate::raster::EncodedImage;

/// Serialization settings for [`OutputDocument::serialize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SerializeOptions {
    /// Drop unreferenced objects and empty streams, and Flate-compress
    /// streams that are stored uncompressed.
    pub compact: bool,
}

impl SerializeOptions {
    /// Minimal structural overhead.
    pub fn compact() -> Self {
        Self { compact: true }
    }
}

/// A page copied into an [`OutputDocument`] but not yet placed in its page
/// tree.
///
/// Handles are consumed by [`OutputDocument::append_page`] and are only valid
/// for the document that created them.
#[derive(Debug)]
#[must_use = "copied pages are discarded unless appended"]
pub struct PageHandle {
    owner: u64,
    page_id: ObjectId,
}

/// A fresh, mutable PDF being assembled from copied or rendered pages.
#[derive(Debug)]
pub struct OutputDocument {
    id: u64,
    document: Document,
    pages_id: ObjectId,
    page_count: usize,
    detached: HashSet<ObjectId>,
}

impl OutputDocument {
    /// Create an empty document.
    pub fn new() -> Self {
        let mut document = Document::with_version("1.7");
        let pages_id = document.new_object_id();
        document.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => Vec::<Object>::new(),
                "Count" => 0,
            }),
        );
        let catalog_id = document.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        document.trailer.set("Root", catalog_id);

        Self {
            id: owner_token(),
            document,
            pages_id,
            page_count: 0,
            detached: HashSet::new(),
        }
    }

    /// Number of pages appended so far.
    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// Copy pages of `source` into this document, in the order given.
    ///
    /// Indices are zero-based and may repeat; every occurrence yields its own
    /// page. Resources shared between the copied pages are imported once.
    /// The pages only become part of the document once passed to
    /// [`append_page`](Self::append_page).
    ///
    /// # Errors
    ///
    /// Returns [`PdfPressError::IndexOutOfRange`] if any index is not below
    /// the source page count. Nothing is copied in that case.
    pub fn copy_pages(
        &mut self,
        source: &SourceDocument,
        indices: &[usize],
    ) -> Result<Vec<PageHandle>> {
        let page_count = source.page_count();
        if let Some(&index) = indices.iter().find(|&&index| index >= page_count) {
            return Err(PdfPressError::IndexOutOfRange { index, page_count });
        }

        let pages = indices
            .iter()
            .map(|&index| {
                let source_page_id = source.page_id(index)?;
                Ok((source_page_id, source.detached_page(source_page_id)?))
            })
            .collect::<Result<Vec<_>>>()?;

        // Every target id exists before any page is imported, so links
        // between selected pages resolve in both directions.
        let mut first_copies: HashMap<ObjectId, ObjectId> = HashMap::new();
        let mut targets = Vec::with_capacity(pages.len());
        for (source_page_id, page) in pages {
            let page_id = self.document.new_object_id();
            let first_copy = *first_copies.entry(source_page_id).or_insert(page_id);
            targets.push((source_page_id, page, page_id, first_copy));
        }

        let mut importer = Importer::new(source.document());
        for (&source_page_id, &page_id) in &first_copies {
            importer.map(source_page_id, page_id);
        }

        let mut handles = Vec::with_capacity(targets.len());
        for (source_page_id, page, page_id, first_copy) in targets {
            let repeated = page_id != first_copy;
            if repeated {
                // A repeated page owns fresh annotations that point back at it.
                importer.forget_annotations(&page);
                importer.map(source_page_id, page_id);
            }

            let mut page = importer.import_dictionary(&mut self.document, &page);
            page.set("Parent", self.pages_id);
            self.document.objects.insert(page_id, Object::Dictionary(page));

            if repeated {
                importer.map(source_page_id, first_copy);
            }

            self.detached.insert(page_id);
            handles.push(PageHandle {
                owner: self.id,
                page_id,
            });
        }

        log::debug!(
            "Copied {} page(s) with {} object(s)",
            handles.len(),
            importer.copied()
        );

        Ok(handles)
    }

    /// Append a copied page at the end of the document.
    ///
    /// # Errors
    ///
    /// Returns [`PdfPressError::InvalidHandle`] if the handle was created by
    /// another document.
    pub fn append_page(&mut self, handle: PageHandle) -> Result<()> {
        if handle.owner != self.id || !self.detached.remove(&handle.page_id) {
            return Err(PdfPressError::InvalidHandle);
        }
        self.push_kid(handle.page_id)
    }

    /// Append a new page of exactly `width` x `height` points showing `image`
    /// stretched over the whole page from the origin.
    ///
    /// Returns the zero-based position of the new page.
    pub fn append_image_page(
        &mut self,
        width: u32,
        height: u32,
        image: &EncodedImage,
    ) -> Result<usize> {
        let width = i64::from(width);
        let height = i64::from(height);

        let image_id = self.document.add_object(
            Stream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Image",
                    "Width" => i64::from(image.width),
                    "Height" => i64::from(image.height),
                    "ColorSpace" => "DeviceRGB",
                    "BitsPerComponent" => 8,
                    "Filter" => image.format.filter_name(),
                },
                image.data.clone(),
            )
            .with_compression(false),
        );

        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![
                        width.into(),
                        0.into(),
                        0.into(),
                        height.into(),
                        0.into(),
                        0.into(),
                    ],
                ),
                Operation::new("Do", vec!["Im0".into()]),
                Operation::new("Q", vec![]),
            ],
        };
        let content = content
            .encode()
            .map_err(|e| PdfPressError::serialize(e.to_string()))?;
        let content_id = self.document.add_object(Stream::new(dictionary! {}, content));

        let page_id = self.document.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => vec![0.into(), 0.into(), width.into(), height.into()],
            "Resources" => dictionary! {
                "XObject" => dictionary! { "Im0" => image_id },
            },
            "Contents" => content_id,
        });

        self.push_kid(page_id)?;
        Ok(self.page_count - 1)
    }

    /// Serialize the document to PDF bytes.
    ///
    /// Pages that were copied but never appended are left out.
    pub fn serialize(mut self, options: SerializeOptions) -> Result<Vec<u8>> {
        for page_id in self.detached.drain() {
            self.document.objects.remove(&page_id);
        }

        if options.compact {
            self.document.prune_objects();
            self.document.delete_zero_length_streams();
            self.document.compress();
        }
        self.document.renumber_objects();

        let mut bytes = Vec::new();
        self.document
            .save_to(&mut bytes)
            .map_err(|e| PdfPressError::serialize(e.to_string()))?;

        log::debug!(
            "Serialized {} page(s) to {} bytes (compact: {})",
            self.page_count,
            bytes.len(),
            options.compact
        );

        Ok(bytes)
    }

    fn push_kid(&mut self, page_id: ObjectId) -> Result<()> {
        let pages = self
            .document
            .get_object_mut(self.pages_id)
            .and_then(Object::as_dict_mut)?;

        match pages.get_mut(b"Kids") {
            Ok(Object::Array(kids)) => kids.push(Object::Reference(page_id)),
            _ => return Err(PdfPressError::other("page tree is missing its Kids array")),
        }

        self.page_count += 1;
        pages.set("Count", self.page_count as i64);
        Ok(())
    }
}

// Identifies the document that issued a page handle.
fn owner_token() -> u64 {
    RandomState::new().build_hasher().finish()
}

impl Default for OutputDocument {
    fn default() -> Self {
        Self::new()
    }
}
