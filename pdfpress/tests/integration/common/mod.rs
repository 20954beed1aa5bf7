//! Shared helpers for integration tests.
//!
//! Documents are synthesized with `lopdf` instead of read from fixtures.

#![allow(dead_code)]

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, ObjectId, Stream, dictionary};

use pdfpress::document::SourceDocument;
use pdfpress::error::{PdfPressError, Result};
use pdfpress::raster::{PageRasterizer, PixelBuffer, RasterSession};

/// US Letter in points.
pub const LETTER: (i64, i64) = (612, 792);

/// A4 in points.
pub const A4: (i64, i64) = (595, 842);

/// Build a PDF whose pages have the given sizes. Page `n` shows `"<label> n"`.
pub fn labelled_pdf(label: &str, page_sizes: &[(i64, i64)]) -> Vec<u8> {
    build(label, page_sizes, 0)
}

/// Build a letter-size PDF with `pages` pages labelled `"Page n"`.
pub fn pdf_with_pages(pages: usize) -> Vec<u8> {
    labelled_pdf("Page", &vec![LETTER; pages])
}

/// Like [`pdf_with_pages`], with an extra unreferenced stream of
/// incompressible bytes that inflates the file.
pub fn padded_pdf(pages: usize, padding: usize) -> Vec<u8> {
    build("Page", &vec![LETTER; pages], padding)
}

fn build(label: &str, page_sizes: &[(i64, i64)], padding: usize) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });

    let mut kids: Vec<Object> = Vec::new();
    for (i, &(width, height)) in page_sizes.iter().enumerate() {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 18.into()]),
                Operation::new("Td", vec![72.into(), 72.into()]),
                Operation::new(
                    "Tj",
                    vec![Object::string_literal(format!("{label} {}", i + 1))],
                ),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().expect("content encodes"),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "MediaBox" => vec![0.into(), 0.into(), width.into(), height.into()],
            "Resources" => dictionary! {
                "Font" => dictionary! { "F1" => font_id },
            },
        });
        kids.push(page_id.into());
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_sizes.len() as i64,
        }),
    );

    if padding > 0 {
        let noise = noise_bytes(padding, 0xDEAD_BEEF);
        doc.add_object(Stream::new(dictionary! {}, noise).with_compression(false));
    }

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("document saves");
    bytes
}

/// The first text run on each page, in page order.
pub fn page_labels(bytes: &[u8]) -> Vec<String> {
    let doc = Document::load_mem(bytes).expect("output parses");
    doc.get_pages()
        .into_values()
        .map(|page_id| {
            let Ok(data) = doc.get_page_content(page_id) else {
                return String::new();
            };
            Content::decode(&data)
                .ok()
                .and_then(|content| {
                    content
                        .operations
                        .into_iter()
                        .find(|op| op.operator == "Tj")
                })
                .and_then(|op| op.operands.first().cloned())
                .and_then(|text| {
                    text.as_str()
                        .ok()
                        .map(|s| String::from_utf8_lossy(s).into_owned())
                })
                .unwrap_or_default()
        })
        .collect()
}

/// Build a PDF where page `n` carries a link annotation to page `links[n]`
/// (both one-based).
pub fn linked_pdf(links: &[usize]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let page_ids: Vec<_> = links.iter().map(|_| doc.new_object_id()).collect();

    for (&page_id, &target) in page_ids.iter().zip(links) {
        let link = doc.add_object(dictionary! {
            "Type" => "Annot",
            "Subtype" => "Link",
            "Rect" => vec![72.into(), 72.into(), 144.into(), 96.into()],
            "Dest" => vec![page_ids[target - 1].into(), "Fit".into()],
            "P" => page_id,
        });
        doc.objects.insert(
            page_id,
            Object::Dictionary(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.into(), 0.into(), LETTER.0.into(), LETTER.1.into()],
                "Annots" => vec![link.into()],
            }),
        );
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => page_ids.iter().map(|&id| id.into()).collect::<Vec<Object>>(),
            "Count" => links.len() as i64,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("document saves");
    bytes
}

/// For each page, the one-based page its first link points at, or `None`
/// if the destination was dropped.
pub fn link_targets(bytes: &[u8]) -> Vec<Option<usize>> {
    let doc = Document::load_mem(bytes).expect("output parses");
    let pages = doc.get_pages();
    let number_of = |id: ObjectId| {
        pages
            .iter()
            .find(|&(_, &page)| page == id)
            .map(|(&n, _)| n as usize)
    };

    pages
        .values()
        .map(|&page_id| {
            let page = doc.get_dictionary(page_id).ok()?;
            let annots = page.get(b"Annots").and_then(Object::as_array).ok()?;
            let link_id = annots.first()?.as_reference().ok()?;
            let link = doc.get_dictionary(link_id).ok()?;
            let dest = link.get(b"Dest").and_then(Object::as_array).ok()?;
            number_of(dest.first()?.as_reference().ok()?)
        })
        .collect()
}

/// Effective size of each page, in page order.
pub fn page_sizes(bytes: &[u8]) -> Vec<(f32, f32)> {
    let document = SourceDocument::parse(bytes).expect("output parses");
    (0..document.page_count())
        .map(|index| {
            let size = document.page_size(index).expect("page exists");
            (size.width, size.height)
        })
        .collect()
}

fn noise_bytes(len: usize, seed: u32) -> Vec<u8> {
    let mut state = seed.max(1);
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            state as u8
        })
        .collect()
}

/// How a [`MediaBoxRasterizer`] fills its pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fill {
    /// Plain white, compresses to almost nothing.
    White,
    /// Pseudo-random pixels, compresses badly.
    Noise,
}

/// Renders each page as `MediaBox * scale` pixels without PDFium.
pub struct MediaBoxRasterizer {
    pub fill: Fill,
}

impl PageRasterizer for MediaBoxRasterizer {
    fn open<'a>(&'a self, source: &'a [u8]) -> Result<Box<dyn RasterSession + 'a>> {
        Ok(Box::new(MediaBoxSession {
            document: SourceDocument::parse(source)?,
            fill: self.fill,
        }))
    }
}

struct MediaBoxSession {
    document: SourceDocument,
    fill: Fill,
}

impl RasterSession for MediaBoxSession {
    fn page_count(&self) -> usize {
        self.document.page_count()
    }

    fn render(&mut self, page_number: u32, scale: f32) -> Result<PixelBuffer> {
        let size = self.document.page_size(page_number as usize - 1)?;
        let width = (size.width * scale).round() as u32;
        let height = (size.height * scale).round() as u32;
        let len = width as usize * height as usize * 3;

        let pixels = match self.fill {
            Fill::White => vec![255; len],
            Fill::Noise => noise_bytes(len, page_number),
        };
        PixelBuffer::from_rgb(width, height, pixels)
    }
}

/// Fails on one page; renders every other page as a single white pixel.
pub struct FailingRasterizer {
    pub fail_on: u32,
}

impl PageRasterizer for FailingRasterizer {
    fn open<'a>(&'a self, source: &'a [u8]) -> Result<Box<dyn RasterSession + 'a>> {
        let pages = SourceDocument::parse(source)?.page_count();
        Ok(Box::new(FailingSession {
            fail_on: self.fail_on,
            pages,
        }))
    }
}

struct FailingSession {
    fail_on: u32,
    pages: usize,
}

impl RasterSession for FailingSession {
    fn page_count(&self) -> usize {
        self.pages
    }

    fn render(&mut self, page_number: u32, _scale: f32) -> Result<PixelBuffer> {
        if page_number == self.fail_on {
            return Err(PdfPressError::render(page_number, "pattern fill not supported"));
        }
        PixelBuffer::from_rgb(1, 1, vec![255, 255, 255])
    }
}

/// Create a temporary output path that is removed on drop.
pub fn temp_output_path() -> tempfile::TempPath {
    tempfile::NamedTempFile::new()
        .expect("Failed to create temp file")
        .into_temp_path()
}
