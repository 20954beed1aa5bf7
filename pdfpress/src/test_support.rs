//! Fixtures shared by unit tests.

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};

use crate::document::SourceDocument;
use crate::error::{PdfPressError, Result};
use crate::raster::{PageRasterizer, PixelBuffer, RasterSession};

/// A PDF whose pages have the given sizes and read "Page N".
pub(crate) fn sample_pdf(page_sizes: &[(i64, i64)]) -> Vec<u8> {
    build_pdf(page_sizes, None)
}

pub(crate) fn sample_pdf_with_rotation(page_sizes: &[(i64, i64)], rotate: i64) -> Vec<u8> {
    build_pdf(page_sizes, Some(rotate))
}

fn build_pdf(page_sizes: &[(i64, i64)], rotate: Option<i64>) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for (i, &(width, height)) in page_sizes.iter().enumerate() {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![36.into(), 36.into()]),
                Operation::new("Tj", vec![Object::string_literal(format!("Page {}", i + 1))]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let mut page = dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "MediaBox" => vec![0.into(), 0.into(), width.into(), height.into()],
        };
        if let Some(rotate) = rotate {
            page.set("Rotate", rotate);
        }
        kids.push(doc.add_object(page).into());
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_sizes.len() as i64,
            "Resources" => resources_id,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

/// Two pages whose link annotations point at each other.
pub(crate) fn cross_linked_pdf() -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let first = doc.new_object_id();
    let second = doc.new_object_id();

    for (page, target) in [(first, second), (second, first)] {
        let link = doc.add_object(dictionary! {
            "Type" => "Annot",
            "Subtype" => "Link",
            "Rect" => vec![0.into(), 0.into(), 20.into(), 20.into()],
            "Dest" => vec![target.into(), "Fit".into()],
            "P" => page,
        });
        doc.objects.insert(
            page,
            Object::Dictionary(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.into(), 0.into(), 200.into(), 200.into()],
                "Annots" => vec![link.into()],
            }),
        );
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![first.into(), second.into()],
            "Count" => 2,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

/// The text shown on each page, in page order.
pub(crate) fn page_texts(bytes: &[u8]) -> Vec<String> {
    let doc = Document::load_mem(bytes).unwrap();
    doc.get_pages()
        .into_values()
        .map(|page_id| {
            let content = Content::decode(&doc.get_page_content(page_id).unwrap()).unwrap();
            content
                .operations
                .iter()
                .find(|op| op.operator == "Tj")
                .and_then(|op| op.operands.first())
                .and_then(|text| text.as_str().ok())
                .map(|text| String::from_utf8_lossy(text).into_owned())
                .unwrap_or_default()
        })
        .collect()
}

/// Renders each page as deterministic noise sized from its MediaBox.
pub(crate) struct NoiseRasterizer;

impl PageRasterizer for NoiseRasterizer {
    fn open<'a>(&'a self, source: &'a [u8]) -> Result<Box<dyn RasterSession + 'a>> {
        Ok(Box::new(NoiseSession {
            document: SourceDocument::parse(source)?,
        }))
    }
}

struct NoiseSession {
    document: SourceDocument,
}

impl RasterSession for NoiseSession {
    fn page_count(&self) -> usize {
        self.document.page_count()
    }

    fn render(&mut self, page_number: u32, scale: f32) -> Result<PixelBuffer> {
        let size = self.document.page_size(page_number as usize - 1)?;
        let width = (size.width * scale).round() as u32;
        let height = (size.height * scale).round() as u32;

        let mut state = 0x9E37_79B9_u32 ^ page_number;
        let pixels = (0..width as usize * height as usize * 3)
            .map(|_| {
                state ^= state << 13;
                state ^= state >> 17;
                state ^= state << 5;
                state as u8
            })
            .collect();
        PixelBuffer::from_rgb(width, height, pixels)
    }
}

/// Fails to render one page and renders the rest as 1x1 pixels.
pub(crate) struct FailingRasterizer {
    pub fail_on: u32,
}

impl PageRasterizer for FailingRasterizer {
    fn open<'a>(&'a self, _source: &'a [u8]) -> Result<Box<dyn RasterSession + 'a>> {
        Ok(Box::new(FailingSession {
            fail_on: self.fail_on,
        }))
    }
}

struct FailingSession {
    fail_on: u32,
}

impl RasterSession for FailingSession {
    fn page_count(&self) -> usize {
        0
    }

    fn render(&mut self, page_number: u32, _scale: f32) -> Result<PixelBuffer> {
        if page_number == self.fail_on {
            return Err(PdfPressError::render(page_number, "unsupported shading"));
        }
        PixelBuffer::from_rgb(1, 1, vec![255, 255, 255])
    }
}
