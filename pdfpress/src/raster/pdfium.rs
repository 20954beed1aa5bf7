use std::env;
use std::path::PathBuf;

use pdfium_render::prelude::*;

use crate::error::{PdfPressError, Result};
use crate::raster::{PageRasterizer, PixelBuffer, RasterSession};

/// Environment variable naming the directory that holds the PDFium library.
pub const PDFIUM_LIBRARY_ENV: &str = "PDFIUM_DYNAMIC_LIB_PATH";

/// Where to find the PDFium shared library.
#[derive(Debug, Clone, Default)]
pub struct RasterizerConfig {
    /// Directory containing the platform PDFium library. When unset, the
    /// `PDFIUM_DYNAMIC_LIB_PATH` environment variable is consulted, then the
    /// system library search path.
    pub library_dir: Option<PathBuf>,
}

impl RasterizerConfig {
    fn resolved_library_dir(&self) -> Option<PathBuf> {
        self.library_dir
            .clone()
            .or_else(|| env::var_os(PDFIUM_LIBRARY_ENV).map(PathBuf::from))
    }
}

/// Rasterizer backed by a dynamically loaded PDFium library.
pub struct PdfiumRasterizer {
    pdfium: Pdfium,
}

impl PdfiumRasterizer {
    /// Bind to PDFium using the default search order.
    pub fn new() -> Result<Self> {
        Self::with_config(&RasterizerConfig::default())
    }

    /// Bind to PDFium as configured.
    ///
    /// # Errors
    ///
    /// Returns [`PdfPressError::RasterizerUnavailable`] if no library can be
    /// loaded.
    pub fn with_config(config: &RasterizerConfig) -> Result<Self> {
        let bindings = match config.resolved_library_dir() {
            Some(dir) => {
                let dir = dir.to_string_lossy().into_owned();
                log::debug!("Binding to PDFium in {dir}");
                Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(&dir))
                    .or_else(|_| Pdfium::bind_to_system_library())
            }
            None => Pdfium::bind_to_system_library(),
        }
        .map_err(|e| PdfPressError::rasterizer_unavailable(format!("{e:?}")))?;

        Ok(Self {
            pdfium: Pdfium::new(bindings),
        })
    }
}

impl PageRasterizer for PdfiumRasterizer {
    fn open<'a>(&'a self, source: &'a [u8]) -> Result<Box<dyn RasterSession + 'a>> {
        let document = self
            .pdfium
            .load_pdf_from_byte_slice(source, None)
            .map_err(|e| PdfPressError::corrupt_document(format!("{e:?}")))?;
        Ok(Box::new(PdfiumSession { document }))
    }
}

struct PdfiumSession<'a> {
    document: PdfDocument<'a>,
}

impl RasterSession for PdfiumSession<'_> {
    fn page_count(&self) -> usize {
        self.document.pages().len() as usize
    }

    fn render(&mut self, page_number: u32, scale: f32) -> Result<PixelBuffer> {
        let index = page_number
            .checked_sub(1)
            .and_then(|index| index.try_into().ok())
            .ok_or_else(|| PdfPressError::render(page_number, "page number out of range"))?;

        let page = self
            .document
            .pages()
            .get(index)
            .map_err(|e| PdfPressError::render(page_number, format!("{e:?}")))?;

        let bitmap = page
            .render_with_config(&PdfRenderConfig::new().scale_page_by_factor(scale))
            .map_err(|e| PdfPressError::render(page_number, format!("{e:?}")))?;

        let width = u32::try_from(bitmap.width())
            .map_err(|_| PdfPressError::render(page_number, "negative bitmap width"))?;
        let height = u32::try_from(bitmap.height())
            .map_err(|_| PdfPressError::render(page_number, "negative bitmap height"))?;

        PixelBuffer::from_rgba(width, height, &bitmap.as_rgba_bytes())
    }
}
