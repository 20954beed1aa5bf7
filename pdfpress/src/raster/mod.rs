//! Page rasterization and image encoding.
//!
//! The compression pipeline only sees the two traits defined here:
//! [`PageRasterizer`] turns a page into pixels and [`ImageEncoder`] turns
//! pixels into a compressed image. Production implementations are backed by
//! PDFium and `jpeg-encoder`; tests plug in deterministic stand-ins.

mod jpeg;
mod pdfium;

pub use jpeg::JpegEncoder;
pub use pdfium::{PdfiumRasterizer, RasterizerConfig};

use crate::error::{PdfPressError, Result};

/// Bytes per pixel of a [`PixelBuffer`].
pub const RGB_CHANNELS: usize = 3;

/// A rendered page as tightly packed 8-bit RGB rows, top to bottom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap RGB pixel data.
    ///
    /// # Errors
    ///
    /// Returns [`PdfPressError::Encode`] if the buffer length does not match
    /// the dimensions.
    pub fn from_rgb(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * RGB_CHANNELS;
        if pixels.len() != expected {
            return Err(PdfPressError::encode(format!(
                "pixel buffer holds {} bytes, {width}x{height} RGB needs {expected}",
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Convert RGBA pixel data, dropping the alpha channel.
    pub fn from_rgba(width: u32, height: u32, rgba: &[u8]) -> Result<Self> {
        let pixels = rgba
            .chunks_exact(4)
            .flat_map(|pixel| [pixel[0], pixel[1], pixel[2]])
            .collect();
        Self::from_rgb(width, height, pixels)
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGB bytes.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}

/// Renders pages of a PDF to pixels.
pub trait PageRasterizer {
    /// Open a rendering session over a complete PDF file.
    ///
    /// The session is reused for every page of one compress operation.
    fn open<'a>(&'a self, source: &'a [u8]) -> Result<Box<dyn RasterSession + 'a>>;
}

/// A PDF opened for rendering.
pub trait RasterSession {
    /// Number of pages the backend sees in the document.
    fn page_count(&self) -> usize;

    /// Render a one-based page at `scale` times its size in points.
    ///
    /// Both axes are scaled by the same factor.
    fn render(&mut self, page_number: u32, scale: f32) -> Result<PixelBuffer>;
}

/// Compressed image formats that can be embedded in a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ImageFormat {
    /// Baseline or progressive JPEG.
    Jpeg,
}

impl ImageFormat {
    /// PDF stream filter that decodes this format.
    pub fn filter_name(&self) -> &'static str {
        match self {
            Self::Jpeg => "DCTDecode",
        }
    }
}

/// An encoded image ready to embed as an image XObject.
#[derive(Debug, Clone)]
pub struct EncodedImage {
    /// Encoded bytes.
    pub data: Vec<u8>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Encoding of `data`.
    pub format: ImageFormat,
}

/// Lossy image compression.
pub trait ImageEncoder {
    /// Encode `pixels` at `quality` in `(0, 1]`, where higher means larger
    /// output and better fidelity.
    fn encode(&self, pixels: &PixelBuffer, quality: f32) -> Result<EncodedImage>;
}
