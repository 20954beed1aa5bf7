//! Document compression.
//!
//! A [`CompressionLevel`] selects a [`CompressionPlan`]. The structural plan
//! copies every page into a fresh document and serializes it compactly. The
//! rasterizing plan renders each page, re-encodes it as JPEG and rebuilds the
//! document from those images; [`FallbackDecision`] then decides whether the
//! rebuilt document or the original input is returned.
//!
//! # Examples
//!
//! ```no_run
//! use pdfpress::compress;
//!
//! # fn example(input: Vec<u8>) -> pdfpress::Result<()> {
//! let result = compress::compress(&input, "medium")?;
//! println!("{} -> {} bytes", result.original_size, result.new_size);
//! # Ok(())
//! # }
//! ```

mod fallback;
mod plan;

pub use fallback::FallbackDecision;
pub use plan::{CompressionPlan, RasterSettings};

use serde::Serialize;

use crate::config::CompressionLevel;
use crate::document::{OutputDocument, SerializeOptions, SourceDocument};
use crate::error::Result;
use crate::raster::{
    ImageEncoder, JpegEncoder, PageRasterizer, PdfiumRasterizer, RasterizerConfig,
};

/// Progress of a rasterizing pass, reported after each finished page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressProgress {
    /// One-based number of the page just embedded.
    pub page: usize,
    /// Pages in the document.
    pub total_pages: usize,
}

/// Which buffer a compression returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CompressionOutcome {
    /// Pages were copied and re-serialized.
    Structural,
    /// Pages were replaced by rendered images.
    Rasterized,
    /// Rasterizing did not pay off; the input bytes were returned unchanged.
    RevertedToOriginal,
}

/// Output of a compression.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompressionResult {
    /// The selected PDF bytes.
    #[serde(skip)]
    pub bytes: Vec<u8>,
    /// Length of the input.
    pub original_size: u64,
    /// Length of `bytes`.
    pub new_size: u64,
    /// Level the request resolved to.
    pub level: CompressionLevel,
    /// Strategy that produced `bytes`.
    pub outcome: CompressionOutcome,
}

impl CompressionResult {
    fn new(
        bytes: Vec<u8>,
        original_size: u64,
        level: CompressionLevel,
        outcome: CompressionOutcome,
    ) -> Self {
        Self {
            new_size: bytes.len() as u64,
            bytes,
            original_size,
            level,
            outcome,
        }
    }

    /// Percentage of the input size saved; negative if the output grew.
    pub fn savings_percent(&self) -> f64 {
        if self.original_size == 0 {
            return 0.0;
        }
        (1.0 - self.new_size as f64 / self.original_size as f64) * 100.0
    }
}

/// Compresses documents with a pluggable rasterizer and image encoder.
pub struct Compressor<R, E> {
    rasterizer: R,
    encoder: E,
}

impl Compressor<PdfiumRasterizer, JpegEncoder> {
    /// A compressor rendering with PDFium and encoding JPEG.
    pub fn with_pdfium(config: &RasterizerConfig) -> Result<Self> {
        Ok(Self::new(PdfiumRasterizer::with_config(config)?, JpegEncoder::new()))
    }
}

impl<R: PageRasterizer, E: ImageEncoder> Compressor<R, E> {
    /// Create a compressor from its backends.
    pub fn new(rasterizer: R, encoder: E) -> Self {
        Self {
            rasterizer,
            encoder,
        }
    }

    /// Compress `source` at `level`.
    pub fn compress(&self, source: &[u8], level: CompressionLevel) -> Result<CompressionResult> {
        self.compress_with_progress(source, level, |_| {})
    }

    /// Compress `source` at `level`, calling `progress` after every page of
    /// a rasterizing pass.
    ///
    /// # Errors
    ///
    /// Fails if the source cannot be parsed or, when rasterizing, if any page
    /// fails to render or encode. No partial document is returned.
    pub fn compress_with_progress<F>(
        &self,
        source: &[u8],
        level: CompressionLevel,
        mut progress: F,
    ) -> Result<CompressionResult>
    where
        F: FnMut(CompressProgress),
    {
        let document = SourceDocument::parse(source)?;

        let settings = match CompressionPlan::for_level(level) {
            CompressionPlan::Structural => return compress_structurally(source, &document, level),
            CompressionPlan::Rasterize(settings) => settings,
        };

        let original_size = source.len() as u64;
        let rasterized = self.rasterize(source, &document, settings, &mut progress)?;

        let new_size = rasterized.len() as u64;
        let result = match FallbackDecision::decide(level, original_size, new_size) {
            FallbackDecision::AcceptRasterized => CompressionResult::new(
                rasterized,
                original_size,
                level,
                CompressionOutcome::Rasterized,
            ),
            FallbackDecision::RevertToOriginal => {
                log::warn!(
                    "Rasterized output ({new_size} bytes) is not smaller than the input \
                     ({original_size} bytes), keeping the original"
                );
                CompressionResult::new(
                    source.to_vec(),
                    original_size,
                    level,
                    CompressionOutcome::RevertedToOriginal,
                )
            }
        };

        log::info!(
            "Compressed {} page(s) at {level}: {} -> {} bytes ({:?})",
            document.page_count(),
            result.original_size,
            result.new_size,
            result.outcome
        );

        Ok(result)
    }

    fn rasterize(
        &self,
        source: &[u8],
        document: &SourceDocument,
        settings: RasterSettings,
        progress: &mut impl FnMut(CompressProgress),
    ) -> Result<Vec<u8>> {
        let total_pages = document.page_count();
        let mut session = self.rasterizer.open(source)?;
        if session.page_count() != total_pages {
            log::debug!(
                "Rasterizer sees {} page(s), parser sees {total_pages}",
                session.page_count()
            );
        }

        let mut output = OutputDocument::new();
        for (page, page_number) in (1..=total_pages).zip(1u32..) {
            let pixels = session.render(page_number, settings.scale)?;
            let image = self.encoder.encode(&pixels, settings.jpeg_quality)?;
            output.append_image_page(pixels.width(), pixels.height(), &image)?;

            log::debug!(
                "Rasterized page {page}/{total_pages}: {}x{} px, {} bytes",
                pixels.width(),
                pixels.height(),
                image.data.len()
            );
            progress(CompressProgress { page, total_pages });
        }

        output.serialize(SerializeOptions::compact())
    }
}

fn compress_structurally(
    source: &[u8],
    document: &SourceDocument,
    level: CompressionLevel,
) -> Result<CompressionResult> {
    let all_pages: Vec<usize> = (0..document.page_count()).collect();
    let mut output = OutputDocument::new();
    for handle in output.copy_pages(document, &all_pages)? {
        output.append_page(handle)?;
    }
    let bytes = output.serialize(SerializeOptions::compact())?;

    let result = CompressionResult::new(
        bytes,
        source.len() as u64,
        level,
        CompressionOutcome::Structural,
    );
    log::info!(
        "Re-serialized {} page(s): {} -> {} bytes",
        document.page_count(),
        result.original_size,
        result.new_size
    );
    Ok(result)
}

/// Compress `source` with the named level using the default backends.
///
/// Unknown level names are treated as `"medium"`. The structural level does
/// not need the PDFium library.
pub fn compress(source: &[u8], level: &str) -> Result<CompressionResult> {
    compress_with_config(source, CompressionLevel::from_name(level), &RasterizerConfig::default())
}

/// Compress `source` at `level`, binding PDFium as configured when needed.
pub fn compress_with_config(
    source: &[u8],
    level: CompressionLevel,
    config: &RasterizerConfig,
) -> Result<CompressionResult> {
    match CompressionPlan::for_level(level) {
        CompressionPlan::Structural => {
            let document = SourceDocument::parse(source)?;
            compress_structurally(source, &document, level)
        }
        CompressionPlan::Rasterize(_) => Compressor::with_pdfium(config)?.compress(source, level),
    }
}
