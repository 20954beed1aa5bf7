use jpeg_encoder::{ColorType, Encoder, SamplingFactor};

use crate::error::{PdfPressError, Result};
use crate::raster::{EncodedImage, ImageEncoder, ImageFormat, PixelBuffer};

/// JPEG encoder tuned for size: progressive scans with 4:2:0 chroma
/// subsampling.
#[derive(Debug, Clone, Copy, Default)]
pub struct JpegEncoder;

impl JpegEncoder {
    /// Create a new encoder.
    pub fn new() -> Self {
        Self
    }

    /// Map a `(0, 1]` quality onto the encoder's 1..=100 scale.
    pub fn quality_percent(quality: f32) -> u8 {
        if quality.is_nan() {
            return 1;
        }
        (quality * 100.0).round().clamp(1.0, 100.0) as u8
    }
}

impl ImageEncoder for JpegEncoder {
    fn encode(&self, pixels: &PixelBuffer, quality: f32) -> Result<EncodedImage> {
        let width = u16::try_from(pixels.width()).map_err(|_| {
            PdfPressError::encode(format!("width {} exceeds JPEG limit", pixels.width()))
        })?;
        let height = u16::try_from(pixels.height()).map_err(|_| {
            PdfPressError::encode(format!("height {} exceeds JPEG limit", pixels.height()))
        })?;

        let mut data = Vec::new();
        let mut encoder = Encoder::new(&mut data, Self::quality_percent(quality));
        encoder.set_progressive(true);
        encoder.set_sampling_factor(SamplingFactor::R_4_2_0);
        encoder
            .encode(pixels.pixels(), width, height, ColorType::Rgb)
            .map_err(|e| PdfPressError::encode(e.to_string()))?;

        Ok(EncodedImage {
            data,
            width: pixels.width(),
            height: pixels.height(),
            format: ImageFormat::Jpeg,
        })
    }
}
