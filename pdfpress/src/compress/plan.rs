use crate::config::CompressionLevel;

/// Parameters of the rasterizing strategy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterSettings {
    /// Uniform factor applied to the page size in points.
    pub scale: f32,
    /// JPEG quality in `(0, 1]`.
    pub jpeg_quality: f32,
}

/// How a document is compressed, derived once from the requested level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CompressionPlan {
    /// Copy every page and re-serialize compactly. Lossless.
    Structural,
    /// Render every page and rebuild the document from JPEG images.
    Rasterize(RasterSettings),
}

impl CompressionPlan {
    /// The plan for a level.
    ///
    /// | level  | strategy   | quality | scale |
    /// |--------|------------|---------|-------|
    /// | low    | structural |         |       |
    /// | medium | rasterize  | 0.60    | 0.90  |
    /// | high   | rasterize  | 0.40    | 0.70  |
    pub fn for_level(level: CompressionLevel) -> Self {
        match level {
            CompressionLevel::Low => Self::Structural,
            CompressionLevel::Medium => Self::Rasterize(RasterSettings {
                scale: 0.9,
                jpeg_quality: 0.6,
            }),
            CompressionLevel::High => Self::Rasterize(RasterSettings {
                scale: 0.7,
                jpeg_quality: 0.4,
            }),
        }
    }

    /// Whether this plan renders pages to images.
    pub fn rasterizes(&self) -> bool {
        matches!(self, Self::Rasterize(_))
    }
}
