use crate::config::CompressionLevel;

/// What to return after a rasterizing pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackDecision {
    /// Keep the rasterized document.
    AcceptRasterized,
    /// Discard it and hand back the input bytes unchanged.
    RevertToOriginal,
}

impl FallbackDecision {
    /// Decide between the rasterized output and the original input.
    ///
    /// | rasterized smaller | level  | decision          |
    /// |--------------------|--------|-------------------|
    /// | yes                | any    | accept rasterized |
    /// | no                 | high   | accept rasterized |
    /// | no                 | medium | revert            |
    /// | no                 | low    | revert            |
    pub fn decide(level: CompressionLevel, original_size: u64, rasterized_size: u64) -> Self {
        let shrunk = rasterized_size < original_size;
        match (shrunk, level) {
            (true, _) => Self::AcceptRasterized,
            (false, CompressionLevel::High) => Self::AcceptRasterized,
            (false, CompressionLevel::Medium) => Self::RevertToOriginal,
            (false, CompressionLevel::Low) => Self::RevertToOriginal,
        }
    }
}
