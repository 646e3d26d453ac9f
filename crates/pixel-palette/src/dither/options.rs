//! Dithering options and configuration.

use crate::palette::WEB_SAFE_STEP;

/// Configuration options for dithering.
///
/// # Defaults
///
/// - Serpentine scanning: disabled (plain raster order, left to right)
/// - Ordered spread: 51, the level spacing of the web-safe palette
///
/// # Example
///
/// ```
/// use pixel_palette::DitherOptions;
///
/// let options = DitherOptions::new().serpentine(true).ordered_spread(32.0);
/// assert!(options.serpentine);
/// ```
#[derive(Debug, Clone)]
pub struct DitherOptions {
    /// Enable serpentine scanning (alternating row direction).
    ///
    /// When enabled, odd rows are processed right-to-left and the diffusion
    /// kernel is horizontally flipped. Ignored by ordered dithering.
    pub serpentine: bool,

    /// Amplitude of the ordered-dither threshold offset, in 8-bit channel
    /// units. Should match the spacing between palette levels.
    pub ordered_spread: f32,
}

impl Default for DitherOptions {
    fn default() -> Self {
        Self {
            serpentine: false,
            ordered_spread: WEB_SAFE_STEP as f32,
        }
    }
}

impl DitherOptions {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn serpentine(mut self, enabled: bool) -> Self {
        self.serpentine = enabled;
        self
    }

    #[inline]
    pub fn ordered_spread(mut self, spread: f32) -> Self {
        self.ordered_spread = spread;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let opts = DitherOptions::default();
        assert!(!opts.serpentine, "serpentine should default to false");
        assert!((opts.ordered_spread - 51.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_builder_chaining() {
        let opts = DitherOptions::new().serpentine(true).ordered_spread(16.0);
        assert!(opts.serpentine);
        assert!((opts.ordered_spread - 16.0).abs() < f32::EPSILON);
    }
}
