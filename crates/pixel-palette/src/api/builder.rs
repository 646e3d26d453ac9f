//! Remapper builder, the main entry point for the crate.
//!
//! [`Remapper`] wraps palette mapping with fluent configuration.

use crate::color::Rgb;
use crate::dither::{Dither, DitherAlgorithm, DitherOptions, FloydSteinberg, Nearest, Ordered};
use crate::output::IndexedImage;
use crate::palette::Palette;

/// Maps images onto a fixed palette.
///
/// - Constructor requires a [`Palette`] (no invalid states)
/// - Configuration methods consume and return `self`
/// - [`remap()`](Self::remap) takes `&self` so one builder serves many images
///
/// # Example
///
/// ```
/// use pixel_palette::{DitherAlgorithm, Palette, Remapper, Rgb};
///
/// let palette = Palette::new(&[Rgb::BLACK, Rgb::WHITE]).unwrap();
/// let remapper = Remapper::new(palette).algorithm(DitherAlgorithm::FloydSteinberg);
///
/// let pixels = vec![Rgb::new(128, 128, 128); 4];
/// let result = remapper.remap(&pixels, 2, 2);
///
/// assert_eq!(result.width(), 2);
/// assert_eq!(result.indices().len(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct Remapper {
    palette: Palette,
    algorithm: DitherAlgorithm,
    options: DitherOptions,
}

impl Remapper {
    /// New remapper using nearest-color mapping.
    pub fn new(palette: Palette) -> Self {
        Self {
            palette,
            algorithm: DitherAlgorithm::None,
            options: DitherOptions::new(),
        }
    }

    #[inline]
    pub fn algorithm(mut self, algorithm: DitherAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    #[inline]
    pub fn serpentine(mut self, enabled: bool) -> Self {
        self.options = self.options.serpentine(enabled);
        self
    }

    /// Amplitude of the ordered-dither threshold offset.
    #[inline]
    pub fn ordered_spread(mut self, spread: f32) -> Self {
        self.options = self.options.ordered_spread(spread);
        self
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Map row-major pixels onto the palette.
    pub fn remap(&self, pixels: &[Rgb], width: usize, height: usize) -> IndexedImage {
        let indices = match self.algorithm {
            DitherAlgorithm::None => {
                Nearest.dither(pixels, width, height, &self.palette, &self.options)
            }
            DitherAlgorithm::FloydSteinberg => {
                FloydSteinberg.dither(pixels, width, height, &self.palette, &self.options)
            }
            DitherAlgorithm::Ordered => {
                Ordered.dither(pixels, width, height, &self.palette, &self.options)
            }
        };
        IndexedImage::new(indices, width, height, self.palette.clone())
    }
}
