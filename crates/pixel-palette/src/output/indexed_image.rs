//! [`IndexedImage`] pairs palette indices with their palette and dimensions.

use crate::color::Rgb;
use crate::palette::Palette;

/// A palette-mapped image.
///
/// Stores one `u8` palette index per pixel in row-major order. RGB output is
/// computed on demand by looking up palette colors.
///
/// # Example
///
/// ```
/// use pixel_palette::{IndexedImage, Palette, Rgb};
///
/// let palette = Palette::new(&[Rgb::BLACK, Rgb::WHITE]).unwrap();
/// let image = IndexedImage::new(vec![0, 1, 1, 0], 2, 2, palette);
///
/// assert_eq!(image.indices(), &[0, 1, 1, 0]);
/// assert_eq!(image.to_rgb().len(), 2 * 2 * 3);
/// ```
#[derive(Debug, Clone)]
pub struct IndexedImage {
    indices: Vec<u8>,
    width: usize,
    height: usize,
    palette: Palette,
}

impl IndexedImage {
    /// Wrap palette indices. Each value must be in `0..palette.len()`.
    ///
    /// # Panics (debug only)
    ///
    /// Debug-asserts that `indices.len() == width * height`.
    pub fn new(indices: Vec<u8>, width: usize, height: usize, palette: Palette) -> Self {
        debug_assert_eq!(
            indices.len(),
            width * height,
            "indices length ({}) must match width * height ({}x{})",
            indices.len(),
            width,
            height,
        );
        Self {
            indices,
            width,
            height,
            palette,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn indices(&self) -> &[u8] {
        &self.indices
    }

    #[inline]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Resolved colors, one per pixel.
    pub fn pixels(&self) -> Vec<Rgb> {
        self.indices
            .iter()
            .map(|&i| self.palette.color(i as usize))
            .collect()
    }

    /// Interleaved RGB bytes, 3 per pixel.
    pub fn to_rgb(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.indices.len() * 3);
        for &i in &self.indices {
            out.extend_from_slice(&self.palette.color(i as usize).to_bytes());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> IndexedImage {
        let palette = Palette::from_hex(&["#ff0000", "#00ff00", "#0000ff"]).unwrap();
        IndexedImage::new(vec![0, 1, 2, 1, 0, 2], 3, 2, palette)
    }

    #[test]
    fn test_accessors() {
        let image = sample();
        assert_eq!(image.width(), 3);
        assert_eq!(image.height(), 2);
        assert_eq!(image.palette().len(), 3);
    }

    #[test]
    fn test_to_rgb_looks_up_palette() {
        let rgb = sample().to_rgb();
        assert_eq!(rgb.len(), 18);
        assert_eq!(&rgb[0..3], &[255, 0, 0]);
        assert_eq!(&rgb[3..6], &[0, 255, 0]);
        assert_eq!(&rgb[15..18], &[0, 0, 255]);
    }

    #[test]
    fn test_pixels() {
        let pixels = sample().pixels();
        assert_eq!(pixels[2], Rgb::new(0, 0, 255));
        assert_eq!(pixels[3], Rgb::new(0, 255, 0));
    }
}
