//! Palette struct with nearest-color matching.

use std::collections::HashSet;
use std::str::FromStr;

use super::error::PaletteError;
use crate::color::Rgb;

/// Largest palette addressable by a `u8` index.
pub const MAX_PALETTE_SIZE: usize = 256;

/// An ordered set of distinct colors.
///
/// Indices into the palette fit in a `u8`, so a palette holds at most
/// [`MAX_PALETTE_SIZE`] entries. Matching uses squared Euclidean distance in
/// RGB; ties resolve to the lowest index so results are deterministic.
///
/// # Example
///
/// ```
/// use pixel_palette::{Palette, Rgb};
///
/// let palette = Palette::new(&[Rgb::BLACK, Rgb::WHITE]).unwrap();
/// assert_eq!(palette.find_nearest(Rgb::new(200, 200, 200)), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    pub(super) colors: Vec<Rgb>,
}

impl Palette {
    /// Create a palette from a list of distinct colors.
    ///
    /// # Errors
    ///
    /// - [`PaletteError::EmptyPalette`] when `colors` is empty
    /// - [`PaletteError::TooManyColors`] when more than 256 colors are given
    /// - [`PaletteError::DuplicateColor`] when a color repeats
    pub fn new(colors: &[Rgb]) -> Result<Self, PaletteError> {
        if colors.is_empty() {
            return Err(PaletteError::EmptyPalette);
        }
        if colors.len() > MAX_PALETTE_SIZE {
            return Err(PaletteError::TooManyColors {
                count: colors.len(),
            });
        }

        let mut seen = HashSet::new();
        for (i, color) in colors.iter().enumerate() {
            if !seen.insert(*color) {
                return Err(PaletteError::DuplicateColor { index: i });
            }
        }

        Ok(Self {
            colors: colors.to_vec(),
        })
    }

    /// Create a palette from hex strings (`#RRGGBB` or `#RGB`).
    pub fn from_hex(colors: &[&str]) -> Result<Self, PaletteError> {
        let parsed = colors
            .iter()
            .map(|s| Rgb::from_str(s).map_err(PaletteError::ParseColor))
            .collect::<Result<Vec<_>, _>>()?;
        Palette::new(&parsed)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Color at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    #[inline]
    pub fn color(&self, index: usize) -> Rgb {
        self.colors[index]
    }

    #[inline]
    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    /// Index of the palette entry closest to `color`.
    pub fn find_nearest(&self, color: Rgb) -> usize {
        let mut best_idx = 0;
        let mut best_dist = u32::MAX;
        for (i, &entry) in self.colors.iter().enumerate() {
            let dist = color.distance_sq(entry);
            if dist < best_dist {
                best_dist = dist;
                best_idx = i;
                if dist == 0 {
                    break;
                }
            }
        }
        best_idx
    }

    /// Index of an entry that equals `color` byte-for-byte, if any.
    pub fn find_exact(&self, color: Rgb) -> Option<usize> {
        self.colors.iter().position(|&c| c == color)
    }
}
