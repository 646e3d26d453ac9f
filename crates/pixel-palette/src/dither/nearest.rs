//! Nearest-color mapping without dithering.

use crate::color::Rgb;
use crate::palette::Palette;

use super::{Dither, DitherOptions, NearestCache};

/// Maps every pixel to its closest palette entry.
#[derive(Debug, Clone, Copy, Default)]
pub struct Nearest;

impl Dither for Nearest {
    fn dither(
        &self,
        image: &[Rgb],
        width: usize,
        height: usize,
        palette: &Palette,
        _options: &DitherOptions,
    ) -> Vec<u8> {
        debug_assert_eq!(image.len(), width * height);
        let mut nearest = NearestCache::new(palette);
        image.iter().map(|&p| nearest.lookup(p)).collect()
    }
}
