//! Floyd-Steinberg error diffusion dithering algorithm.

use crate::color::Rgb;
use crate::palette::Palette;

use super::{dither_with_kernel, Dither, DitherOptions, FLOYD_STEINBERG};

/// Floyd-Steinberg error diffusion dithering.
///
/// Distributes 100% of the quantization error to four neighbors:
///
/// ```text
///        X   7
///    3   5   1
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct FloydSteinberg;

impl Dither for FloydSteinberg {
    fn dither(
        &self,
        image: &[Rgb],
        width: usize,
        height: usize,
        palette: &Palette,
        options: &DitherOptions,
    ) -> Vec<u8> {
        dither_with_kernel(image, width, height, palette, &FLOYD_STEINBERG, options)
    }
}
