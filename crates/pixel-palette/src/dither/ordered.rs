//! Ordered (Bayer) dithering.
//!
//! Each pixel is offset by a position-dependent threshold from an 8x8 Bayer
//! matrix before being matched against the palette. No error propagates
//! between pixels, so the pattern is stable and tiles across the image.
//!
//! `serpentine` is ignored since there is no scan direction.

use crate::color::Rgb;
use crate::palette::Palette;

use super::{clamp_channel, Dither, DitherOptions, NearestCache};

/// 8x8 Bayer index matrix, values `0..64`.
#[rustfmt::skip]
pub const BAYER_8: [[u8; 8]; 8] = [
    [ 0, 32,  8, 40,  2, 34, 10, 42],
    [48, 16, 56, 24, 50, 18, 58, 26],
    [12, 44,  4, 36, 14, 46,  6, 38],
    [60, 28, 52, 20, 62, 30, 54, 22],
    [ 3, 35, 11, 43,  1, 33,  9, 41],
    [51, 19, 59, 27, 49, 17, 57, 25],
    [15, 47,  7, 39, 13, 45,  5, 37],
    [63, 31, 55, 23, 61, 29, 53, 21],
];

/// Threshold offset in `(-0.5, 0.5)` for pixel `(x, y)`.
#[inline]
fn threshold(x: usize, y: usize) -> f32 {
    (BAYER_8[y % 8][x % 8] as f32 + 0.5) / 64.0 - 0.5
}

/// Ordered dithering with an 8x8 Bayer matrix.
///
/// The offset amplitude comes from [`DitherOptions::ordered_spread`] and
/// should equal the spacing of the palette's channel levels (51 for the
/// web-safe palette).
#[derive(Debug, Clone, Copy, Default)]
pub struct Ordered;

impl Dither for Ordered {
    fn dither(
        &self,
        image: &[Rgb],
        width: usize,
        height: usize,
        palette: &Palette,
        options: &DitherOptions,
    ) -> Vec<u8> {
        let mut output = vec![0u8; width * height];
        let mut nearest = NearestCache::new(palette);

        for y in 0..height {
            for x in 0..width {
                let idx = y * width + x;
                let pixel = image[idx];
                let offset = threshold(x, y) * options.ordered_spread;
                let shifted = Rgb::new(
                    clamp_channel(pixel.r as f32 + offset),
                    clamp_channel(pixel.g as f32 + offset),
                    clamp_channel(pixel.b as f32 + offset),
                );
                output[idx] = nearest.lookup(shifted);
            }
        }

        output
    }
}
