//! Mapping pixels onto a palette, with or without dithering.
//!
//! # Algorithms
//!
//! - **Nearest**: every pixel takes its closest palette entry, no dithering
//! - **Floyd-Steinberg**: classic error diffusion, 100% propagation
//! - **Ordered**: 8x8 Bayer threshold matrix, no error bleeding
//!
//! All algorithms implement the [`Dither`] trait and are configured through
//! [`DitherOptions`].

mod floyd_steinberg;
mod kernel;
mod nearest;
mod options;
mod ordered;

use std::collections::HashMap;

pub use floyd_steinberg::FloydSteinberg;
pub use kernel::{Kernel, FLOYD_STEINBERG};
pub use nearest::Nearest;
pub use options::DitherOptions;
pub use ordered::{Ordered, BAYER_8};

use crate::color::Rgb;
use crate::palette::Palette;

/// Dither algorithm selection for the [`Remapper`](crate::Remapper) builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DitherAlgorithm {
    /// Plain nearest-color mapping.
    #[default]
    None,

    /// Floyd-Steinberg error diffusion.
    FloydSteinberg,

    /// Ordered dithering with an 8x8 Bayer matrix.
    Ordered,
}

/// Trait for palette mapping algorithms.
///
/// Implementors take row-major pixels and return one palette index per
/// pixel.
pub trait Dither {
    fn dither(
        &self,
        image: &[Rgb],
        width: usize,
        height: usize,
        palette: &Palette,
        options: &DitherOptions,
    ) -> Vec<u8>;
}

/// Memoized nearest-color lookup.
///
/// Quantized images repeat a small number of colors, so caching the
/// search result avoids rescanning the palette for every pixel.
pub(crate) struct NearestCache<'a> {
    palette: &'a Palette,
    cache: HashMap<Rgb, u8>,
}

impl<'a> NearestCache<'a> {
    pub(crate) fn new(palette: &'a Palette) -> Self {
        Self {
            palette,
            cache: HashMap::new(),
        }
    }

    #[inline]
    pub(crate) fn lookup(&mut self, color: Rgb) -> u8 {
        let palette = self.palette;
        *self
            .cache
            .entry(color)
            .or_insert_with(|| palette.find_nearest(color) as u8)
    }
}

/// Error buffer for kernel-based error diffusion.
///
/// Holds `max_dy + 1` rows of per-channel error; rows rotate as the scan
/// advances so memory stays proportional to the image width.
pub(crate) struct ErrorBuffer {
    rows: Vec<Vec<[f32; 3]>>,
    width: usize,
}

impl ErrorBuffer {
    pub(crate) fn new(width: usize, depth: usize) -> Self {
        Self {
            rows: vec![vec![[0.0; 3]; width]; depth],
            width,
        }
    }

    /// Accumulated error for column `x` of the current row.
    #[inline]
    pub(crate) fn get_accumulated(&self, x: usize) -> [f32; 3] {
        self.rows[0][x]
    }

    /// Add error at column `x`, `row_offset` rows below the current one.
    /// Out-of-range positions are ignored.
    #[inline]
    pub(crate) fn add_error(&mut self, x: usize, row_offset: usize, error: [f32; 3]) {
        if x >= self.width || row_offset >= self.rows.len() {
            return;
        }
        let cell = &mut self.rows[row_offset][x];
        cell[0] += error[0];
        cell[1] += error[1];
        cell[2] += error[2];
    }

    pub(crate) fn advance_row(&mut self) {
        self.rows.rotate_left(1);
        if let Some(last) = self.rows.last_mut() {
            last.fill([0.0; 3]);
        }
    }
}

#[inline]
pub(crate) fn clamp_channel(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

/// Core error diffusion loop shared by kernel-based algorithms.
///
/// Accumulated error is added to each pixel, the sum is clamped into the
/// 8-bit range and matched against the palette, and the remaining error is
/// spread over the kernel's neighbors.
pub(crate) fn dither_with_kernel(
    image: &[Rgb],
    width: usize,
    height: usize,
    palette: &Palette,
    kernel: &Kernel,
    options: &DitherOptions,
) -> Vec<u8> {
    let mut output = vec![0u8; width * height];
    let mut nearest = NearestCache::new(palette);
    let mut error_buf = ErrorBuffer::new(width, kernel.max_dy + 1);
    let divisor = kernel.divisor as f32;

    for y in 0..height {
        let reverse = options.serpentine && y % 2 == 1;

        let x_range: Box<dyn Iterator<Item = usize>> = if reverse {
            Box::new((0..width).rev())
        } else {
            Box::new(0..width)
        };

        for x in x_range {
            let idx = y * width + x;
            let source = image[idx];
            let accumulated = error_buf.get_accumulated(x);
            let wanted = [
                (source.r as f32 + accumulated[0]).clamp(0.0, 255.0),
                (source.g as f32 + accumulated[1]).clamp(0.0, 255.0),
                (source.b as f32 + accumulated[2]).clamp(0.0, 255.0),
            ];
            let candidate = Rgb::new(
                clamp_channel(wanted[0]),
                clamp_channel(wanted[1]),
                clamp_channel(wanted[2]),
            );

            let palette_idx = nearest.lookup(candidate);
            output[idx] = palette_idx;

            let chosen = palette.color(palette_idx as usize);
            let error = [
                wanted[0] - chosen.r as f32,
                wanted[1] - chosen.g as f32,
                wanted[2] - chosen.b as f32,
            ];

            for &(dx, dy, weight) in kernel.entries {
                let effective_dx = if reverse { -dx } else { dx };
                let nx = x as i32 + effective_dx;
                if nx >= 0 && (nx as usize) < width && y + (dy as usize) < height {
                    let w = weight as f32 / divisor;
                    error_buf.add_error(
                        nx as usize,
                        dy as usize,
                        [error[0] * w, error[1] * w, error[2] * w],
                    );
                }
            }
        }

        error_buf.advance_row();
    }

    output
}
