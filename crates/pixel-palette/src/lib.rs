#![allow(clippy::module_inception)]

//! pixel-palette: palette construction and color mapping for pixel art
//!
//! This library builds small color palettes and maps RGB images onto them,
//! with or without dithering.
//!
//! # Quick Start
//!
//! ```
//! use pixel_palette::{median_cut, DitherAlgorithm, Remapper, Rgb};
//!
//! let pixels = vec![
//!     Rgb::new(10, 10, 10),
//!     Rgb::new(12, 12, 12),
//!     Rgb::new(240, 240, 240),
//!     Rgb::new(244, 244, 244),
//! ];
//! let palette = median_cut(&pixels, 2).unwrap();
//! assert_eq!(palette.len(), 2);
//!
//! let result = Remapper::new(palette)
//!     .algorithm(DitherAlgorithm::FloydSteinberg)
//!     .remap(&pixels, 2, 2);
//! assert_eq!(result.indices().len(), 4);
//! ```
//!
//! # Palettes
//!
//! - [`median_cut`]: adaptive palette of up to 256 colors
//! - [`web_safe`]: the 216-color 6x6x6 cube
//! - [`game_boy`]: the classic four greens
//!
//! # Mapping
//!
//! [`DitherAlgorithm`] selects nearest-color, Floyd-Steinberg or ordered
//! (Bayer) mapping. Distances are squared Euclidean in RGB.

pub mod api;
pub mod color;
pub mod dither;
pub mod output;
pub mod palette;

pub use api::Remapper;
pub use color::{ParseColorError, Rgb};
pub use dither::{Dither, DitherAlgorithm, DitherOptions, FloydSteinberg, Nearest, Ordered};
pub use output::IndexedImage;
pub use palette::{game_boy, median_cut, web_safe, Palette, PaletteError, WEB_SAFE_STEP};
