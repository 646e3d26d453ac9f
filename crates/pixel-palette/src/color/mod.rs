//! Color types used throughout the crate.
//!
//! All palette and dithering work happens on 8-bit sRGB triples. The
//! renderer feeds in decoded image samples unchanged, so there is no gamma
//! handling here.
//!
//! # Example
//!
//! ```
//! use pixel_palette::Rgb;
//!
//! let orange: Rgb = "#ff8000".parse().unwrap();
//! assert_eq!(orange.to_bytes(), [255, 128, 0]);
//! ```

mod rgb;

pub use rgb::{ParseColorError, Rgb};
