//! Palette storage, fixed presets and median-cut palette extraction.

mod error;
mod median_cut;
mod palette;
mod presets;

pub use error::PaletteError;
pub use median_cut::median_cut;
pub use palette::{Palette, MAX_PALETTE_SIZE};
pub use presets::{game_boy, web_safe, WEB_SAFE_STEP};
