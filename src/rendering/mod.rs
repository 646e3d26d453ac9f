pub mod geometry;
pub mod grid;
pub mod numbering;
pub mod pixel_art;

pub use geometry::normalize;
pub use grid::{draw_grid, GridStyle};
pub use numbering::{LabelRenderer, NumberingLayout};
pub use pixel_art::{pixelate, PixelArtResult};
