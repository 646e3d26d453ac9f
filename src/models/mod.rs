pub mod settings;

pub use settings::{DitherMode, PaletteChoice, TransformSettings, MAX_GRID_ROWS};
