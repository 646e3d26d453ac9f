//! Output types for palette-mapped images.

mod indexed_image;

pub use indexed_image::IndexedImage;
