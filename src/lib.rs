//! Gridsmith - grid overlays and pixel art for reference images
//!
//! Batch-transforms a folder of images: padding crop and zoom, optional
//! pixel-art conversion, grid overlay and grid numbering.
//! This library exposes modules for integration testing.

pub mod error;
pub mod models;
pub mod rendering;
pub mod services;
pub mod viewport;
