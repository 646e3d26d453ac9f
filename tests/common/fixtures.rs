//! Test fixtures: synthetic images and scratch folders.

use image::{Rgb, RgbImage};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Deterministic gradient image.
pub fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([
            (x * 255 / width.max(1)) as u8,
            (y * 255 / height.max(1)) as u8,
            ((x + y) % 256) as u8,
        ])
    })
}

pub fn solid(width: u32, height: u32, color: [u8; 3]) -> RgbImage {
    RgbImage::from_pixel(width, height, Rgb(color))
}

/// Empty scratch folder, removed when dropped.
pub fn scratch_folder() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Save `image` under `dir/name`; the format follows the extension.
pub fn write_image(dir: &Path, name: &str, image: &RgbImage) -> PathBuf {
    let path = dir.join(name);
    image.save(&path).expect("Failed to write fixture image");
    path
}

/// A file with an image extension but garbage content.
pub fn write_corrupt(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, b"definitely not an image").expect("Failed to write corrupt file");
    path
}

/// Names of the files in `dir/output`, sorted.
pub fn output_files(dir: &Path) -> Vec<String> {
    let out = dir.join("output");
    if !out.exists() {
        return Vec::new();
    }
    let mut names: Vec<String> = std::fs::read_dir(out)
        .expect("Failed to read output dir")
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
