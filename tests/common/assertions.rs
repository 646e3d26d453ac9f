//! Assertion helpers for tests.

use image::RgbImage;
use pretty_assertions::assert_eq;
use std::path::Path;

/// Assert every `scale`×`scale` block has a single color.
pub fn assert_blocks_uniform(image: &RgbImage, scale: u32) {
    assert_eq!(image.width() % scale, 0, "width not a multiple of {scale}");
    assert_eq!(image.height() % scale, 0, "height not a multiple of {scale}");
    for y in 0..image.height() {
        for x in 0..image.width() {
            let anchor = image.get_pixel(x - x % scale, y - y % scale);
            assert_eq!(
                image.get_pixel(x, y),
                anchor,
                "pixel ({x},{y}) differs from its block"
            );
        }
    }
}

/// Assert the file at `path` starts with the PNG signature.
pub fn assert_png_file(path: &Path) {
    let bytes = std::fs::read(path).expect("Failed to read output");
    assert!(
        bytes.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]),
        "Expected PNG at {}",
        path.display()
    );
}

/// Assert the file at `path` starts with the JPEG SOI marker.
pub fn assert_jpeg_file(path: &Path) {
    let bytes = std::fs::read(path).expect("Failed to read output");
    assert!(
        bytes.starts_with(&[0xFF, 0xD8]),
        "Expected JPEG at {}",
        path.display()
    );
}

/// Rows (or columns) where every pixel equals `color`.
pub fn full_lines(image: &RgbImage, color: [u8; 3], horizontal: bool) -> Vec<u32> {
    let (outer, inner) = if horizontal {
        (image.height(), image.width())
    } else {
        (image.width(), image.height())
    };
    (0..outer)
        .filter(|&o| {
            (0..inner).all(|i| {
                let p = if horizontal {
                    image.get_pixel(i, o)
                } else {
                    image.get_pixel(o, i)
                };
                p.0 == color
            })
        })
        .collect()
}
