//! Padding crop and uniform zoom.

use image::imageops::{self, FilterType};
use image::RgbImage;

/// Crop symmetric padding and apply `zoom`.
///
/// The crop only happens when both axes are larger than twice their
/// padding; otherwise neither axis is cropped. The resize is skipped when
/// the zoomed size rounds to zero on either axis or matches the current size.
pub fn normalize(image: &RgbImage, h_padding: u32, v_padding: u32, zoom: f64) -> RgbImage {
    let (width, height) = image.dimensions();

    let fits = |dim: u32, pad: u32| u64::from(dim) > 2 * u64::from(pad);

    let cropped = if fits(width, h_padding) && fits(height, v_padding) {
        if h_padding == 0 && v_padding == 0 {
            image.clone()
        } else {
            imageops::crop_imm(
                image,
                h_padding,
                v_padding,
                width - 2 * h_padding,
                height - 2 * v_padding,
            )
            .to_image()
        }
    } else {
        tracing::debug!(width, height, h_padding, v_padding, "Padding exceeds image, not cropping");
        image.clone()
    };

    let (width, height) = cropped.dimensions();
    let new_w = (width as f64 * zoom).round();
    let new_h = (height as f64 * zoom).round();

    if !(new_w >= 1.0 && new_h >= 1.0) || !new_w.is_finite() || !new_h.is_finite() {
        return cropped;
    }
    let (new_w, new_h) = (new_w as u32, new_h as u32);
    if (new_w, new_h) == (width, height) {
        return cropped;
    }

    imageops::resize(&cropped, new_w, new_h, FilterType::Lanczos3)
}
