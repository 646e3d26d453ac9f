//! Pixel-art conversion: downsample, quantize, dither, upsample.

use image::imageops::{self, FilterType};
use image::RgbImage;
use pixel_palette::{game_boy, median_cut, web_safe, DitherAlgorithm, Palette, Remapper, Rgb};

use crate::error::PipelineError;
use crate::models::{DitherMode, PaletteChoice};

/// Colors in the adaptive palette used for Floyd-Steinberg without a palette choice.
const ADAPTIVE_COLORS: usize = 256;

/// Pixel-art image together with its logical cell grid.
#[derive(Debug, Clone)]
pub struct PixelArtResult {
    pub image: RgbImage,
    pub small_w: u32,
    pub small_h: u32,
}

/// Render `image` as pixel art with `scale`×`scale` blocks.
///
/// The image is center-cropped to a multiple of `scale` first so every
/// block has integral size. Output dimensions are always
/// `small_w * scale` by `small_h * scale`.
pub fn pixelate(
    image: &RgbImage,
    scale: u32,
    palette: PaletteChoice,
    dithering: DitherMode,
    sharpen: bool,
) -> Result<PixelArtResult, PipelineError> {
    let scale = scale.max(1);
    let (width, height) = image.dimensions();
    let small_w = (width / scale).max(1);
    let small_h = (height / scale).max(1);
    let target_w = small_w * scale;
    let target_h = small_h * scale;

    let cropped = if (target_w, target_h) != (width, height) {
        let crop_w = target_w.min(width);
        let crop_h = target_h.min(height);
        imageops::crop_imm(
            image,
            (width - crop_w) / 2,
            (height - crop_h) / 2,
            crop_w,
            crop_h,
        )
        .to_image()
    } else {
        image.clone()
    };

    let small = imageops::resize(&cropped, small_w, small_h, FilterType::Nearest);
    let pixels: Vec<Rgb> = small.pixels().map(|p| Rgb::from_bytes(p.0)).collect();
    let (w, h) = (small_w as usize, small_h as usize);

    let quantized: Option<Palette> = match palette {
        PaletteChoice::None => None,
        PaletteChoice::GameBoy => Some(game_boy()),
        choice => match choice.adaptive_colors() {
            Some(n) => Some(median_cut(&pixels, n)?),
            None => None,
        },
    };

    let mapped: Vec<Rgb> = match (dithering, quantized) {
        (DitherMode::None, None) => pixels,
        (DitherMode::None, Some(p)) => Remapper::new(p).remap(&pixels, w, h).pixels(),
        (DitherMode::Ordered, quantized) => {
            let dithered = Remapper::new(web_safe())
                .algorithm(DitherAlgorithm::Ordered)
                .remap(&pixels, w, h)
                .pixels();
            match quantized {
                Some(p) => Remapper::new(p).remap(&dithered, w, h).pixels(),
                None => dithered,
            }
        }
        (DitherMode::FloydSteinberg, quantized) => {
            let target = match quantized {
                Some(p) => p,
                None => median_cut(&pixels, ADAPTIVE_COLORS)?,
            };
            Remapper::new(target)
                .algorithm(DitherAlgorithm::FloydSteinberg)
                .remap(&pixels, w, h)
                .pixels()
        }
    };

    tracing::debug!(small_w, small_h, scale, %palette, %dithering, "Pixelated image");

    let mut out = RgbImage::from_fn(target_w, target_h, |x, y| {
        let c = mapped[(y / scale) as usize * w + (x / scale) as usize];
        image::Rgb(c.to_bytes())
    });

    if sharpen {
        out = sharpen_image(&out);
    }

    Ok(PixelArtResult {
        image: out,
        small_w,
        small_h,
    })
}

/// 3x3 sharpen, `[-2,-2,-2; -2,32,-2; -2,-2,-2] / 16`. Border pixels are
/// copied unchanged.
pub fn sharpen_image(image: &RgbImage) -> RgbImage {
    let (width, height) = image.dimensions();
    let mut out = image.clone();
    if width < 3 || height < 3 {
        return out;
    }

    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let mut acc = [0i32; 3];
            for dy in 0..3 {
                for dx in 0..3 {
                    let weight = if dx == 1 && dy == 1 { 32 } else { -2 };
                    let p = image.get_pixel(x + dx - 1, y + dy - 1);
                    for c in 0..3 {
                        acc[c] += weight * p[c] as i32;
                    }
                }
            }
            let px = out.get_pixel_mut(x, y);
            for c in 0..3 {
                px[c] = (acc[c] as f32 / 16.0).round().clamp(0.0, 255.0) as u8;
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn gradient(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([(x * 7 % 256) as u8, (y * 5 % 256) as u8, ((x + y) % 256) as u8])
        })
    }

    fn assert_blocks_uniform(image: &RgbImage, scale: u32) {
        for y in 0..image.height() {
            for x in 0..image.width() {
                let anchor = image.get_pixel(x - x % scale, y - y % scale);
                assert_eq!(image.get_pixel(x, y), anchor, "block at ({x},{y}) not uniform");
            }
        }
    }

    #[test]
    fn test_dimensions_are_multiples_of_scale() {
        let result =
            pixelate(&gradient(103, 57), 8, PaletteChoice::None, DitherMode::None, false).unwrap();
        assert_eq!((result.small_w, result.small_h), (12, 7));
        assert_eq!(result.image.dimensions(), (96, 56));
        assert_blocks_uniform(&result.image, 8);
    }

    #[test]
    fn test_image_smaller_than_one_cell() {
        let result =
            pixelate(&gradient(3, 20), 8, PaletteChoice::None, DitherMode::None, false).unwrap();
        assert_eq!((result.small_w, result.small_h), (1, 2));
        assert_eq!(result.image.dimensions(), (8, 16));
        assert_blocks_uniform(&result.image, 8);
    }

    #[test]
    fn test_game_boy_palette_only() {
        let gb: HashSet<[u8; 3]> = game_boy().colors().iter().map(|c| c.to_bytes()).collect();
        for dithering in [DitherMode::None, DitherMode::Ordered, DitherMode::FloydSteinberg] {
            let result =
                pixelate(&gradient(64, 64), 4, PaletteChoice::GameBoy, dithering, false).unwrap();
            assert!(
                result.image.pixels().all(|p| gb.contains(&p.0)),
                "{dithering} produced a non Game Boy color"
            );
            assert_blocks_uniform(&result.image, 4);
        }
    }

    #[test]
    fn test_adaptive_palette_limits_colors() {
        let result =
            pixelate(&gradient(128, 128), 2, PaletteChoice::Colors16, DitherMode::None, false)
                .unwrap();
        let colors: HashSet<[u8; 3]> = result.image.pixels().map(|p| p.0).collect();
        assert!(colors.len() <= 16, "got {} colors", colors.len());
    }

    #[test]
    fn test_ordered_pattern_survives_adaptive_palette() {
        let image = gradient(128, 128);
        let plain = pixelate(&image, 1, PaletteChoice::Colors16, DitherMode::None, false).unwrap();
        let ordered =
            pixelate(&image, 1, PaletteChoice::Colors16, DitherMode::Ordered, false).unwrap();

        let differing = plain
            .image
            .pixels()
            .zip(ordered.image.pixels())
            .filter(|(a, b)| a != b)
            .count();
        let total = (128 * 128) as usize;
        assert!(differing > total / 10, "only {differing} of {total} pixels differ");
    }

    #[test]
    fn test_ordered_without_palette_is_web_safe() {
        let result =
            pixelate(&gradient(64, 64), 2, PaletteChoice::None, DitherMode::Ordered, false)
                .unwrap();
        assert!(result
            .image
            .pixels()
            .all(|p| p.0.iter().all(|&c| c % pixel_palette::WEB_SAFE_STEP == 0)));
    }

    #[test]
    fn test_sharpen_keeps_border_and_flat_areas() {
        let flat = RgbImage::from_pixel(6, 6, image::Rgb([100, 100, 100]));
        assert_eq!(sharpen_image(&flat), flat);

        let mut img = flat.clone();
        img.put_pixel(0, 0, image::Rgb([0, 0, 0]));
        img.put_pixel(3, 3, image::Rgb([120, 120, 120]));
        let out = sharpen_image(&img);
        assert_eq!(out.get_pixel(0, 0), &image::Rgb([0, 0, 0]));
        // 32*120 - 2*8*100 = 2240, / 16 = 140
        assert_eq!(out.get_pixel(3, 3), &image::Rgb([140, 140, 140]));
        // neighbor: 32*100 - 2*(7*100 + 120) = 1560, / 16 = 97.5
        assert_eq!(out.get_pixel(2, 3), &image::Rgb([98, 98, 98]));
    }
}
