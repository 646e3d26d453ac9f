use image::RgbImage;
use std::sync::Arc;

use crate::error::PipelineError;
use crate::models::{TransformSettings, MAX_GRID_ROWS};
use crate::rendering::{draw_grid, normalize, pixelate, GridStyle, LabelRenderer};

/// Result of running one image through the transform chain.
#[derive(Debug, Clone)]
pub struct RenderOutput {
    pub image: RgbImage,
    /// Pixel-art cell grid, when the pixel-art stage ran
    pub small_size: Option<(u32, u32)>,
    /// Grid divisions actually used
    pub grid_rows: u32,
}

/// Grid divisions for `settings`, following the pixel-art cell count when
/// synced.
pub fn effective_grid_rows(settings: &TransformSettings, small_size: Option<(u32, u32)>) -> u32 {
    match small_size {
        Some((w, h)) if settings.sync_grid_to_pixels => w.max(h).min(MAX_GRID_ROWS),
        _ => settings.grid_rows.min(MAX_GRID_ROWS),
    }
}

/// Runs the geometry, pixel-art, grid and numbering stages in order.
///
/// Shared between the batch runner and the preview; every call works on
/// its own copy of the image.
pub struct Transformer {
    labels: Arc<LabelRenderer>,
}

impl Transformer {
    pub fn new(labels: Arc<LabelRenderer>) -> Self {
        Self { labels }
    }

    pub fn render(
        &self,
        settings: &TransformSettings,
        image: &RgbImage,
    ) -> Result<RenderOutput, PipelineError> {
        let settings = settings.normalized();

        let mut current = normalize(
            image,
            settings.h_padding,
            settings.v_padding,
            settings.zoom_factor,
        );

        let mut small_size = None;
        if settings.pixel_art_enabled {
            let result = pixelate(
                &current,
                settings.pixel_art_scale,
                settings.palette,
                settings.dithering,
                settings.sharpen,
            )?;
            small_size = Some((result.small_w, result.small_h));
            current = result.image;
        }

        let grid_rows = effective_grid_rows(&settings, small_size);

        if settings.grid_enabled && grid_rows > 0 {
            current = draw_grid(
                &current,
                &GridStyle {
                    rows: grid_rows,
                    thickness: settings.grid_thickness,
                    highlight_every: settings.grid_highlight_every,
                    color: settings.grid_color,
                },
            );

            if settings.show_grid_numbers {
                current = self.labels.render(
                    &current,
                    grid_rows,
                    settings.grid_number_text_color,
                    settings.grid_number_bg_color,
                )?;
            }
        }

        Ok(RenderOutput {
            image: current,
            small_size,
            grid_rows,
        })
    }
}

impl Default for Transformer {
    fn default() -> Self {
        Self::new(Arc::new(LabelRenderer::without_fonts()))
    }
}
