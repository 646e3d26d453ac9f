//! Grid numbering: label margins and SVG-rendered row and column indices.

use image::RgbImage;
use pixel_palette::Rgb;
use resvg::usvg::{self, Transform};
use std::path::Path;
use std::sync::Arc;
use tiny_skia::Pixmap;

use crate::error::PipelineError;

/// Label every n-th grid line.
pub const LABEL_STEP: u32 = 10;
/// Labels whose value is a multiple of this are bold.
pub const BOLD_EVERY: u32 = 5;

const MIN_FONT_SIZE: u32 = 14;

/// Margin and grid geometry for a numbered image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumberingLayout {
    pub rows: u32,
    pub cols: u32,
    pub font_size: u32,
    pub margin: u32,
    width: u32,
    height: u32,
}

/// One label to stamp.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub bold: bool,
    pub axis: LabelAxis,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelAxis {
    /// Left of the image, right-aligned
    Row,
    /// Above the image, bottom-aligned
    Column,
}

impl NumberingLayout {
    /// Layout for a `width`×`height` image. The longer side gets
    /// `rows_setting` divisions, the shorter side proportionally fewer.
    /// Returns `None` when `rows_setting` is 0.
    pub fn compute(width: u32, height: u32, rows_setting: u32) -> Option<Self> {
        if rows_setting == 0 || width == 0 || height == 0 {
            return None;
        }
        let (longer, shorter) = (width.max(height), width.min(height));
        let short_count =
            ((rows_setting as f64 * shorter as f64 / longer as f64).round() as u32).max(1);
        let (rows, cols) = if height >= width {
            (rows_setting, short_count)
        } else {
            (short_count, rows_setting)
        };

        let font_size = (shorter / 40).max(MIN_FONT_SIZE);
        let margin = (0.07 * shorter as f64).max(2.5 * font_size as f64).round() as u32;

        Some(Self {
            rows,
            cols,
            font_size,
            margin,
            width,
            height,
        })
    }

    /// Size of the canvas including margins.
    pub fn canvas_size(&self) -> (u32, u32) {
        (self.width + self.margin, self.height + self.margin)
    }

    /// Canvas coordinate of line `index` out of `count` along `dim`.
    fn line_position(&self, index: u32, dim: u32, count: u32) -> f64 {
        self.margin as f64 + (index as f64 * dim as f64 / count as f64).round()
    }

    pub fn labels(&self) -> Vec<Label> {
        let pad = (self.font_size as f64 * 0.3).max(2.0);
        let mut labels = Vec::new();

        for index in (0..=self.rows).step_by(LABEL_STEP as usize) {
            let value = index / LABEL_STEP;
            labels.push(Label {
                text: value.to_string(),
                x: self.margin as f64 - pad,
                y: self.line_position(index, self.height, self.rows),
                bold: value % BOLD_EVERY == 0,
                axis: LabelAxis::Row,
            });
        }
        for index in (0..=self.cols).step_by(LABEL_STEP as usize) {
            let value = index / LABEL_STEP;
            labels.push(Label {
                text: value.to_string(),
                x: self.line_position(index, self.width, self.cols),
                y: self.margin as f64 - pad,
                bold: value % BOLD_EVERY == 0,
                axis: LabelAxis::Column,
            });
        }
        labels
    }
}

/// Stamps grid numbers into a margin around an image.
///
/// Labels are laid out as SVG text and rasterized with resvg, so any font
/// fontdb can load works.
pub struct LabelRenderer {
    fontdb: Arc<fontdb::Database>,
}

impl LabelRenderer {
    /// Load system fonts plus every font in `fonts_dir`.
    pub fn new(fonts_dir: Option<&Path>) -> Self {
        let mut fontdb = fontdb::Database::new();

        if let Some(dir) = fonts_dir {
            fontdb.load_fonts_dir(dir);
            tracing::debug!(dir = %dir.display(), "Loaded fonts directory");
        }
        fontdb.load_system_fonts();

        Self::from_database(fontdb)
    }

    /// Renderer with no fonts; labels are skipped but margins still drawn.
    pub fn without_fonts() -> Self {
        Self::from_database(fontdb::Database::new())
    }

    fn from_database(mut fontdb: fontdb::Database) -> Self {
        // Make the generic family resolvable even without the usual fonts
        let query = fontdb::Query {
            families: &[fontdb::Family::SansSerif],
            ..Default::default()
        };
        if fontdb.query(&query).is_none() {
            let fallback = fontdb
                .faces()
                .find_map(|f| f.families.first().map(|(name, _)| name.clone()));
            if let Some(name) = fallback {
                tracing::debug!(family = %name, "Using fallback sans-serif family");
                fontdb.set_sans_serif_family(name);
            }
        }

        tracing::info!(font_count = fontdb.len(), "Loaded fonts for grid labels");

        Self {
            fontdb: Arc::new(fontdb),
        }
    }

    pub fn has_fonts(&self) -> bool {
        self.fontdb.len() > 0
    }

    /// Extend `image` with label margins on the left and top and stamp
    /// row and column numbers. `rows_setting == 0` returns a copy.
    pub fn render(
        &self,
        image: &RgbImage,
        rows_setting: u32,
        text_color: Rgb,
        bg_color: Rgb,
    ) -> Result<RgbImage, PipelineError> {
        let (width, height) = image.dimensions();
        let Some(layout) = NumberingLayout::compute(width, height, rows_setting) else {
            return Ok(image.clone());
        };

        let (canvas_w, canvas_h) = layout.canvas_size();
        let mut canvas = RgbImage::from_pixel(canvas_w, canvas_h, image::Rgb(bg_color.to_bytes()));
        image::imageops::replace(&mut canvas, image, layout.margin as i64, layout.margin as i64);

        if !self.has_fonts() {
            tracing::warn!("No fonts available, grid numbers not drawn");
            return Ok(canvas);
        }

        let svg = build_label_svg(&layout, text_color);
        let pixmap = self.rasterize(&svg, canvas_w, canvas_h)?;
        composite(&mut canvas, &pixmap);

        Ok(canvas)
    }

    fn rasterize(&self, svg: &str, width: u32, height: u32) -> Result<Pixmap, PipelineError> {
        let options = usvg::Options {
            fontdb: self.fontdb.clone(),
            ..Default::default()
        };
        let tree = usvg::Tree::from_str(svg, &options)
            .map_err(|e| PipelineError::Labels(e.to_string()))?;

        let mut pixmap = Pixmap::new(width, height).ok_or(PipelineError::PixmapAllocation)?;
        resvg::render(&tree, Transform::identity(), &mut pixmap.as_mut());
        Ok(pixmap)
    }
}

fn build_label_svg(layout: &NumberingLayout, color: Rgb) -> String {
    let (width, height) = layout.canvas_size();
    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
    );
    svg.push_str(&format!(
        r#"<g font-family="sans-serif" font-size="{}" fill="{}">"#,
        layout.font_size,
        color.to_hex()
    ));
    for label in layout.labels() {
        let (anchor, baseline) = match label.axis {
            LabelAxis::Row => ("end", "central"),
            LabelAxis::Column => ("middle", "text-after-edge"),
        };
        let weight = if label.bold { "bold" } else { "normal" };
        svg.push_str(&format!(
            r#"<text x="{:.1}" y="{:.1}" text-anchor="{anchor}" dominant-baseline="{baseline}" font-weight="{weight}">{}</text>"#,
            label.x, label.y, label.text
        ));
    }
    svg.push_str("</g></svg>");
    svg
}

/// Blend a premultiplied RGBA pixmap over an opaque RGB canvas.
fn composite(canvas: &mut RgbImage, pixmap: &Pixmap) {
    for (dst, src) in canvas.pixels_mut().zip(pixmap.data().chunks_exact(4)) {
        let alpha = src[3] as u16;
        if alpha == 0 {
            continue;
        }
        for c in 0..3 {
            let blended = src[c] as u16 + (dst[c] as u16 * (255 - alpha) + 127) / 255;
            dst[c] = blended.min(255) as u8;
        }
    }
}
