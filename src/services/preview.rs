use image::RgbImage;
use std::path::Path;
use std::sync::Arc;

use crate::error::PipelineError;
use crate::models::TransformSettings;
use crate::services::batch::decode_image;
use crate::services::{RenderOutput, Transformer};
use crate::viewport::{Point, Viewport};

/// Interactive preview state: settings, one source image, its rendering and
/// the zoom/scroll position.
///
/// Changing settings or the image re-renders explicitly; zoom and pan only
/// touch the viewport.
pub struct PreviewSession {
    transformer: Arc<Transformer>,
    settings: TransformSettings,
    source: Option<RgbImage>,
    rendered: Option<RenderOutput>,
    viewport: Viewport,
}

impl PreviewSession {
    pub fn new(
        transformer: Arc<Transformer>,
        settings: TransformSettings,
        view_width: u32,
        view_height: u32,
    ) -> Self {
        Self {
            transformer,
            settings: settings.normalized(),
            source: None,
            rendered: None,
            viewport: Viewport::new(view_width, view_height, view_width, view_height),
        }
    }

    pub fn settings(&self) -> &TransformSettings {
        &self.settings
    }

    pub fn rendered(&self) -> Option<&RenderOutput> {
        self.rendered.as_ref()
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn load_image(&mut self, path: &Path) -> Result<(), PipelineError> {
        let image = decode_image(path)?;
        tracing::debug!(path = %path.display(), "Loaded preview image");
        self.set_image(image)
    }

    pub fn set_image(&mut self, image: RgbImage) -> Result<(), PipelineError> {
        self.source = Some(image);
        self.rerender()
    }

    pub fn set_settings(&mut self, settings: TransformSettings) -> Result<(), PipelineError> {
        self.settings = settings.normalized();
        self.rerender()
    }

    fn rerender(&mut self) -> Result<(), PipelineError> {
        let Some(source) = &self.source else {
            return Ok(());
        };
        let output = self.transformer.render(&self.settings, source)?;
        self.viewport
            .set_image_size(output.image.width(), output.image.height());
        self.rendered = Some(output);
        Ok(())
    }

    pub fn zoom_in(&mut self, anchor: Option<Point>) -> (f64, f64) {
        self.viewport.zoom_in(anchor)
    }

    pub fn zoom_out(&mut self, anchor: Option<Point>) -> (f64, f64) {
        self.viewport.zoom_out(anchor)
    }

    pub fn zoom_to(&mut self, scale: f64, anchor: Option<Point>) -> (f64, f64) {
        self.viewport.zoom_to(scale, anchor)
    }

    pub fn pan(&mut self, dx: f64, dy: f64) -> (f64, f64) {
        self.viewport.pan(dx, dy)
    }
}
