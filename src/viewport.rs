//! Zoom and scroll bookkeeping for the interactive preview.
//!
//! Scroll positions are fractions in `[0, 1]` of the content extent, the
//! same convention scrollbars use. Zooming keeps an anchor point (cursor or
//! viewport center) visually fixed.

/// Smallest allowed zoom scale; values below snap here.
pub const MIN_SCALE: f64 = 1.0;
/// Largest allowed zoom scale.
pub const MAX_SCALE: f64 = 4.0;
/// Multiplicative step for zoom in/out.
pub const ZOOM_STEP: f64 = 1.2;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Content bounding box in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BBox {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl BBox {
    pub const fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }
}

/// Inputs of one zoom action.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportState {
    pub scale: f64,
    pub content_bbox_before: BBox,
    pub content_bbox_after: BBox,
    /// Anchor in canvas coordinates before the zoom
    pub anchor_abs: Point,
    /// Anchor relative to the visible viewport
    pub anchor_screen: Point,
}

impl ViewportState {
    pub fn remap(&self) -> (f64, f64) {
        remap_viewport(
            self.content_bbox_before,
            self.content_bbox_after,
            self.anchor_abs,
            self.anchor_screen,
        )
    }
}

/// Clamp a zoom scale into `[MIN_SCALE, MAX_SCALE]`. NaN maps to 1.0.
pub fn clamp_scale(scale: f64) -> f64 {
    if scale.is_nan() {
        return MIN_SCALE;
    }
    scale.clamp(MIN_SCALE, MAX_SCALE)
}

fn remap_axis(
    before0: f64,
    before_len: f64,
    after0: f64,
    after_len: f64,
    abs: f64,
    screen: f64,
) -> f64 {
    let rel = if before_len > 0.0 {
        ((abs - before0) / before_len).clamp(0.0, 1.0)
    } else {
        0.5
    };
    let anchor_after = after0 + rel * after_len;
    let offset = anchor_after - screen;
    if after_len > 0.0 {
        ((offset - after0) / after_len).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Scroll fractions that keep `anchor_abs` under `anchor_screen` after the
/// content moves from `before` to `after`.
pub fn remap_viewport(
    before: BBox,
    after: BBox,
    anchor_abs: Point,
    anchor_screen: Point,
) -> (f64, f64) {
    let fx = remap_axis(
        before.x0,
        before.width(),
        after.x0,
        after.width(),
        anchor_abs.x,
        anchor_screen.x,
    );
    let fy = remap_axis(
        before.y0,
        before.height(),
        after.y0,
        after.height(),
        anchor_abs.y,
        anchor_screen.y,
    );
    (fx, fy)
}

/// A scrollable view onto an image rendered at a zoom scale.
///
/// At scale 1.0 the image fits the viewport; larger scales enlarge it. The
/// content is centered on any axis where it is smaller than the viewport.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    view_w: f64,
    view_h: f64,
    image_w: f64,
    image_h: f64,
    scale: f64,
    /// Scroll fractions of the content extent
    scroll: (f64, f64),
}

impl Viewport {
    pub fn new(view_w: u32, view_h: u32, image_w: u32, image_h: u32) -> Self {
        Self {
            view_w: view_w.max(1) as f64,
            view_h: view_h.max(1) as f64,
            image_w: image_w.max(1) as f64,
            image_h: image_h.max(1) as f64,
            scale: MIN_SCALE,
            scroll: (0.0, 0.0),
        }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn scroll(&self) -> (f64, f64) {
        self.scroll
    }

    /// Replace the displayed image, keeping zoom and scroll.
    pub fn set_image_size(&mut self, image_w: u32, image_h: u32) {
        self.image_w = image_w.max(1) as f64;
        self.image_h = image_h.max(1) as f64;
    }

    /// Content box for `scale` in canvas coordinates.
    pub fn content_bbox(&self, scale: f64) -> BBox {
        let fit = (self.view_w / self.image_w).min(self.view_h / self.image_h);
        let w = self.image_w * fit * scale;
        let h = self.image_h * fit * scale;
        let x0 = ((self.view_w - w) / 2.0).max(0.0);
        let y0 = ((self.view_h - h) / 2.0).max(0.0);
        BBox::new(x0, y0, x0 + w, y0 + h)
    }

    /// Top-left of the visible window in canvas coordinates.
    fn view_origin(&self, bbox: &BBox) -> Point {
        Point::new(
            bbox.x0 + self.scroll.0 * bbox.width(),
            bbox.y0 + self.scroll.1 * bbox.height(),
        )
    }

    /// Zoom to `scale`, keeping the point under `anchor_screen` fixed.
    /// `None` anchors at the viewport center.
    pub fn zoom_to(&mut self, scale: f64, anchor_screen: Option<Point>) -> (f64, f64) {
        let new_scale = clamp_scale(scale);
        let anchor_screen =
            anchor_screen.unwrap_or_else(|| Point::new(self.view_w / 2.0, self.view_h / 2.0));

        let before = self.content_bbox(self.scale);
        let after = self.content_bbox(new_scale);
        let origin = self.view_origin(&before);
        let state = ViewportState {
            scale: new_scale,
            content_bbox_before: before,
            content_bbox_after: after,
            anchor_abs: Point::new(origin.x + anchor_screen.x, origin.y + anchor_screen.y),
            anchor_screen,
        };

        self.scale = new_scale;
        self.scroll = state.remap();
        tracing::debug!(scale = new_scale, scroll = ?self.scroll, "Zoom changed");
        self.scroll
    }

    pub fn zoom_in(&mut self, anchor_screen: Option<Point>) -> (f64, f64) {
        self.zoom_to(self.scale * ZOOM_STEP, anchor_screen)
    }

    pub fn zoom_out(&mut self, anchor_screen: Option<Point>) -> (f64, f64) {
        self.zoom_to(self.scale / ZOOM_STEP, anchor_screen)
    }

    /// Drag-scroll by a screen-space delta. Axes where the content fits the
    /// viewport do not move.
    pub fn pan(&mut self, dx: f64, dy: f64) -> (f64, f64) {
        let bbox = self.content_bbox(self.scale);
        if bbox.width() > self.view_w {
            let max = 1.0 - self.view_w / bbox.width();
            self.scroll.0 = (self.scroll.0 - dx / bbox.width()).clamp(0.0, max);
        }
        if bbox.height() > self.view_h {
            let max = 1.0 - self.view_h / bbox.height();
            self.scroll.1 = (self.scroll.1 - dy / bbox.height()).clamp(0.0, max);
        }
        self.scroll
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_clamp_scale() {
        assert_eq!(clamp_scale(0.5), 1.0);
        assert_eq!(clamp_scale(2.5), 2.5);
        assert_eq!(clamp_scale(9.0), 4.0);
        assert_eq!(clamp_scale(f64::NAN), 1.0);
    }

    #[test]
    fn test_remap_center_anchor() {
        let (fx, fy) = remap_viewport(
            BBox::new(0.0, 0.0, 100.0, 100.0),
            BBox::new(0.0, 0.0, 200.0, 200.0),
            Point::new(50.0, 50.0),
            Point::new(25.0, 25.0),
        );
        assert!(approx(fx, 0.375), "fx = {fx}");
        assert!(approx(fy, 0.375), "fy = {fy}");
    }

    #[test]
    fn test_remap_clamps_fraction() {
        // anchor at the top-left corner cannot scroll before the content
        let (fx, fy) = remap_viewport(
            BBox::new(0.0, 0.0, 100.0, 100.0),
            BBox::new(0.0, 0.0, 200.0, 200.0),
            Point::new(0.0, 0.0),
            Point::new(40.0, 40.0),
        );
        assert_eq!((fx, fy), (0.0, 0.0));

        // anchor outside the content is clamped to its edge
        let (fx, _) = remap_viewport(
            BBox::new(0.0, 0.0, 100.0, 100.0),
            BBox::new(0.0, 0.0, 400.0, 400.0),
            Point::new(500.0, 0.0),
            Point::new(0.0, 0.0),
        );
        assert_eq!(fx, 1.0);
    }

    #[test]
    fn test_remap_with_offset_origin() {
        let (fx, _) = remap_viewport(
            BBox::new(50.0, 0.0, 150.0, 100.0),
            BBox::new(0.0, 0.0, 200.0, 100.0),
            Point::new(100.0, 50.0),
            Point::new(50.0, 50.0),
        );
        // anchor at rel 0.5 lands at 100, so the window starts at 50
        assert!(approx(fx, 0.25), "fx = {fx}");
    }

    #[test]
    fn test_viewport_fit_and_center() {
        let vp = Viewport::new(200, 100, 100, 100);
        let bbox = vp.content_bbox(1.0);
        assert_eq!(bbox, BBox::new(50.0, 0.0, 150.0, 100.0));

        let bbox = vp.content_bbox(4.0);
        assert_eq!(bbox, BBox::new(0.0, 0.0, 400.0, 400.0));
    }

    #[test]
    fn test_zoom_scale_bounds() {
        let mut vp = Viewport::new(100, 100, 100, 100);
        vp.zoom_out(None);
        assert_eq!(vp.scale(), 1.0);
        for _ in 0..20 {
            vp.zoom_in(None);
        }
        assert_eq!(vp.scale(), 4.0);
    }

    #[test]
    fn test_zoom_keeps_center_fixed() {
        let mut vp = Viewport::new(100, 100, 100, 100);
        let (fx, fy) = vp.zoom_to(2.0, None);
        // center (50,50) maps to (100,100) of 200; window starts at 50
        assert!(approx(fx, 0.25) && approx(fy, 0.25), "{fx} {fy}");
    }

    #[test]
    fn test_pan_inert_when_content_fits() {
        let mut vp = Viewport::new(100, 100, 100, 100);
        assert_eq!(vp.pan(30.0, 30.0), (0.0, 0.0));

        vp.zoom_to(2.0, Some(Point::new(0.0, 0.0)));
        let (fx, fy) = vp.pan(-50.0, 0.0);
        assert!(approx(fx, 0.25), "fx = {fx}");
        assert_eq!(fy, 0.0);

        // cannot scroll past the end
        let (fx, _) = vp.pan(-1000.0, 0.0);
        assert!(approx(fx, 0.5), "fx = {fx}");
    }
}
