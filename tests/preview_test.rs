//! Preview session and viewport remapping.

mod common;

use common::*;
use gridsmith::models::TransformSettings;
use gridsmith::services::{PreviewSession, Transformer};
use gridsmith::viewport::{remap_viewport, BBox, Point};
use std::sync::Arc;

#[test]
fn test_remap_keeps_anchor_under_cursor() {
    let (fx, fy) = remap_viewport(
        BBox::new(0.0, 0.0, 100.0, 100.0),
        BBox::new(0.0, 0.0, 200.0, 200.0),
        Point::new(50.0, 50.0),
        Point::new(25.0, 25.0),
    );
    assert!((fx - 0.375).abs() < 1e-9, "fx = {fx}");
    assert!((fy - 0.375).abs() < 1e-9, "fy = {fy}");
}

#[test]
fn test_preview_loads_and_renders_file() {
    let dir = scratch_folder();
    let path = write_image(dir.path(), "ref.png", &gradient(60, 40));

    let mut session = PreviewSession::new(
        Arc::new(Transformer::default()),
        TransformSettings {
            pixel_art_enabled: true,
            pixel_art_scale: 5,
            sync_grid_to_pixels: true,
            ..Default::default()
        },
        300,
        200,
    );
    session.load_image(&path).unwrap();

    let rendered = session.rendered().unwrap();
    assert_eq!(rendered.small_size, Some((12, 8)));
    assert_eq!(rendered.grid_rows, 12);
    assert_eq!(rendered.image.dimensions(), (60, 40));
}

#[test]
fn test_preview_missing_file_is_decode_error() {
    let mut session = PreviewSession::new(
        Arc::new(Transformer::default()),
        TransformSettings::default(),
        100,
        100,
    );
    let err = session
        .load_image(std::path::Path::new("/nonexistent/ref.png"))
        .unwrap_err();
    assert!(err.to_string().starts_with("Failed to decode"));
    assert!(session.rendered().is_none());
}

#[test]
fn test_cursor_zoom_and_pan() {
    let mut session = PreviewSession::new(
        Arc::new(Transformer::default()),
        TransformSettings::default(),
        100,
        100,
    );
    session.set_image(solid(100, 100, [0, 0, 0])).unwrap();

    // zooming at the bottom-right corner scrolls as far as possible
    let (fx, fy) = session.zoom_to(2.0, Some(Point::new(100.0, 100.0)));
    assert!((fx - 0.5).abs() < 1e-9 && (fy - 0.5).abs() < 1e-9);

    let (fx, _) = session.pan(25.0, 0.0);
    assert!((fx - 0.375).abs() < 1e-9, "fx = {fx}");
}
