//! Grid overlay.

use image::RgbImage;
use pixel_palette::Rgb;

/// Slack for float error in cell arithmetic, so e.g. `100 / 10.0` lines
/// do not turn into 11.
const EPSILON: f64 = 1e-9;

/// Grid appearance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridStyle {
    /// Divisions along the longer side; 0 disables the grid
    pub rows: u32,
    pub thickness: u32,
    /// Every n-th line (0, 5 or 10) is one pixel thicker; 0 disables
    pub highlight_every: u32,
    pub color: Rgb,
}

/// One grid line along an axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLine {
    pub index: u32,
    pub position: u32,
}

/// Cell edge length for a square-as-possible grid with `rows` divisions.
pub fn cell_size(width: u32, height: u32, rows: u32) -> f64 {
    let rows = rows.max(1) as f64;
    (width as f64 / rows).max(height as f64 / rows)
}

/// Line positions along an axis of length `dim`.
///
/// Lines sit at `floor(i * cell)` for `i < ceil(dim / cell)`, plus a
/// closing line at exactly `dim`, even when it lands close to the previous
/// line.
pub fn grid_lines(dim: u32, cell: f64) -> Vec<GridLine> {
    if cell <= 0.0 || !cell.is_finite() {
        return Vec::new();
    }
    let count = ((dim as f64 / cell) - EPSILON).ceil().max(0.0) as u32;
    let mut lines: Vec<GridLine> = (0..count)
        .map(|i| GridLine {
            index: i,
            position: (i as f64 * cell + EPSILON).floor() as u32,
        })
        .collect();
    lines.push(GridLine {
        index: count,
        position: dim,
    });
    lines
}

/// Pixel range `[start, end)` covered by a line at `position` with
/// `thickness`, shifted so it lies inside `[0, dim)`.
pub fn line_span(position: u32, thickness: u32, dim: u32) -> (u32, u32) {
    let (position, thickness, dim) = (position as i64, thickness as i64, dim as i64);
    let thickness = thickness.min(dim);
    let mut start = position - thickness / 2;
    if start < 0 {
        start = 0;
    }
    if start + thickness > dim {
        start = dim - thickness;
    }
    (start as u32, (start + thickness) as u32)
}

/// Thickness of the line with `index` under `style`.
pub fn line_thickness(style: &GridStyle, index: u32) -> u32 {
    let base = style.thickness.max(1);
    if style.highlight_every > 0 && index % style.highlight_every == 0 {
        base + 1
    } else {
        base
    }
}

/// Draw the grid over a copy of `image`. `rows == 0` returns the copy.
pub fn draw_grid(image: &RgbImage, style: &GridStyle) -> RgbImage {
    let mut out = image.clone();
    if style.rows == 0 {
        return out;
    }

    let (width, height) = out.dimensions();
    let cell = cell_size(width, height, style.rows);
    let color = image::Rgb(style.color.to_bytes());

    let verticals = grid_lines(width, cell);
    let horizontals = grid_lines(height, cell);

    for line in &verticals {
        let (x0, x1) = line_span(line.position, line_thickness(style, line.index), width);
        for x in x0..x1 {
            for y in 0..height {
                out.put_pixel(x, y, color);
            }
        }
    }
    for line in &horizontals {
        let (y0, y1) = line_span(line.position, line_thickness(style, line.index), height);
        for y in y0..y1 {
            for x in 0..width {
                out.put_pixel(x, y, color);
            }
        }
    }

    tracing::debug!(
        width,
        height,
        cell,
        vertical = verticals.len(),
        horizontal = horizontals.len(),
        "Drew grid"
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style(rows: u32) -> GridStyle {
        GridStyle {
            rows,
            thickness: 1,
            highlight_every: 0,
            color: Rgb::new(255, 0, 0),
        }
    }

    #[test]
    fn test_cell_size_uses_longer_side() {
        assert_eq!(cell_size(1000, 2000, 100), 20.0);
        assert_eq!(cell_size(300, 100, 10), 30.0);
    }

    #[test]
    fn test_grid_lines_square() {
        let positions: Vec<u32> = grid_lines(100, 10.0).iter().map(|l| l.position).collect();
        assert_eq!(positions, vec![0, 10, 20, 30, 40, 50, 60, 70, 80, 90, 100]);
    }

    #[test]
    fn test_grid_lines_float_cell() {
        // 100 / 3 is not exact; still 3 cells and a closing line
        let lines = grid_lines(100, 100.0 / 3.0);
        let positions: Vec<u32> = lines.iter().map(|l| l.position).collect();
        assert_eq!(positions, vec![0, 33, 66, 100]);
        assert_eq!(lines.last().map(|l| l.index), Some(3));
    }

    #[test]
    fn test_closing_line_kept_when_close() {
        let positions: Vec<u32> = grid_lines(101, 10.0).iter().map(|l| l.position).collect();
        assert_eq!(positions.len(), 12);
        assert_eq!(&positions[9..], &[90, 100, 101]);
    }

    #[test]
    fn test_line_span_shifted_inside() {
        assert_eq!(line_span(0, 3, 100), (0, 3));
        assert_eq!(line_span(100, 3, 100), (97, 100));
        assert_eq!(line_span(50, 3, 100), (49, 52));
        assert_eq!(line_span(50, 1, 100), (50, 51));
        assert_eq!(line_span(5, 20, 10), (0, 10));
    }

    #[test]
    fn test_highlight_thickness() {
        let s = GridStyle {
            highlight_every: 5,
            thickness: 2,
            ..style(10)
        };
        assert_eq!(line_thickness(&s, 0), 3);
        assert_eq!(line_thickness(&s, 3), 2);
        assert_eq!(line_thickness(&s, 10), 3);
        assert_eq!(line_thickness(&style(10), 0), 1);
    }

    #[test]
    fn test_draw_grid_zero_rows_is_noop() {
        let img = RgbImage::from_pixel(20, 20, image::Rgb([1, 2, 3]));
        assert_eq!(draw_grid(&img, &style(0)), img);
    }

    #[test]
    fn test_draw_grid_covers_edges() {
        let img = RgbImage::from_pixel(40, 40, image::Rgb([255, 255, 255]));
        let out = draw_grid(&img, &style(4));
        let red = image::Rgb([255, 0, 0]);
        for i in 0..40 {
            assert_eq!(out.get_pixel(0, i), &red);
            assert_eq!(out.get_pixel(39, i), &red);
            assert_eq!(out.get_pixel(i, 0), &red);
            assert_eq!(out.get_pixel(i, 39), &red);
            assert_eq!(out.get_pixel(20, i), &red);
        }
        assert_eq!(out.get_pixel(5, 5), &image::Rgb([255, 255, 255]));
    }
}
