//! Median-cut palette extraction.
//!
//! The color cube occupied by an image is recursively split along its widest
//! channel at the population-weighted median until the requested number of
//! boxes exists. Each box contributes the weighted mean of its colors.

use std::collections::{HashMap, HashSet};

use super::{Palette, PaletteError, MAX_PALETTE_SIZE};
use crate::color::Rgb;

/// A box of distinct colors with their pixel counts.
struct ColorBox {
    entries: Vec<(Rgb, u32)>,
}

impl ColorBox {
    fn population(&self) -> u64 {
        self.entries.iter().map(|&(_, n)| n as u64).sum()
    }

    /// Widest channel (0 = r, 1 = g, 2 = b) and its extent.
    fn widest_channel(&self) -> (usize, u8) {
        let mut min = [u8::MAX; 3];
        let mut max = [u8::MIN; 3];
        for (color, _) in &self.entries {
            for (ch, v) in color.to_bytes().into_iter().enumerate() {
                min[ch] = min[ch].min(v);
                max[ch] = max[ch].max(v);
            }
        }
        (0..3)
            .map(|ch| (ch, max[ch] - min[ch]))
            .fold((0, 0), |best, cur| if cur.1 > best.1 { cur } else { best })
    }

    fn can_split(&self) -> bool {
        self.entries.len() > 1
    }

    /// Split at the weighted median of the widest channel. Both halves are
    /// non-empty.
    fn split(mut self) -> (ColorBox, ColorBox) {
        let (channel, _) = self.widest_channel();
        self.entries
            .sort_by_key(|&(color, _)| (color.to_bytes()[channel], color));

        let half = self.population().div_ceil(2);
        let mut running = 0u64;
        let mut cut = self.entries.len() - 1;
        for (i, &(_, n)) in self.entries.iter().enumerate() {
            running += n as u64;
            if running >= half {
                cut = i + 1;
                break;
            }
        }
        let cut = cut.clamp(1, self.entries.len() - 1);

        let upper = self.entries.split_off(cut);
        (self, ColorBox { entries: upper })
    }

    fn average(&self) -> Rgb {
        let total = self.population().max(1);
        let mut sums = [0u64; 3];
        for &(color, n) in &self.entries {
            for (ch, v) in color.to_bytes().into_iter().enumerate() {
                sums[ch] += v as u64 * n as u64;
            }
        }
        let mean = |s: u64| ((s + total / 2) / total).min(255) as u8;
        Rgb::new(mean(sums[0]), mean(sums[1]), mean(sums[2]))
    }
}

/// Build a palette of at most `max_colors` entries for `pixels`.
///
/// When the image already uses no more than `max_colors` distinct colors,
/// those colors are returned exactly (most frequent first).
///
/// # Errors
///
/// Returns [`PaletteError::EmptyPalette`] when `pixels` is empty or
/// `max_colors` is zero.
///
/// # Example
///
/// ```
/// use pixel_palette::{median_cut, Rgb};
///
/// let pixels = [Rgb::BLACK, Rgb::BLACK, Rgb::WHITE, Rgb::new(250, 250, 250)];
/// let palette = median_cut(&pixels, 2).unwrap();
/// assert_eq!(palette.len(), 2);
/// ```
pub fn median_cut(pixels: &[Rgb], max_colors: usize) -> Result<Palette, PaletteError> {
    let max_colors = max_colors.min(MAX_PALETTE_SIZE);
    if pixels.is_empty() || max_colors == 0 {
        return Err(PaletteError::EmptyPalette);
    }

    let mut histogram: HashMap<Rgb, u32> = HashMap::new();
    for &p in pixels {
        *histogram.entry(p).or_insert(0) += 1;
    }
    let mut entries: Vec<(Rgb, u32)> = histogram.into_iter().collect();

    if entries.len() <= max_colors {
        entries.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        return Ok(Palette {
            colors: entries.into_iter().map(|(c, _)| c).collect(),
        });
    }

    entries.sort_by_key(|&(c, _)| c);
    let mut boxes = vec![ColorBox { entries }];

    while boxes.len() < max_colors {
        let candidate = boxes
            .iter()
            .enumerate()
            .filter(|(_, b)| b.can_split())
            .max_by_key(|(_, b)| (b.widest_channel().1, b.population()))
            .map(|(i, _)| i);

        let Some(idx) = candidate else {
            break;
        };
        let (lower, upper) = boxes.swap_remove(idx).split();
        boxes.push(lower);
        boxes.push(upper);
    }

    // Boxes split between equal channel values can overlap, so averages may
    // collide.
    let mut seen = HashSet::new();
    let colors: Vec<Rgb> = boxes
        .iter()
        .map(ColorBox::average)
        .filter(|c| seen.insert(*c))
        .collect();

    Ok(Palette { colors })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(n: usize) -> Vec<Rgb> {
        (0..n)
            .map(|i| {
                let v = (i * 255 / (n - 1)) as u8;
                Rgb::new(v, 255 - v, v / 2)
            })
            .collect()
    }

    #[test]
    fn test_few_colors_returned_exactly() {
        let pixels = [Rgb::WHITE, Rgb::BLACK, Rgb::WHITE];
        let palette = median_cut(&pixels, 16).unwrap();
        assert_eq!(palette.colors(), &[Rgb::WHITE, Rgb::BLACK]);
    }

    #[test]
    fn test_limits_color_count() {
        let pixels = gradient(1000);
        for n in [4, 16, 32, 64] {
            let palette = median_cut(&pixels, n).unwrap();
            assert!(palette.len() <= n, "got {} colors for n={n}", palette.len());
            assert!(palette.len() >= n / 2, "too few colors for n={n}");
        }
    }

    #[test]
    fn test_two_clusters_split_apart() {
        let mut pixels = vec![Rgb::new(10, 10, 10); 50];
        pixels.extend(vec![Rgb::new(12, 12, 12); 50]);
        pixels.extend(vec![Rgb::new(240, 240, 240); 50]);
        pixels.extend(vec![Rgb::new(244, 244, 244); 50]);
        let palette = median_cut(&pixels, 2).unwrap();
        assert_eq!(palette.len(), 2);
        let dark = palette.color(palette.find_nearest(Rgb::BLACK));
        let light = palette.color(palette.find_nearest(Rgb::WHITE));
        assert_eq!(dark, Rgb::new(11, 11, 11));
        assert_eq!(light, Rgb::new(242, 242, 242));
    }

    #[test]
    fn test_palette_colors_are_distinct() {
        let pixels = gradient(777);
        let palette = median_cut(&pixels, 64).unwrap();
        assert!(Palette::new(palette.colors()).is_ok());
    }

    #[test]
    fn test_empty_input_rejected() {
        assert_eq!(median_cut(&[], 16), Err(PaletteError::EmptyPalette));
        assert_eq!(
            median_cut(&[Rgb::BLACK], 0),
            Err(PaletteError::EmptyPalette)
        );
    }

    #[test]
    fn test_max_colors_capped_at_256() {
        let pixels: Vec<Rgb> = (0..4096u32)
            .map(|i| Rgb::new((i % 256) as u8, (i / 16) as u8, (i % 7) as u8))
            .collect();
        let palette = median_cut(&pixels, 1000).unwrap();
        assert!(palette.len() <= 256);
    }
}
