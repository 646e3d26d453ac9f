//! Fixed palettes.

use super::Palette;
use crate::color::Rgb;

/// Distance between adjacent channel levels of the web-safe palette.
pub const WEB_SAFE_STEP: u8 = 51;

/// Four-shade green palette of the original Game Boy, darkest first.
const GAME_BOY: [Rgb; 4] = [
    Rgb::new(15, 56, 15),
    Rgb::new(48, 98, 48),
    Rgb::new(139, 172, 15),
    Rgb::new(155, 188, 15),
];

/// The 216-color web-safe palette (6 levels per channel).
///
/// Ordering is red-major: index `r*36 + g*6 + b` for levels `0..6`.
pub fn web_safe() -> Palette {
    let mut colors = Vec::with_capacity(216);
    for r in 0..6u8 {
        for g in 0..6u8 {
            for b in 0..6u8 {
                colors.push(Rgb::new(
                    r * WEB_SAFE_STEP,
                    g * WEB_SAFE_STEP,
                    b * WEB_SAFE_STEP,
                ));
            }
        }
    }
    Palette { colors }
}

/// The 4-color Game Boy palette.
pub fn game_boy() -> Palette {
    Palette {
        colors: GAME_BOY.to_vec(),
    }
}
