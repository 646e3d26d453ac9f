//! 8-bit RGB color with hex parsing.

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

/// An 8-bit-per-channel RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    /// Create a color from its channel values.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Create a color from an `[r, g, b]` array.
    #[inline]
    pub const fn from_bytes(bytes: [u8; 3]) -> Self {
        Self::new(bytes[0], bytes[1], bytes[2])
    }

    #[inline]
    pub const fn to_bytes(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Squared Euclidean distance in RGB space.
    #[inline]
    pub fn distance_sq(self, other: Rgb) -> u32 {
        let dr = self.r as i32 - other.r as i32;
        let dg = self.g as i32 - other.g as i32;
        let db = self.b as i32 - other.b as i32;
        (dr * dr + dg * dg + db * db) as u32
    }

    /// Lowercase `#rrggbb` representation.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl From<[u8; 3]> for Rgb {
    fn from(bytes: [u8; 3]) -> Self {
        Self::from_bytes(bytes)
    }
}

impl From<Rgb> for [u8; 3] {
    fn from(color: Rgb) -> Self {
        color.to_bytes()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Error type for parsing hex color strings.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseColorError {
    /// Hex string has invalid length (must be 3 or 6 characters after stripping '#')
    InvalidLength,
    /// Invalid hexadecimal character encountered
    InvalidHex(ParseIntError),
}

impl From<ParseIntError> for ParseColorError {
    fn from(err: ParseIntError) -> Self {
        ParseColorError::InvalidHex(err)
    }
}

impl fmt::Display for ParseColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseColorError::InvalidLength => {
                write!(f, "invalid hex color length (expected 3 or 6 characters)")
            }
            ParseColorError::InvalidHex(err) => {
                write!(f, "invalid hex character: {}", err)
            }
        }
    }
}

impl std::error::Error for ParseColorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseColorError::InvalidHex(err) => Some(err),
            _ => None,
        }
    }
}

impl FromStr for Rgb {
    type Err = ParseColorError;

    /// Parse `#RRGGBB`, `RRGGBB`, `#RGB` or `RGB` (case-insensitive,
    /// surrounding whitespace ignored).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let s = s.strip_prefix('#').unwrap_or(s);
        if !s.is_ascii() {
            return Err(ParseColorError::InvalidLength);
        }

        match s.len() {
            3 => {
                // 0xF -> 0xFF
                let r = u8::from_str_radix(&s[0..1], 16)? * 17;
                let g = u8::from_str_radix(&s[1..2], 16)? * 17;
                let b = u8::from_str_radix(&s[2..3], 16)? * 17;
                Ok(Self::new(r, g, b))
            }
            6 => {
                let r = u8::from_str_radix(&s[0..2], 16)?;
                let g = u8::from_str_radix(&s[2..4], 16)?;
                let b = u8::from_str_radix(&s[4..6], 16)?;
                Ok(Self::new(r, g, b))
            }
            _ => Err(ParseColorError::InvalidLength),
        }
    }
}
