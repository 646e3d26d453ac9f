//! Error types for palette operations

use std::fmt;

use crate::color::ParseColorError;

/// Error type for palette validation.
///
/// Returned when palette configuration is invalid, such as empty palettes,
/// duplicate colors, or more entries than an index byte can address.
#[derive(Debug, Clone, PartialEq)]
pub enum PaletteError {
    /// No colors provided in palette
    EmptyPalette,
    /// More than 256 colors provided
    TooManyColors {
        /// Number of colors that were provided
        count: usize,
    },
    /// Duplicate color found at the specified index
    DuplicateColor {
        /// Index where the duplicate was found
        index: usize,
    },
    /// Invalid hex color string
    ParseColor(ParseColorError),
}

impl From<ParseColorError> for PaletteError {
    fn from(err: ParseColorError) -> Self {
        PaletteError::ParseColor(err)
    }
}

impl fmt::Display for PaletteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaletteError::EmptyPalette => {
                write!(f, "palette cannot be empty")
            }
            PaletteError::TooManyColors { count } => {
                write!(f, "palette has {} colors (max 256)", count)
            }
            PaletteError::DuplicateColor { index } => {
                write!(f, "duplicate color found at index {}", index)
            }
            PaletteError::ParseColor(err) => {
                write!(f, "invalid color: {}", err)
            }
        }
    }
}

impl std::error::Error for PaletteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PaletteError::ParseColor(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(
            PaletteError::EmptyPalette.to_string(),
            "palette cannot be empty"
        );
        assert_eq!(
            PaletteError::TooManyColors { count: 300 }.to_string(),
            "palette has 300 colors (max 256)"
        );
        assert_eq!(
            PaletteError::DuplicateColor { index: 3 }.to_string(),
            "duplicate color found at index 3"
        );
    }

    #[test]
    fn test_parse_error_has_source() {
        use std::error::Error;
        let err = PaletteError::from(ParseColorError::InvalidLength);
        assert!(err.source().is_some());
    }
}
