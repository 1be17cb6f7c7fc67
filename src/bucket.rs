//! Magnitude-to-color bucketing shared by markers and the legend.

use serde::Serialize;

/// Fill color assigned to a magnitude range.
///
/// Ranges are half-open on the left: `(5, ∞)` is red, `(4, 5]` orange, down
/// to `(-∞, 0]` which is white.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ColorBucket {
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    Purple,
    White,
}

impl ColorBucket {
    /// Bucket a magnitude. Total over `f64`; NaN lands in `White`.
    #[must_use]
    pub fn for_magnitude(magnitude: f64) -> Self {
        match magnitude {
            m if m > 5.0 => Self::Red,
            m if m > 4.0 => Self::Orange,
            m if m > 3.0 => Self::Yellow,
            m if m > 2.0 => Self::Green,
            m if m > 1.0 => Self::Blue,
            m if m > 0.0 => Self::Purple,
            _ => Self::White,
        }
    }

    /// CSS color name, as used in marker styles and legend swatches.
    #[must_use]
    pub const fn as_css(self) -> &'static str {
        match self {
            Self::Red => "Red",
            Self::Orange => "Orange",
            Self::Yellow => "Yellow",
            Self::Green => "Green",
            Self::Blue => "Blue",
            Self::Purple => "Purple",
            Self::White => "White",
        }
    }

    /// ANSI foreground escape for terminal listings.
    #[must_use]
    pub const fn ansi(self) -> &'static str {
        match self {
            Self::Red => "\x1b[91m",
            Self::Orange => "\x1b[38;5;208m",
            Self::Yellow => "\x1b[93m",
            Self::Green => "\x1b[92m",
            Self::Blue => "\x1b[94m",
            Self::Purple => "\x1b[95m",
            Self::White => "\x1b[97m",
        }
    }
}
