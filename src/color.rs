/// Color type, parsing and contrast helpers.
use std::fmt;
use std::str::FromStr;

use rand::RngExt;
use thiserror::Error;

/// An opaque 8-bit-per-channel RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ColorParseError {
    #[error("empty color string")]
    Empty,
    #[error("invalid hex length in {0:?}")]
    InvalidLength(String),
    #[error("invalid hex digits in {0:?}")]
    InvalidHex(String),
    #[error("unknown color {0:?}")]
    Unknown(String),
}

const NAMED: &[(&str, Color)] = &[
    ("black", Color::BLACK),
    ("darkgray", Color::new(0x44, 0x44, 0x44)),
    ("darkgrey", Color::new(0x44, 0x44, 0x44)),
    ("gray", Color::new(0x88, 0x88, 0x88)),
    ("grey", Color::new(0x88, 0x88, 0x88)),
    ("lightgray", Color::new(0xCC, 0xCC, 0xCC)),
    ("lightgrey", Color::new(0xCC, 0xCC, 0xCC)),
    ("white", Color::WHITE),
    ("red", Color::new(0xFF, 0x00, 0x00)),
    ("green", Color::new(0x00, 0xFF, 0x00)),
    ("blue", Color::new(0x00, 0x00, 0xFF)),
    ("yellow", Color::new(0xFF, 0xFF, 0x00)),
    ("cyan", Color::new(0x00, 0xFF, 0xFF)),
    ("magenta", Color::new(0xFF, 0x00, 0xFF)),
    ("aqua", Color::new(0x00, 0xFF, 0xFF)),
    ("fuchsia", Color::new(0xFF, 0x00, 0xFF)),
    ("lime", Color::new(0x00, 0xFF, 0x00)),
    ("maroon", Color::new(0x80, 0x00, 0x00)),
    ("navy", Color::new(0x00, 0x00, 0x80)),
    ("olive", Color::new(0x80, 0x80, 0x00)),
    ("purple", Color::new(0x80, 0x00, 0x80)),
    ("silver", Color::new(0xC0, 0xC0, 0xC0)),
    ("teal", Color::new(0x00, 0x80, 0x80)),
];

impl Color {
    pub const WHITE: Color = Color::new(0xFF, 0xFF, 0xFF);
    pub const BLACK: Color = Color::new(0x00, 0x00, 0x00);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Draw each channel independently and uniformly from 0..=255.
    pub fn random<R: RngExt + ?Sized>(rng: &mut R) -> Self {
        Self::new(
            rng.random_range(0..=u8::MAX),
            rng.random_range(0..=u8::MAX),
            rng.random_range(0..=u8::MAX),
        )
    }

    /// Perceptual luminance in [0, 1] using BT.601 luma weights.
    pub fn luminance(&self) -> f64 {
        let r = f64::from(self.r) / 255.0;
        let g = f64::from(self.g) / 255.0;
        let b = f64::from(self.b) / 255.0;
        0.299 * r + 0.587 * g + 0.114 * b
    }

    /// Black or white, whichever reads better on top of this color.
    pub fn contrast_label(&self) -> Color {
        label_for_luminance(self.luminance())
    }

    /// Canonical `#RRGGBB` form.
    pub fn to_display_string(&self) -> String {
        self.to_string()
    }
}

/// Strictly brighter than half goes black, everything else white.
pub fn label_for_luminance(luminance: f64) -> Color {
    if luminance > 0.5 {
        Color::BLACK
    } else {
        Color::WHITE
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        if value.is_empty() {
            return Err(ColorParseError::Empty);
        }
        let Some(hex) = value.strip_prefix('#') else {
            let lower = value.to_ascii_lowercase();
            return NAMED
                .iter()
                .find(|(name, _)| *name == lower)
                .map(|(_, color)| *color)
                .ok_or_else(|| ColorParseError::Unknown(value.to_string()));
        };
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorParseError::InvalidHex(value.to_string()));
        }
        // #AARRGGBB carries a leading alpha byte we do not keep.
        let rgb = match hex.len() {
            6 => hex,
            8 => &hex[2..],
            _ => return Err(ColorParseError::InvalidLength(value.to_string())),
        };
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&rgb[range], 16)
                .map_err(|_| ColorParseError::InvalidHex(value.to_string()))
        };
        Ok(Color::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

/// Human name for the two label colors, hex for anything else.
pub fn label_name(color: Color) -> String {
    match color {
        Color::BLACK => "black".to_string(),
        Color::WHITE => "white".to_string(),
        other => other.to_string(),
    }
}
