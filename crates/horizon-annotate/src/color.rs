//! Deterministic label colors.
//!
//! A label that was not given an explicit background gets one derived from
//! its value: the seed is hashed with BLAKE3 and the digest picks a point in
//! HSV space. Equal seeds always give equal colors, distinct seeds spread
//! across the hue circle.

use std::fmt;
use std::str::FromStr;

/// An opaque 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// Create a color from 8-bit RGB components.
    #[inline]
    pub const fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Create a color from floating point RGB components in `0.0..=1.0`.
    pub fn from_rgb_f32(r: f32, g: f32, b: f32) -> Self {
        let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self::from_rgb8(channel(r), channel(g), channel(b))
    }

    /// Parse a `#rrggbb` (or `rrggbb`) hex string.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(Self::from_rgb8(r, g, b))
    }

    /// Format as a lowercase `#rrggbb` string.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s).ok_or(())
    }
}

/// Convert HSV to RGB.
///
/// `h` is in degrees (0-360), `s` and `v` in `0.0..=1.0`. Returns RGB in
/// `0.0..=1.0`.
pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> (f32, f32, f32) {
    let c = v * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = v - c;

    let (r, g, b) = if h < 60.0 {
        (c, x, 0.0)
    } else if h < 120.0 {
        (x, c, 0.0)
    } else if h < 180.0 {
        (0.0, c, x)
    } else if h < 240.0 {
        (0.0, x, c)
    } else if h < 300.0 {
        (x, 0.0, c)
    } else {
        (c, 0.0, x)
    };

    (r + m, g + m, b + m)
}

const SATURATION_RANGE: (f32, f32) = (0.45, 0.80);
const VALUE_RANGE: (f32, f32) = (0.70, 0.92);

/// Derive a color from a seed string.
///
/// Pure and deterministic. The empty seed is an ordinary seed and also
/// yields a fixed color.
pub fn color_for(seed: &str) -> Color {
    let digest = blake3::hash(seed.as_bytes());
    let bytes = digest.as_bytes();

    let hue = f32::from(u16::from_le_bytes([bytes[0], bytes[1]]) % 360);
    let scale = |byte: u8, (lo, hi): (f32, f32)| lo + (hi - lo) * f32::from(byte) / 255.0;
    let saturation = scale(bytes[2], SATURATION_RANGE);
    let value = scale(bytes[3], VALUE_RANGE);

    let (r, g, b) = hsv_to_rgb(hue, saturation, value);
    Color::from_rgb_f32(r, g, b)
}

/// Background color state of a label.
///
/// `Unset` only ever moves to `Derived` (once) or `Explicit`; a derived or
/// explicit background is never recomputed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Background {
    /// No color chosen yet.
    #[default]
    Unset,
    /// Derived from the label's value with [`color_for`].
    Derived(Color),
    /// Given by the labeling config or set programmatically, as a CSS color.
    Explicit(String),
}

impl Background {
    /// Whether no color has been chosen yet.
    pub fn is_unset(&self) -> bool {
        matches!(self, Self::Unset)
    }

    /// CSS representation of the color, if any.
    pub fn css(&self) -> Option<String> {
        match self {
            Self::Unset => None,
            Self::Derived(color) => Some(color.to_hex()),
            Self::Explicit(css) => Some(css.clone()),
        }
    }
}
