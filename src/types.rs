//! Shared boundary types for the pattern editor.
//!
//! This module defines the primitives every subsystem agrees on:
//! - `CellValue`: what a single grid position stores
//! - `Rgb`: a `#RRGGBB` colour, the only colour form the editor knows
//! - the numeric bounds and the clamp helpers that enforce them

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Value stored per grid position: `0` is background, `1..=N` index the
/// pattern colours (1-based).
pub type CellValue = u8;

pub const MIN_GRID_SIZE: usize = 2;
pub const MAX_GRID_SIZE: usize = 100;
pub const DEFAULT_GRID_SIZE: usize = 16;

pub const MAX_PATTERN_COLORS: usize = 20;
pub const MAX_HISTORY_STATES: usize = 50;

pub const MIN_ASPECT_RATIO: f64 = 0.1;
pub const MAX_ASPECT_RATIO: f64 = 10.0;
pub const DEFAULT_ASPECT_RATIO: f64 = 1.0;

pub const MIN_PREVIEW_REPEAT: u32 = 1;
pub const MAX_PREVIEW_REPEAT: u32 = 10;
pub const DEFAULT_PREVIEW_REPEAT: u32 = 3;

// ---------------------------------------------------------------------------
// Clamping
// ---------------------------------------------------------------------------

pub fn clamp_grid_size(size: i64) -> usize {
    size.clamp(MIN_GRID_SIZE as i64, MAX_GRID_SIZE as i64) as usize
}

/// Non-finite ratios fall back to square cells.
pub fn clamp_aspect_ratio(ratio: f64) -> f64 {
    if !ratio.is_finite() {
        return DEFAULT_ASPECT_RATIO;
    }
    ratio.clamp(MIN_ASPECT_RATIO, MAX_ASPECT_RATIO)
}

pub fn clamp_preview_repeat(repeat: i64) -> u32 {
    repeat.clamp(MIN_PREVIEW_REPEAT as i64, MAX_PREVIEW_REPEAT as i64) as u32
}

// ---------------------------------------------------------------------------
// Colour
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(0xff, 0xff, 0xff);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }

    /// Relative brightness in `0.0..=1.0`, used to pick a readable marker colour.
    pub fn luminance(&self) -> f64 {
        (0.299 * self.r as f64 + 0.587 * self.g as f64 + 0.114 * self.b as f64) / 255.0
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidColor(s.to_string());
        let hex = s.trim().strip_prefix('#').ok_or_else(invalid)?;
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        Ok(Rgb::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl Serialize for Rgb {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        use serde::de::{Error, Visitor};

        struct RgbVisitor;

        impl Visitor<'_> for RgbVisitor {
            type Value = Rgb;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a #RRGGBB colour string")
            }

            fn visit_str<E: Error>(self, v: &str) -> Result<Rgb, E> {
                v.parse().map_err(E::custom)
            }
        }

        d.deserialize_str(RgbVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_formats_hex() {
        let c: Rgb = "#ff8000".parse().unwrap();
        assert_eq!(c, Rgb::new(255, 128, 0));
        assert_eq!(c.to_string(), "#FF8000");
    }

    #[test]
    fn rejects_malformed_hex() {
        for bad in ["ff8000", "#ff80", "#gg0000", "#ff80000", ""] {
            assert!(bad.parse::<Rgb>().is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn serde_uses_hex_strings() {
        let json = serde_json::to_string(&Rgb::new(1, 2, 3)).unwrap();
        assert_eq!(json, "\"#010203\"");
        let back: Rgb = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Rgb::new(1, 2, 3));
    }

    #[test]
    fn clamps_bounded_numbers() {
        assert_eq!(clamp_grid_size(1), MIN_GRID_SIZE);
        assert_eq!(clamp_grid_size(500), MAX_GRID_SIZE);
        assert_eq!(clamp_aspect_ratio(f64::NAN), 1.0);
        assert_eq!(clamp_aspect_ratio(0.0), MIN_ASPECT_RATIO);
        assert_eq!(clamp_preview_repeat(0), 1);
        assert_eq!(clamp_preview_repeat(11), 10);
    }
}
