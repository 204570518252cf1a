//! Straight-alpha RGBA colours and `#rrggbb` parsing.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// An 8-bit-per-channel colour with straight (non-premultiplied) alpha.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);

    // Palette shared by the glyph and status generators.
    pub const ZINC_900: Rgba = Rgba::rgb(0x18, 0x18, 0x1b);
    pub const ZINC_600: Rgba = Rgba::rgb(0x52, 0x52, 0x5b);
    pub const ZINC_400: Rgba = Rgba::rgb(0xa1, 0xa1, 0xaa);
    pub const ZINC_300: Rgba = Rgba::rgb(0xd4, 0xd4, 0xd8);
    pub const ZINC_200: Rgba = Rgba::rgb(0xe4, 0xe4, 0xe7);
    pub const SKY_500: Rgba = Rgba::rgb(0x0e, 0xa5, 0xe9);
    pub const BLUE_500: Rgba = Rgba::rgb(0x3b, 0x82, 0xf6);
    pub const VIOLET_500: Rgba = Rgba::rgb(0x8b, 0x5c, 0xf6);
    pub const EMERALD_500: Rgba = Rgba::rgb(0x10, 0xb9, 0x81);
    pub const AMBER_500: Rgba = Rgba::rgb(0xf5, 0x9e, 0x0b);
    pub const RED_500: Rgba = Rgba::rgb(0xef, 0x44, 0x44);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Returns the same colour with its alpha multiplied by `alpha` (clamped to `[0, 1]`).
    pub fn with_alpha(self, alpha: f32) -> Self {
        let a = (self.a as f32 * alpha.clamp(0.0, 1.0)).round() as u8;
        Self { a, ..self }
    }

    /// Linear blend towards `other`; `t` is clamped to `[0, 1]`.
    pub fn mix(self, other: Rgba, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let ch = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Self {
            r: ch(self.r, other.r),
            g: ch(self.g, other.g),
            b: ch(self.b, other.b),
            a: ch(self.a, other.a),
        }
    }

    /// Parses `s` or falls back to `fallback`, logging the rejected value.
    pub fn parse_or(s: &str, fallback: Rgba) -> Self {
        s.parse().unwrap_or_else(|e| {
            log::warn!("{e}; using {fallback}");
            fallback
        })
    }
}

impl FromStr for Rgba {
    type Err = Error;

    /// Accepts `#rrggbb` and `#rrggbbaa` (the leading `#` is optional).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().trim_start_matches('#');
        let invalid = || Error::InvalidColor(s.to_string());

        if !(hex.len() == 6 || hex.len() == 8) || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());

        let a = if hex.len() == 8 { byte(6)? } else { 255 };
        Ok(Rgba::new(byte(0)?, byte(2)?, byte(4)?, a))
    }
}

impl TryFrom<String> for Rgba {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgba> for String {
    fn from(c: Rgba) -> Self {
        c.to_string()
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}
