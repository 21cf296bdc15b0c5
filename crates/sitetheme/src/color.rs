//! Hex, RGB and HSL color values and the contrast math built on them.
//!
//! Only the operations the resolver needs live here:
//! - [`HexColor`] - validated `#rrggbb` string
//! - [`Rgb`] / [`Hsl`] - channel representations and conversions
//! - [`CssColor`] - a derived color in the textual form it is emitted in
//! - [`relative_luminance`], [`contrast_ratio`], [`scale_brightness`],
//!   [`ensure_contrast_ratio`]
//!
//! # Example
//!
//! ```rust
//! use sitetheme::color::{contrast_ratio, HexColor, Rgb};
//!
//! let klein = HexColor::parse("#002fa7").unwrap();
//! let ratio = contrast_ratio(klein.rgb(), Rgb::WHITE);
//! assert!(ratio > 4.5);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;
use tracing::trace;

/// Color returned by [`ensure_contrast_ratio`] when no darkening step is enough
/// against a white background.
pub const SAFE_DARK: HexColor = HexColor::from_u32(0x1a365d);

/// Error produced when a string is not a `#rrggbb` color.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorError {
    #[error("invalid hex color '{0}'")]
    InvalidHex(String),
    #[error("invalid hex color '{value}' for field '{field}'")]
    InvalidField { field: &'static str, value: String },
}

impl ColorError {
    /// Name of the palette field this error refers to, if any.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::InvalidHex(_) => None,
            Self::InvalidField { field, .. } => Some(field),
        }
    }
}

/// An sRGB color with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Convert to HSL with hue in `[0, 1)`.
    pub fn to_hsl(self) -> Hsl {
        rgb_to_hsl(self)
    }

    /// Render as `#rrggbb`.
    pub fn to_hex(self) -> HexColor {
        HexColor::from_rgb(self)
    }
}

impl From<(u8, u8, u8)> for Rgb {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self { r, g, b }
    }
}

/// CSS functional notation, matching what brightness scaling emits.
impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

/// A color in HSL space. All components are normalized to `[0, 1]`; the hue is
/// degrees divided by 360.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

impl Hsl {
    pub const fn new(h: f64, s: f64, l: f64) -> Self {
        Self { h, s, l }
    }

    /// Convert back to 8-bit RGB (channels rounded).
    pub fn to_rgb(self) -> Rgb {
        hsl_to_rgb(self)
    }
}

/// A `#rrggbb` color. Always six hex digits, stored lowercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HexColor(Rgb);

impl HexColor {
    pub const WHITE: HexColor = HexColor(Rgb::WHITE);
    pub const BLACK: HexColor = HexColor(Rgb::BLACK);

    pub const fn from_rgb(rgb: Rgb) -> Self {
        Self(rgb)
    }

    /// Build from a packed `0xRRGGBB` literal.
    pub const fn from_u32(hex: u32) -> Self {
        Self(Rgb::new(
            ((hex >> 16) & 0xff) as u8,
            ((hex >> 8) & 0xff) as u8,
            (hex & 0xff) as u8,
        ))
    }

    /// Parse a `#rrggbb` string. Surrounding whitespace is ignored; case is not
    /// significant.
    ///
    /// # Errors
    /// Returns [`ColorError::InvalidHex`] for anything but `#` plus six hex digits.
    pub fn parse(s: &str) -> Result<Self, ColorError> {
        hex_to_rgb(s).map(Self)
    }

    /// Parse a palette field, naming the field in the error.
    ///
    /// # Errors
    /// Returns [`ColorError::InvalidField`] when `value` is not `#rrggbb`.
    pub fn parse_field(field: &'static str, value: &str) -> Result<Self, ColorError> {
        Self::parse(value).map_err(|_| ColorError::InvalidField {
            field,
            value: value.to_string(),
        })
    }

    pub const fn rgb(self) -> Rgb {
        self.0
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Rgb { r, g, b } = self.0;
        write!(f, "#{r:02x}{g:02x}{b:02x}")
    }
}

impl FromStr for HexColor {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<Rgb> for HexColor {
    fn from(rgb: Rgb) -> Self {
        Self(rgb)
    }
}

impl Serialize for HexColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for HexColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_str(HexColorVisitor)
    }
}

struct HexColorVisitor;

impl Visitor<'_> for HexColorVisitor {
    type Value = HexColor;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a #rrggbb hex color string")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        HexColor::parse(v).map_err(E::custom)
    }
}

/// A derived color, kept in the notation it is emitted in.
///
/// Table lookups and unchanged inputs stay hex; anything computed through
/// brightness scaling or HSL comes out as `rgb(r, g, b)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CssColor {
    Hex(HexColor),
    Rgb(Rgb),
}

impl CssColor {
    /// Channel values regardless of notation.
    pub fn rgb(self) -> Rgb {
        match self {
            Self::Hex(hex) => hex.rgb(),
            Self::Rgb(rgb) => rgb,
        }
    }
}

impl fmt::Display for CssColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hex(hex) => fmt::Display::fmt(hex, f),
            Self::Rgb(rgb) => fmt::Display::fmt(rgb, f),
        }
    }
}

impl From<HexColor> for CssColor {
    fn from(hex: HexColor) -> Self {
        Self::Hex(hex)
    }
}

impl From<Rgb> for CssColor {
    fn from(rgb: Rgb) -> Self {
        Self::Rgb(rgb)
    }
}

/// Parse `#rrggbb` into channels.
///
/// # Errors
/// Returns [`ColorError::InvalidHex`] if the string is not `#` plus six hex digits.
pub fn hex_to_rgb(s: &str) -> Result<Rgb, ColorError> {
    let raw = s.trim();
    let invalid = || ColorError::InvalidHex(raw.to_string());
    let hex = raw.strip_prefix('#').ok_or_else(invalid)?;
    if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
    Ok(Rgb::new(channel(0)?, channel(2)?, channel(4)?))
}

/// Convert channels to HSL with hue in `[0, 1)`.
#[allow(clippy::many_single_char_names, clippy::float_cmp)]
pub fn rgb_to_hsl(rgb: Rgb) -> Hsl {
    let r = f64::from(rgb.r) / 255.0;
    let g = f64::from(rgb.g) / 255.0;
    let b = f64::from(rgb.b) / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = f64::midpoint(max, min);

    if max == min {
        return Hsl::new(0.0, 0.0, l);
    }

    let d = max - min;
    let s = if l > 0.5 {
        d / (2.0 - max - min)
    } else {
        d / (max + min)
    };

    let h = if max == r {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };

    Hsl::new(h / 6.0, s, l)
}

#[allow(clippy::many_single_char_names, clippy::suboptimal_flops, clippy::float_cmp)]
pub fn hsl_to_rgb(hsl: Hsl) -> Rgb {
    let Hsl { h, s, l } = hsl;
    let to_u8 = |v: f64| (v * 255.0).round().clamp(0.0, 255.0) as u8;

    if s == 0.0 {
        let v = to_u8(l);
        return Rgb::new(v, v, v);
    }

    fn hue_to_rgb(p: f64, q: f64, mut t: f64) -> f64 {
        if t < 0.0 {
            t += 1.0;
        }
        if t > 1.0 {
            t -= 1.0;
        }
        if t < 1.0 / 6.0 {
            return p + (q - p) * 6.0 * t;
        }
        if t < 1.0 / 2.0 {
            return q;
        }
        if t < 2.0 / 3.0 {
            return p + (q - p) * (2.0 / 3.0 - t) * 6.0;
        }
        p
    }

    let q = if l < 0.5 {
        l * (1.0 + s)
    } else {
        l + s - l * s
    };
    let p = 2.0 * l - q;

    Rgb::new(
        to_u8(hue_to_rgb(p, q, h + 1.0 / 3.0)),
        to_u8(hue_to_rgb(p, q, h)),
        to_u8(hue_to_rgb(p, q, h - 1.0 / 3.0)),
    )
}

/// WCAG relative luminance of an sRGB color.
pub fn relative_luminance(rgb: Rgb) -> f64 {
    fn linear(c: u8) -> f64 {
        let c = f64::from(c) / 255.0;
        if c <= 0.039_28 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    }

    0.2126 * linear(rgb.r) + 0.7152 * linear(rgb.g) + 0.0722 * linear(rgb.b)
}

/// WCAG contrast ratio between two colors, in `[1, 21]`.
pub fn contrast_ratio(a: Rgb, b: Rgb) -> f64 {
    let la = relative_luminance(a);
    let lb = relative_luminance(b);
    let lighter = la.max(lb);
    let darker = la.min(lb);
    (lighter + 0.05) / (darker + 0.05)
}

/// WCAG AA for normal text (>= 4.5:1).
pub fn meets_aa(a: Rgb, b: Rgb) -> bool {
    contrast_ratio(a, b) >= 4.5
}

/// WCAG AAA for normal text (>= 7.0:1).
pub fn meets_aaa(a: Rgb, b: Rgb) -> bool {
    contrast_ratio(a, b) >= 7.0
}

/// Multiply every channel by `factor`, rounding and clamping to `0..=255`.
pub fn scale_brightness(rgb: Rgb, factor: f64) -> Rgb {
    let scale = |c: u8| (f64::from(c) * factor).round().clamp(0.0, 255.0) as u8;
    Rgb::new(scale(rgb.r), scale(rgb.g), scale(rgb.b))
}

/// Darken `foreground` until it reaches `min_ratio` against `background`.
///
/// The input is returned untouched when it already passes. Otherwise the
/// channels are scaled by 0.8, 0.7, ... down to 0.3 and the first passing step
/// wins. If none passes, white backgrounds get [`SAFE_DARK`] and anything else
/// gets the unchanged foreground.
pub fn ensure_contrast_ratio(
    foreground: HexColor,
    background: HexColor,
    min_ratio: f64,
) -> CssColor {
    let bg = background.rgb();
    let current = contrast_ratio(foreground.rgb(), bg);
    if current >= min_ratio {
        return CssColor::Hex(foreground);
    }

    for tenths in (3..=8).rev() {
        let factor = f64::from(tenths) / 10.0;
        let adjusted = scale_brightness(foreground.rgb(), factor);
        let ratio = contrast_ratio(adjusted, bg);
        trace!(color.factor = factor, color.ratio = ratio, "Contrast step");
        if ratio >= min_ratio {
            return CssColor::Rgb(adjusted);
        }
    }

    if background == HexColor::WHITE {
        CssColor::Hex(SAFE_DARK)
    } else {
        CssColor::Hex(foreground)
    }
}
