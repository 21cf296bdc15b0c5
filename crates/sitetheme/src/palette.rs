//! Palette definitions and the light/dark mode.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::color::{ColorError, HexColor};

/// Light or dark presentation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Light,
    Dark,
}

impl Mode {
    /// Stable string form, as persisted and written to `data-theme`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// The opposite mode.
    pub fn toggle(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    pub fn is_dark(self) -> bool {
        matches!(self, Self::Dark)
    }

    /// Mode matching an OS-level dark preference.
    pub fn from_prefers_dark(prefers_dark: bool) -> Self {
        if prefers_dark { Self::Dark } else { Self::Light }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error parsing a [`Mode`] string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown mode '{0}', expected 'light' or 'dark'")]
pub struct ParseModeError(pub String);

impl FromStr for Mode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(ParseModeError(other.to_string())),
        }
    }
}

/// The eight configurable colors of a palette, as written in the catalog.
///
/// Values are kept as raw strings; they are checked when the palette is loaded
/// into a catalog or resolved, so that errors can name the field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaletteColors {
    pub primary: String,
    pub primary_hover: String,
    pub primary_light: String,
    pub accent: String,
    pub accent_hover: String,
    pub accent_light: String,
    pub highlight: String,
    pub highlight_border: String,
}

/// Parsed form of [`PaletteColors`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Swatch {
    pub primary: HexColor,
    pub primary_hover: HexColor,
    pub primary_light: HexColor,
    pub accent: HexColor,
    pub accent_hover: HexColor,
    pub accent_light: HexColor,
    pub highlight: HexColor,
    pub highlight_border: HexColor,
}

impl PaletteColors {
    /// Parse every field.
    ///
    /// # Errors
    /// Returns [`ColorError::InvalidField`] for the first field that is not `#rrggbb`.
    pub fn parse(&self) -> Result<Swatch, ColorError> {
        Ok(Swatch {
            primary: HexColor::parse_field("primary", self.primary.as_str())?,
            primary_hover: HexColor::parse_field("primaryHover", self.primary_hover.as_str())?,
            primary_light: HexColor::parse_field("primaryLight", self.primary_light.as_str())?,
            accent: HexColor::parse_field("accent", self.accent.as_str())?,
            accent_hover: HexColor::parse_field("accentHover", self.accent_hover.as_str())?,
            accent_light: HexColor::parse_field("accentLight", self.accent_light.as_str())?,
            highlight: HexColor::parse_field("highlight", self.highlight.as_str())?,
            highlight_border: HexColor::parse_field("highlightBorder", self.highlight_border.as_str())?,
        })
    }

    /// Parse every field, substituting `neutral` for invalid ones.
    ///
    /// Returns the swatch together with the errors that were replaced.
    pub fn parse_or(&self, neutral: HexColor) -> (Swatch, Vec<ColorError>) {
        let mut errors = Vec::new();
        let mut pick = |field: &'static str, value: &str| {
            HexColor::parse_field(field, value).unwrap_or_else(|err| {
                errors.push(err);
                neutral
            })
        };
        let swatch = Swatch {
            primary: pick("primary", self.primary.as_str()),
            primary_hover: pick("primaryHover", self.primary_hover.as_str()),
            primary_light: pick("primaryLight", self.primary_light.as_str()),
            accent: pick("accent", self.accent.as_str()),
            accent_hover: pick("accentHover", self.accent_hover.as_str()),
            accent_light: pick("accentLight", self.accent_light.as_str()),
            highlight: pick("highlight", self.highlight.as_str()),
            highlight_border: pick("highlightBorder", self.highlight_border.as_str()),
        };
        (swatch, errors)
    }

    /// Klein blue, the built-in palette.
    pub fn klein() -> Self {
        Self {
            primary: "#002fa7".into(),
            primary_hover: "#001f73".into(),
            primary_light: "#0040d9".into(),
            accent: "#64748b".into(),
            accent_hover: "#475569".into(),
            accent_light: "#e2e8f0".into(),
            highlight: "#eff6ff".into(),
            highlight_border: "#3b82f6".into(),
        }
    }
}

/// A named palette from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaletteDefinition {
    pub id: String,
    pub display_name: String,
    pub colors: PaletteColors,
}

impl PaletteDefinition {
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        colors: PaletteColors,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            colors,
        }
    }

    /// The built-in `klein` palette.
    pub fn klein() -> Self {
        Self::new("klein", "Klein Blue", PaletteColors::klein())
    }
}
