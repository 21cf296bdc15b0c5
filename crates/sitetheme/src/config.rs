//! Host configuration: storage keys, attribute names and where the catalog lives.

#[cfg(feature = "native")]
use std::fs;
#[cfg(feature = "native")]
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error loading a [`ThemeConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration for a [`ThemeState`](crate::ThemeState).
///
/// Defaults:
/// - palette: the catalog's `defaultTheme`
/// - storage keys `colorTheme` and `themeMode`
/// - catalog at `./themes.json`
/// - attributes `data-theme` and `data-color-theme`
///
/// # Example
///
/// ```rust
/// use sitetheme::ThemeConfig;
///
/// let config = ThemeConfig::new()
///     .default_palette("forest")
///     .palette_key("site.palette");
/// assert_eq!(config.mode_key_name(), "themeMode");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    default_palette: Option<String>,
    palette_key: String,
    mode_key: String,
    catalog_path: String,
    mode_attribute: String,
    palette_attribute: String,
}

impl ThemeConfig {
    /// Creates a configuration with default settings.
    pub fn new() -> Self {
        Self {
            default_palette: None,
            palette_key: "colorTheme".to_string(),
            mode_key: "themeMode".to_string(),
            catalog_path: "./themes.json".to_string(),
            mode_attribute: "data-theme".to_string(),
            palette_attribute: "data-color-theme".to_string(),
        }
    }

    /// Palette to use when nothing is stored. Overrides the catalog default
    /// when the catalog contains it.
    pub fn default_palette(mut self, id: impl Into<String>) -> Self {
        self.default_palette = Some(id.into());
        self
    }

    /// Storage key for the palette id.
    pub fn palette_key(mut self, key: impl Into<String>) -> Self {
        self.palette_key = key.into();
        self
    }

    /// Storage key for the mode.
    pub fn mode_key(mut self, key: impl Into<String>) -> Self {
        self.mode_key = key.into();
        self
    }

    /// Location of the catalog document (path or URL).
    pub fn catalog_path(mut self, path: impl Into<String>) -> Self {
        self.catalog_path = path.into();
        self
    }

    /// Root-element attribute that receives the mode.
    pub fn mode_attribute(mut self, name: impl Into<String>) -> Self {
        self.mode_attribute = name.into();
        self
    }

    /// Root-element attribute that receives the palette id.
    pub fn palette_attribute(mut self, name: impl Into<String>) -> Self {
        self.palette_attribute = name.into();
        self
    }

    pub fn default_palette_id(&self) -> Option<&str> {
        self.default_palette.as_deref()
    }

    pub fn palette_key_name(&self) -> &str {
        &self.palette_key
    }

    pub fn mode_key_name(&self) -> &str {
        &self.mode_key
    }

    pub fn catalog_location(&self) -> &str {
        &self.catalog_path
    }

    pub fn mode_attribute_name(&self) -> &str {
        &self.mode_attribute
    }

    pub fn palette_attribute_name(&self) -> &str {
        &self.palette_attribute
    }

    /// Parse from TOML text. Missing keys keep their defaults.
    ///
    /// # Errors
    /// Returns `ConfigError::Toml` on malformed input.
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml)?)
    }

    /// Read a TOML config file.
    ///
    /// # Errors
    /// Returns `ConfigError` if reading or parsing fails.
    #[cfg(feature = "native")]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self::new()
    }
}
