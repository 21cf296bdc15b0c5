//! The set of palettes a site offers.
//!
//! Catalogs are read from a JSON (or TOML) document of the form
//!
//! ```json
//! {
//!   "defaultTheme": "klein",
//!   "themes": {
//!     "klein": { "name": "Klein Blue", "colors": { "primary": "#002fa7", "...": "..." } }
//!   }
//! }
//! ```
//!
//! Colors are checked on load. A palette with a malformed color is kept and
//! logged; the state resolves it with neutral substitutes for the bad fields.

use std::collections::BTreeMap;
#[cfg(feature = "native")]
use std::fs;
#[cfg(feature = "native")]
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::palette::{PaletteColors, PaletteDefinition};
use crate::ports::CatalogSource;

/// Palette used when a document does not name a default.
pub const DEFAULT_PALETTE: &str = "klein";

/// Error loading a catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
    #[error("Default palette '{0}' is not in the catalog")]
    MissingDefault(String),
    #[error("Catalog has no palettes")]
    Empty,
    #[error("Fetch failed: {0}")]
    Fetch(String),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CatalogDocument {
    default_theme: Option<String>,
    themes: BTreeMap<String, PaletteEntry>,
}

#[derive(Deserialize)]
struct PaletteEntry {
    name: String,
    colors: PaletteColors,
}

/// Validated palettes keyed by id, plus the default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    default: PaletteDefinition,
    themes: BTreeMap<String, PaletteDefinition>,
}

impl Catalog {
    /// Build a catalog from palettes.
    ///
    /// Later palettes replace earlier ones with the same id. A palette with an
    /// invalid color is kept with a `warn!`.
    ///
    /// # Errors
    /// Returns [`CatalogError::Empty`] for no palettes and
    /// [`CatalogError::MissingDefault`] when `default_theme` is not among them.
    pub fn new(
        default_theme: impl Into<String>,
        palettes: impl IntoIterator<Item = PaletteDefinition>,
    ) -> Result<Self, CatalogError> {
        let default_theme = default_theme.into();
        let mut themes = BTreeMap::new();
        for palette in palettes {
            if let Err(err) = palette.colors.parse() {
                warn!(
                    theme.palette = %palette.id,
                    error = %err,
                    "Palette has an invalid color, neutral substitutes will be used"
                );
            }
            themes.insert(palette.id.clone(), palette);
        }
        if themes.is_empty() {
            return Err(CatalogError::Empty);
        }
        let default = themes
            .get(&default_theme)
            .cloned()
            .ok_or(CatalogError::MissingDefault(default_theme))?;
        debug!(
            catalog.default = %default.id,
            catalog.palettes = themes.len(),
            "Catalog loaded"
        );
        Ok(Self { default, themes })
    }

    /// The catalog compiled into the crate: `klein` only.
    pub fn builtin() -> Self {
        let klein = PaletteDefinition::klein();
        Self {
            themes: BTreeMap::from([(klein.id.clone(), klein.clone())]),
            default: klein,
        }
    }

    fn from_document(doc: CatalogDocument) -> Result<Self, CatalogError> {
        let default_theme = doc
            .default_theme
            .unwrap_or_else(|| DEFAULT_PALETTE.to_string());
        let palettes = doc
            .themes
            .into_iter()
            .map(|(id, entry)| PaletteDefinition::new(id, entry.name, entry.colors));
        Self::new(default_theme, palettes)
    }

    /// Load a catalog from JSON text.
    ///
    /// # Errors
    /// Returns `CatalogError` if JSON parsing or validation fails.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let doc: CatalogDocument = serde_json::from_str(json)?;
        Self::from_document(doc)
    }

    /// Load a catalog from TOML text.
    ///
    /// # Errors
    /// Returns `CatalogError` if TOML parsing or validation fails.
    pub fn from_toml(toml: &str) -> Result<Self, CatalogError> {
        let doc: CatalogDocument = toml::from_str(toml)?;
        Self::from_document(doc)
    }

    /// Load a catalog from a file (format inferred by extension).
    ///
    /// # Errors
    /// Returns `CatalogError` if reading, parsing, or validation fails.
    #[cfg(feature = "native")]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&content),
            Some("toml") => Self::from_toml(&content),
            Some(ext) => Err(CatalogError::UnsupportedFormat(ext.into())),
            None => Err(CatalogError::UnsupportedFormat("unknown".into())),
        }
    }

    /// Load through `source`, substituting [`Catalog::builtin`] on any error.
    pub fn load_or_builtin(source: &dyn CatalogSource) -> Self {
        match source.load() {
            Ok(catalog) => catalog,
            Err(err) => {
                error!(error = %err, "Failed to load theme catalog, using built-in palette");
                Self::builtin()
            }
        }
    }

    pub fn default_id(&self) -> &str {
        &self.default.id
    }

    pub fn default_palette(&self) -> &PaletteDefinition {
        &self.default
    }

    pub fn get(&self, id: &str) -> Option<&PaletteDefinition> {
        self.themes.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.themes.contains_key(id)
    }

    /// The palette named `id`, or the default when there is none.
    pub fn palette_or_default(&self, id: &str) -> &PaletteDefinition {
        self.get(id).unwrap_or_else(|| {
            warn!(
                theme.palette = id,
                theme.default = %self.default.id,
                "Unknown palette, using default"
            );
            &self.default
        })
    }

    /// Palettes in id order.
    pub fn palettes(&self) -> impl Iterator<Item = &PaletteDefinition> {
        self.themes.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.themes.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.themes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.themes.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_PALETTES: &str = r##"{
        "defaultTheme": "forest",
        "themes": {
            "klein": {
                "name": "Klein Blue",
                "colors": {
                    "primary": "#002fa7", "primaryHover": "#001f73", "primaryLight": "#0040d9",
                    "accent": "#64748b", "accentHover": "#475569", "accentLight": "#e2e8f0",
                    "highlight": "#eff6ff", "highlightBorder": "#3b82f6"
                }
            },
            "forest": {
                "name": "Forest",
                "colors": {
                    "primary": "#407D52", "primaryHover": "#2f5c3c", "primaryLight": "#5a9a6c",
                    "accent": "#78716c", "accentHover": "#57534e", "accentLight": "#e7e5e4",
                    "highlight": "#f0fdf4", "highlightBorder": "#86efac"
                }
            }
        }
    }"##;

    #[test]
    fn test_from_json() {
        let catalog = Catalog::from_json(TWO_PALETTES).expect("valid catalog");
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.default_id(), "forest");
        assert_eq!(catalog.get("forest").map(|p| p.display_name.as_str()), Some("Forest"));
        assert_eq!(catalog.ids().collect::<Vec<_>>(), vec!["forest", "klein"]);
    }

    #[test]
    fn test_missing_default_theme_means_klein() {
        let json = TWO_PALETTES.replace(r#""defaultTheme": "forest","#, "");
        let catalog = Catalog::from_json(&json).expect("valid catalog");
        assert_eq!(catalog.default_id(), "klein");
    }

    #[test]
    fn test_unknown_default_theme_is_error() {
        let json = TWO_PALETTES.replace(r#""defaultTheme": "forest""#, r#""defaultTheme": "ocean""#);
        let err = Catalog::from_json(&json).unwrap_err();
        assert!(matches!(err, CatalogError::MissingDefault(ref id) if id == "ocean"));
    }

    #[test]
    fn test_invalid_color_keeps_every_palette() {
        let json = TWO_PALETTES.replace("#57534e", "stone");
        let catalog = Catalog::from_json(&json).expect("catalog still loads");
        assert_eq!(catalog.ids().collect::<Vec<_>>(), vec!["forest", "klein"]);
        let err = catalog
            .get("forest")
            .map(|p| p.colors.parse().unwrap_err())
            .expect("forest kept");
        assert_eq!(err.field(), Some("accentHover"));
    }

    #[test]
    fn test_load_or_builtin_survives_one_bad_field() {
        let json = TWO_PALETTES.replace("#eff6ff", "#eff6f");
        let catalog = Catalog::load_or_builtin(&crate::ports::StaticCatalog::Json(json));
        assert_eq!(catalog.len(), 2);
        assert!(catalog.contains("forest"));
        assert!(catalog.contains("klein"));
    }

    #[test]
    fn test_empty_catalog() {
        let err = Catalog::from_json(r#"{"themes": {}}"#).unwrap_err();
        assert!(matches!(err, CatalogError::Empty));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            Catalog::from_json("{ not json").unwrap_err(),
            CatalogError::Json(_)
        ));
    }

    #[test]
    fn test_from_toml() {
        let toml = r##"
defaultTheme = "klein"

[themes.klein]
name = "Klein Blue"

[themes.klein.colors]
primary = "#002fa7"
primaryHover = "#001f73"
primaryLight = "#0040d9"
accent = "#64748b"
accentHover = "#475569"
accentLight = "#e2e8f0"
highlight = "#eff6ff"
highlightBorder = "#3b82f6"
"##;
        let catalog = Catalog::from_toml(toml).expect("valid catalog");
        assert_eq!(catalog, Catalog::builtin());
    }

    #[test]
    fn test_palette_or_default() {
        let catalog = Catalog::from_json(TWO_PALETTES).expect("valid catalog");
        assert_eq!(catalog.palette_or_default("klein").id, "klein");
        assert_eq!(catalog.palette_or_default("nope").id, "forest");
    }

    #[cfg(feature = "native")]
    #[test]
    fn test_from_file_by_extension() {
        let dir = tempfile::tempdir().expect("tempdir");
        let json_path = dir.path().join("themes.json");
        fs::write(&json_path, TWO_PALETTES).expect("write");
        assert_eq!(Catalog::from_file(&json_path).expect("load").len(), 2);

        let yaml_path = dir.path().join("themes.yaml");
        fs::write(&yaml_path, "themes: {}").expect("write");
        assert!(matches!(
            Catalog::from_file(&yaml_path).unwrap_err(),
            CatalogError::UnsupportedFormat(ref ext) if ext == "yaml"
        ));

        assert!(matches!(
            Catalog::from_file(dir.path().join("missing.json")).unwrap_err(),
            CatalogError::Io(_)
        ));
    }
}
