//! Capabilities [`ThemeState`](crate::ThemeState) needs from its host, and the
//! in-process adapters for them.
//!
//! Browser adapters live in the `sitetheme-wasm` crate. The adapters here are
//! what the CLI and the tests run against. [`MemoryStore`] and
//! [`StyleSnapshot`] are cheap handles over shared state, so a clone kept by the
//! caller observes everything the state object does through its own copy.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt::Write as _;
#[cfg(feature = "native")]
use std::fs;
#[cfg(feature = "native")]
use std::path::{Path, PathBuf};
use std::rc::Rc;

#[cfg(feature = "native")]
use tracing::{debug, warn};

use crate::catalog::{Catalog, CatalogError};

/// Where a [`Catalog`] comes from.
pub trait CatalogSource {
    /// Load and validate the catalog.
    ///
    /// # Errors
    /// Any [`CatalogError`]; callers normally fall back to
    /// [`Catalog::load_or_builtin`].
    fn load(&self) -> Result<Catalog, CatalogError>;
}

/// String key-value persistence. A missing key means "unset".
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`. Failures are the adapter's to log; the caller
    /// never sees them.
    fn set(&mut self, key: &str, value: &str);
}

/// The document the theme is applied to.
pub trait StyleSink {
    /// Set an attribute on the root element, e.g. `data-theme="dark"`.
    fn set_attribute(&mut self, name: &str, value: &str);

    /// Set a custom property on the root element, e.g. `--bg-primary`.
    fn set_property(&mut self, name: &str, value: &str);
}

/// The host's light/dark preference.
pub trait SystemScheme {
    fn prefers_dark(&self) -> bool;
}

/// Serialized catalog text held in memory.
#[derive(Debug, Clone)]
pub enum StaticCatalog {
    Json(String),
    Toml(String),
}

impl StaticCatalog {
    pub fn json(text: impl Into<String>) -> Self {
        Self::Json(text.into())
    }

    pub fn toml(text: impl Into<String>) -> Self {
        Self::Toml(text.into())
    }
}

impl CatalogSource for StaticCatalog {
    fn load(&self) -> Result<Catalog, CatalogError> {
        match self {
            Self::Json(text) => Catalog::from_json(text),
            Self::Toml(text) => Catalog::from_toml(text),
        }
    }
}

/// A catalog file on disk; the format follows the extension.
#[cfg(feature = "native")]
#[derive(Debug, Clone)]
pub struct FileCatalog {
    path: PathBuf,
}

#[cfg(feature = "native")]
impl FileCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(feature = "native")]
impl CatalogSource for FileCatalog {
    fn load(&self) -> Result<Catalog, CatalogError> {
        Catalog::from_file(&self.path)
    }
}

/// Preferences held in memory for the lifetime of the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: Rc<RefCell<BTreeMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-populated with `entries`.
    pub fn with_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let values = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            values: Rc::new(RefCell::new(values)),
        }
    }

    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.values.borrow().clone()
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }
}

/// Preferences kept in a flat JSON object file.
///
/// The file is read once on open. Every `set` rewrites it; a failed write is
/// logged and the in-memory value still updates.
#[cfg(feature = "native")]
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

#[cfg(feature = "native")]
impl FileStore {
    /// Open the store at `path`. A missing or unreadable file starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text).unwrap_or_else(|err| {
                warn!(store.path = %path.display(), error = %err, "Ignoring malformed preference file");
                BTreeMap::new()
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => {
                warn!(store.path = %path.display(), error = %err, "Failed to read preference file");
                BTreeMap::new()
            }
        };
        debug!(store.path = %path.display(), store.keys = values.len(), "Preference store opened");
        Self { path, values }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.values)?;
        fs::write(&self.path, json)
    }
}

#[cfg(feature = "native")]
impl PreferenceStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
        if let Err(err) = self.write() {
            warn!(store.path = %self.path.display(), store.key = key, error = %err, "Failed to persist preference");
        }
    }
}

#[derive(Debug, Default)]
struct Applied {
    attributes: BTreeMap<String, String>,
    properties: BTreeMap<String, String>,
}

/// Records whatever was applied, for rendering or inspection.
#[derive(Debug, Clone, Default)]
pub struct StyleSnapshot {
    applied: Rc<RefCell<Applied>>,
}

impl StyleSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attribute(&self, name: &str) -> Option<String> {
        self.applied.borrow().attributes.get(name).cloned()
    }

    pub fn property(&self, name: &str) -> Option<String> {
        self.applied.borrow().properties.get(name).cloned()
    }

    pub fn properties(&self) -> BTreeMap<String, String> {
        self.applied.borrow().properties.clone()
    }

    /// Render the applied properties as a CSS rule for `selector`.
    pub fn to_css(&self, selector: &str) -> String {
        let applied = self.applied.borrow();
        let mut css = String::new();
        let _ = writeln!(css, "{selector} {{");
        for (name, value) in &applied.properties {
            let _ = writeln!(css, "  {name}: {value};");
        }
        css.push_str("}\n");
        css
    }
}

impl StyleSink for StyleSnapshot {
    fn set_attribute(&mut self, name: &str, value: &str) {
        self.applied
            .borrow_mut()
            .attributes
            .insert(name.to_string(), value.to_string());
    }

    fn set_property(&mut self, name: &str, value: &str) {
        self.applied
            .borrow_mut()
            .properties
            .insert(name.to_string(), value.to_string());
    }
}

/// A system preference that never changes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FixedScheme {
    pub prefers_dark: bool,
}

impl FixedScheme {
    pub const LIGHT: Self = Self { prefers_dark: false };
    pub const DARK: Self = Self { prefers_dark: true };
}

impl SystemScheme for FixedScheme {
    fn prefers_dark(&self) -> bool {
        self.prefers_dark
    }
}
