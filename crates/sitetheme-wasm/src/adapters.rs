//! Browser implementations of the sitetheme ports.

use sitetheme::{Catalog, CatalogError, PreferenceStore, StyleSink, SystemScheme};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{HtmlElement, MediaQueryList, Response, Storage, console};

/// Media query matched by an OS-level dark preference.
pub const DARK_SCHEME_QUERY: &str = "(prefers-color-scheme: dark)";

/// `window.localStorage`. When storage is unavailable (private mode, sandboxed
/// frames) every key reads as unset and writes are dropped.
#[derive(Debug, Clone)]
pub struct LocalStorageStore {
    storage: Option<Storage>,
}

impl LocalStorageStore {
    pub fn new() -> Self {
        let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten());
        if storage.is_none() {
            console::warn_1(&"sitetheme: localStorage unavailable, preferences will not persist".into());
        }
        Self { storage }
    }
}

impl Default for LocalStorageStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PreferenceStore for LocalStorageStore {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.as_ref()?.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) {
        let Some(storage) = &self.storage else {
            return;
        };
        if let Err(err) = storage.set_item(key, value) {
            console::warn_2(&format!("sitetheme: failed to store '{key}'").into(), &err);
        }
    }
}

/// Applies attributes and custom properties to `document.documentElement`.
#[derive(Debug, Clone)]
pub struct DocumentSink {
    root: Option<HtmlElement>,
}

impl DocumentSink {
    pub fn new() -> Self {
        let root = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.document_element())
            .and_then(|e| e.dyn_into::<HtmlElement>().ok());
        Self { root }
    }
}

impl Default for DocumentSink {
    fn default() -> Self {
        Self::new()
    }
}

impl StyleSink for DocumentSink {
    fn set_attribute(&mut self, name: &str, value: &str) {
        if let Some(root) = &self.root {
            let _ = root.set_attribute(name, value);
        }
    }

    fn set_property(&mut self, name: &str, value: &str) {
        if let Some(root) = &self.root {
            let _ = root.style().set_property(name, value);
        }
    }
}

/// `matchMedia('(prefers-color-scheme: dark)')`.
#[derive(Debug, Clone)]
pub struct MediaQueryScheme {
    query: Option<MediaQueryList>,
}

impl MediaQueryScheme {
    pub fn new() -> Self {
        let query = web_sys::window().and_then(|w| w.match_media(DARK_SCHEME_QUERY).ok().flatten());
        Self { query }
    }

    /// The underlying query list, for subscribing to `change` events.
    pub fn query(&self) -> Option<&MediaQueryList> {
        self.query.as_ref()
    }
}

impl Default for MediaQueryScheme {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemScheme for MediaQueryScheme {
    fn prefers_dark(&self) -> bool {
        self.query.as_ref().is_some_and(MediaQueryList::matches)
    }
}

fn fetch_error(value: JsValue) -> CatalogError {
    CatalogError::Fetch(
        value
            .as_string()
            .unwrap_or_else(|| format!("{value:?}")),
    )
}

/// Fetch and validate a JSON catalog.
///
/// # Errors
/// Returns [`CatalogError::Fetch`] for network failures and non-OK statuses,
/// and the usual parse and validation errors for a bad document.
pub async fn fetch_catalog(url: &str) -> Result<Catalog, CatalogError> {
    let window = web_sys::window().ok_or_else(|| CatalogError::Fetch("no window".into()))?;
    let response: Response = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(fetch_error)?
        .dyn_into()
        .map_err(fetch_error)?;
    if !response.ok() {
        return Err(CatalogError::Fetch(format!(
            "HTTP error! status: {}",
            response.status()
        )));
    }
    let body = JsFuture::from(response.text().map_err(fetch_error)?)
        .await
        .map_err(fetch_error)?;
    let text = body
        .as_string()
        .ok_or_else(|| CatalogError::Fetch("response body is not text".into()))?;
    Catalog::from_json(&text)
}

/// Fetch `url`, falling back to the built-in catalog on any error.
pub async fn fetch_catalog_or_builtin(url: &str) -> Catalog {
    match fetch_catalog(url).await {
        Ok(catalog) => catalog,
        Err(err) => {
            tracing::error!(catalog.url = url, error = %err, "Failed to load theme catalog, using built-in palette");
            console::error_1(&format!("sitetheme: failed to load {url}: {err}").into());
            Catalog::builtin()
        }
    }
}
