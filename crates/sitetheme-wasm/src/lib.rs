//! # sitetheme-wasm
//!
//! The site's theme controller, compiled to WebAssembly.
//!
//! ## Quick Start (JavaScript)
//!
//! ```javascript
//! import init, { ThemeController } from 'sitetheme-wasm';
//!
//! async function main() {
//!     await init();
//!
//!     const theme = await ThemeController.init('./themes.json');
//!     theme.bindToggle('theme-toggle');
//!
//!     document.addEventListener('themeColorChanged', (e) => {
//!         console.log(e.detail.paletteId, e.detail.mode);
//!     });
//!
//!     theme.setPalette('forest');
//! }
//!
//! main();
//! ```
//!
//! ## Available APIs
//!
//! - `ThemeController.init(catalogUrl?)` - Load the catalog and apply the stored theme
//! - `setPalette(id)` / `setMode(mode)` / `toggleMode()` - Change the selection
//! - `current()` - `{ paletteId, mode }`
//! - `availablePalettes()` - `[{ id, name }]`
//! - `bindToggle(elementId)` - Make an element flip light/dark on click

#![forbid(unsafe_code)]

pub mod adapters;
pub mod logging;

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Array, Object, Reflect};
use sitetheme::{Mode, Selection, ThemeConfig, ThemeState};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CustomEvent, CustomEventInit, Event, MediaQueryListEvent, console};

pub use adapters::{
    DocumentSink, LocalStorageStore, MediaQueryScheme, fetch_catalog, fetch_catalog_or_builtin,
};

/// Name of the event dispatched on `document` after every change.
pub const CHANGE_EVENT: &str = "themeColorChanged";

/// Initialize the module.
///
/// Sets up the panic hook for better error messages in the browser console
/// and sends warnings and errors from the theme library to the console.
#[wasm_bindgen(start)]
pub fn start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    logging::init(tracing_subscriber::filter::LevelFilter::WARN);
}

/// Module version information.
#[must_use]
#[wasm_bindgen(js_name = "version")]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

type Pending = Rc<RefCell<Vec<Selection>>>;

/// Live theme for the current document.
///
/// Keep the controller alive for as long as the page uses it; dropping it
/// detaches the toggle and system-preference listeners.
#[wasm_bindgen]
pub struct ThemeController {
    state: Rc<RefCell<ThemeState>>,
    pending: Pending,
    listeners: Vec<Closure<dyn FnMut(Event)>>,
}

#[wasm_bindgen]
impl ThemeController {
    /// Fetch the catalog (built-in palette on failure), restore the stored
    /// selection, apply it and start following OS scheme changes.
    pub async fn init(catalog_url: Option<String>) -> ThemeController {
        let config = ThemeConfig::default();
        let url = catalog_url.unwrap_or_else(|| config.catalog_location().to_string());
        let catalog = fetch_catalog_or_builtin(&url).await;
        let scheme = MediaQueryScheme::new();
        let query = scheme.query().cloned();

        let mut state = ThemeState::new(
            catalog,
            config,
            LocalStorageStore::new(),
            DocumentSink::new(),
            scheme,
        );
        let pending: Pending = Rc::default();
        let queue = Rc::clone(&pending);
        state.on_change(move |selection| queue.borrow_mut().push(selection.clone()));

        let mut controller = ThemeController {
            state: Rc::new(RefCell::new(state)),
            pending,
            listeners: Vec::new(),
        };
        // Announce the initial selection as well.
        controller.pending.borrow_mut().push(controller.state.borrow().current());
        controller.flush();

        if let Some(query) = query {
            let state = Rc::clone(&controller.state);
            let pending = Rc::clone(&controller.pending);
            let on_scheme_change = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
                let Some(event) = event.dyn_ref::<MediaQueryListEvent>() else {
                    return;
                };
                state.borrow_mut().system_scheme_changed(event.matches());
                dispatch_pending(&pending);
            });
            match query.add_event_listener_with_callback(
                "change",
                on_scheme_change.as_ref().unchecked_ref(),
            ) {
                Ok(()) => controller.listeners.push(on_scheme_change),
                Err(err) => console::warn_2(&"sitetheme: cannot watch color scheme".into(), &err),
            }
        }

        controller
    }

    /// Switch palette. Returns `false` if the id was unknown and the default
    /// palette was applied instead.
    #[wasm_bindgen(js_name = "setPalette")]
    pub fn set_palette(&self, id: &str) -> bool {
        let known = self.state.borrow_mut().set_palette(id);
        self.flush();
        known
    }

    /// Switch to `"light"` or `"dark"`.
    ///
    /// # Errors
    /// Throws for any other mode string.
    #[wasm_bindgen(js_name = "setMode")]
    pub fn set_mode(&self, mode: &str) -> Result<(), JsValue> {
        let mode: Mode = mode.parse().map_err(|e| JsValue::from_str(&format!("{e}")))?;
        self.state.borrow_mut().set_mode(mode);
        self.flush();
        Ok(())
    }

    /// Flip light/dark and return the new mode.
    #[wasm_bindgen(js_name = "toggleMode")]
    pub fn toggle_mode(&self) -> String {
        let mode = self.state.borrow_mut().toggle_mode();
        self.flush();
        mode.as_str().to_string()
    }

    /// `{ paletteId, mode }`.
    pub fn current(&self) -> JsValue {
        selection_to_js(&self.state.borrow().current())
    }

    /// `[{ id, name }]` for every palette in the catalog.
    #[wasm_bindgen(js_name = "availablePalettes")]
    pub fn available_palettes(&self) -> Array {
        let state = self.state.borrow();
        state
            .available_palettes()
            .map(|palette| {
                let entry = Object::new();
                set_field(&entry, "id", &palette.id);
                set_field(&entry, "name", &palette.display_name);
                JsValue::from(entry)
            })
            .collect()
    }

    /// Flip light/dark whenever the element with `element_id` is clicked.
    ///
    /// Returns `false` when there is no such element.
    #[wasm_bindgen(js_name = "bindToggle")]
    pub fn bind_toggle(&mut self, element_id: &str) -> bool {
        let Some(element) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(element_id))
        else {
            return false;
        };

        let state = Rc::clone(&self.state);
        let pending = Rc::clone(&self.pending);
        let on_click = Closure::<dyn FnMut(Event)>::new(move |_event: Event| {
            state.borrow_mut().toggle_mode();
            dispatch_pending(&pending);
        });
        if element
            .add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())
            .is_err()
        {
            return false;
        }
        self.listeners.push(on_click);
        true
    }
}

impl ThemeController {
    fn flush(&self) {
        dispatch_pending(&self.pending);
    }
}

/// Dispatch queued selections. Runs with no borrow of the state held, so event
/// handlers may call back into the controller.
fn dispatch_pending(pending: &Pending) {
    let selections = std::mem::take(&mut *pending.borrow_mut());
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };
    for selection in selections {
        let init = CustomEventInit::new();
        init.set_detail(&selection_to_js(&selection));
        match CustomEvent::new_with_event_init_dict(CHANGE_EVENT, &init) {
            Ok(event) => {
                let _ = document.dispatch_event(&event);
            }
            Err(err) => console::warn_2(&"sitetheme: cannot create change event".into(), &err),
        }
    }
}

fn selection_to_js(selection: &Selection) -> JsValue {
    let detail = Object::new();
    set_field(&detail, "paletteId", &selection.palette_id);
    set_field(&detail, "mode", selection.mode.as_str());
    detail.into()
}

fn set_field(object: &Object, key: &str, value: &str) {
    let _ = Reflect::set(object, &JsValue::from_str(key), &JsValue::from_str(value));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        let v = version();
        assert!(!v.is_empty());
    }

    #[test]
    fn test_change_event_name() {
        assert_eq!(CHANGE_EVENT, "themeColorChanged");
    }
}
