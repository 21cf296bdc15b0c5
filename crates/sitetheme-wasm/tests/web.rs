//! Browser-based WASM tests.
//!
//! Run with: wasm-pack test --headless --chrome

#![cfg(target_arch = "wasm32")]

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Reflect;
use sitetheme::{PreferenceStore, StyleSink};
use sitetheme_wasm::{DocumentSink, LocalStorageStore, ThemeController, fetch_catalog};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_test::*;
use web_sys::{CustomEvent, Document, HtmlElement, window};

wasm_bindgen_test_configure!(run_in_browser);

fn document() -> Document {
    window().expect("no window").document().expect("no document")
}

fn root() -> HtmlElement {
    document()
        .document_element()
        .expect("no root element")
        .dyn_into::<HtmlElement>()
        .expect("root is not an HtmlElement")
}

fn clear_storage() {
    if let Some(storage) = window().and_then(|w| w.local_storage().ok().flatten()) {
        let _ = storage.clear();
    }
}

fn field(value: &JsValue, key: &str) -> Option<String> {
    Reflect::get(value, &JsValue::from_str(key))
        .ok()
        .and_then(|v| v.as_string())
}

#[wasm_bindgen_test]
fn test_local_storage_round_trip() {
    clear_storage();
    let mut store = LocalStorageStore::new();
    assert_eq!(store.get("colorTheme"), None);
    store.set("colorTheme", "forest");
    assert_eq!(store.get("colorTheme").as_deref(), Some("forest"));
}

#[wasm_bindgen_test]
fn test_document_sink_sets_attribute_and_property() {
    let mut sink = DocumentSink::new();
    sink.set_attribute("data-theme", "dark");
    sink.set_property("--bg-primary", "#0f1419");
    assert_eq!(root().get_attribute("data-theme").as_deref(), Some("dark"));
    assert_eq!(
        root().style().get_property_value("--bg-primary").ok().as_deref(),
        Some("#0f1419")
    );
}

#[wasm_bindgen_test]
async fn test_fetch_missing_catalog_is_error() {
    assert!(fetch_catalog("/definitely-missing-themes.json").await.is_err());
}

#[wasm_bindgen_test]
async fn test_controller_falls_back_and_applies() {
    clear_storage();
    let controller = ThemeController::init(Some("/definitely-missing-themes.json".into())).await;

    let current = controller.current();
    assert_eq!(field(&current, "paletteId").as_deref(), Some("klein"));
    assert_eq!(
        root().get_attribute("data-color-theme").as_deref(),
        Some("klein")
    );
    assert_eq!(controller.available_palettes().length(), 1);
}

#[wasm_bindgen_test]
async fn test_toggle_dispatches_change_event() {
    clear_storage();
    let controller = ThemeController::init(Some("/definitely-missing-themes.json".into())).await;
    let before = field(&controller.current(), "mode").expect("mode");

    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let listener = Closure::<dyn FnMut(CustomEvent)>::new(move |event: CustomEvent| {
        sink.borrow_mut().push(field(&event.detail(), "mode"));
    });
    document()
        .add_event_listener_with_callback("themeColorChanged", listener.as_ref().unchecked_ref())
        .expect("add listener");

    let after = controller.toggle_mode();
    assert_ne!(before, after);
    assert_eq!(seen.borrow().last().cloned().flatten(), Some(after.clone()));
    assert_eq!(root().get_attribute("data-theme"), Some(after));

    document()
        .remove_event_listener_with_callback("themeColorChanged", listener.as_ref().unchecked_ref())
        .expect("remove listener");
}

#[wasm_bindgen_test]
async fn test_set_mode_rejects_unknown() {
    clear_storage();
    let controller = ThemeController::init(Some("/definitely-missing-themes.json".into())).await;
    assert!(controller.set_mode("sepia").is_err());
    assert!(controller.set_mode("dark").is_ok());
    assert_eq!(
        window()
            .and_then(|w| w.local_storage().ok().flatten())
            .and_then(|s| s.get_item("themeMode").ok().flatten())
            .as_deref(),
        Some("dark")
    );
}

#[wasm_bindgen_test]
async fn test_bind_toggle_requires_element() {
    let mut controller =
        ThemeController::init(Some("/definitely-missing-themes.json".into())).await;
    assert!(!controller.bind_toggle("no-such-toggle"));

    let button = document().create_element("button").expect("create button");
    button.set_id("theme-toggle-test");
    document()
        .body()
        .expect("no body")
        .append_child(&button)
        .expect("append");
    assert!(controller.bind_toggle("theme-toggle-test"));

    let before = field(&controller.current(), "mode");
    button
        .dyn_ref::<HtmlElement>()
        .expect("button is an HtmlElement")
        .click();
    assert_ne!(field(&controller.current(), "mode"), before);
    button.remove();
}
