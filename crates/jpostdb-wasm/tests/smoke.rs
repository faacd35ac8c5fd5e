#![cfg(target_arch = "wasm32")]

use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

use jpostdb_wasm::CatalogApp;

#[wasm_bindgen_test]
fn builds_both_catalogs() {
    let fuke = CatalogApp::new("fuke").unwrap();
    assert_eq!(fuke.variant(), "fuke");
    assert!(fuke.has_secondary_facet());

    let cards = CatalogApp::new("manhole-card").unwrap();
    assert!(!cards.has_secondary_facet());
}

#[wasm_bindgen_test]
fn rejects_unknown_variant() {
    assert!(CatalogApp::new("stamps").is_err());
}

#[wasm_bindgen_test]
fn filter_edits_are_visible_without_network() {
    let app = CatalogApp::new("fuke").unwrap();
    assert_eq!(app.filter_label(), "No prefecture / city selected");

    app.set_name_keyword("Shinjuku");
    assert!(app.has_any_criteria());
    assert_eq!(app.filter_label(), "Office: Shinjuku");

    app.reset_filter();
    assert!(!app.has_any_criteria());
    assert_eq!(app.total_pages(), 1.0);
}

#[wasm_bindgen_test]
fn snapshot_is_a_plain_object() {
    let app = CatalogApp::new("manhole-card").unwrap();
    let snapshot = app.snapshot().unwrap();
    let page = js_sys::Reflect::get(&snapshot, &JsValue::from_str("pagination")).unwrap();
    let size = js_sys::Reflect::get(&page, &JsValue::from_str("page_size")).unwrap();
    assert_eq!(size.as_f64(), Some(12.0));
}

#[wasm_bindgen_test]
fn subscriptions_can_be_removed_once() {
    let app = CatalogApp::new("fuke").unwrap();
    let handle = app.subscribe(js_sys::Function::new_no_args(""));
    assert!(app.unsubscribe(handle));
    assert!(!app.unsubscribe(handle));
}
