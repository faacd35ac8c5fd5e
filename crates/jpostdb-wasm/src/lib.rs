//! jpostdb-wasm: WebAssembly bindings for the jpostdb search controller
//!
//! Exposes [`CatalogApp`], the faceted search controller of `jpostdb-core`
//! wired to `window.fetch`, so a catalog page only has to render state and
//! forward user events.
//!
//! Quick start (browser)
//! ---------------------
//! ```javascript
//! import init, { CatalogApp } from 'jpostdb-wasm';
//!
//! await init();
//! const app = new CatalogApp('fuke');
//! app.subscribe((change, state) => render(state));
//! await app.init();                      // prefecture list
//! await app.selectPrimaryFacet('13');    // loads the cities of Tokyo
//! app.setNameKeyword('Shinjuku');
//! await app.applyFilter();
//! console.log(app.filterLabel(), app.snapshot().items);
//! ```
//!
//! Notes
//! -----
//! - Async operations return Promises that always resolve; failures show up
//!   as `state.error` (a fixed, user-facing message). The detailed cause is
//!   logged to the console at warn level by [`ConsoleLayer`], installed on
//!   module start.
//! - Paths are resolved against the page origin.
//! - `CatalogApp.withConfig({...})` accepts a full variant configuration for
//!   catalogs other than the two built-in ones.
use async_trait::async_trait;
use jpostdb_core::{
    build_url, CatalogError, FacetedSearchController, SearchState, StateChange, SubscriptionId,
    Transport, VariantConfig,
};
use serde::Serialize;
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{future_to_promise, JsFuture};
use web_sys::{Request, RequestInit, Response};

pub mod console;

pub use crate::console::ConsoleLayer;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    console_error_panic_hook::set_once();
    // Controller and transport failures are logged through tracing.
    let _ = tracing_subscriber::registry()
        .with(ConsoleLayer::default())
        .try_init();
    web_sys::console::log_1(&"jpostdb-wasm loaded".into());
}

/* --------------------------------------------------------------------------
   Fetch transport
-------------------------------------------------------------------------- */

/// [`Transport`] over the browser's `fetch`.
#[derive(Debug, Clone, Default)]
pub struct FetchTransport {
    base_url: String,
}

impl FetchTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Resolves paths against the current page origin.
    pub fn from_page_origin() -> Self {
        let origin = web_sys::window()
            .and_then(|w| w.location().origin().ok())
            .unwrap_or_default();
        Self::new(origin)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

fn js_error(context: &str, err: JsValue) -> CatalogError {
    CatalogError::Transport(format!("{context}: {err:?}"))
}

#[async_trait(?Send)]
impl Transport for FetchTransport {
    async fn get_json(&self, path: &str, query: &[(String, String)]) -> jpostdb_core::Result<Value> {
        let url = format!("{}{}", self.base_url, build_url(path, query));

        let opts = RequestInit::new();
        opts.set_method("GET");
        let request = Request::new_with_str_and_init(&url, &opts)
            .map_err(|e| js_error("building request", e))?;

        let window = web_sys::window().ok_or_else(|| CatalogError::transport("no window"))?;
        let resp_value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|e| js_error("fetch", e))?;
        let resp: Response = resp_value
            .dyn_into()
            .map_err(|e| js_error("not a Response", e))?;

        if !resp.ok() {
            return Err(CatalogError::Status {
                status: resp.status(),
                url,
            });
        }

        let json = JsFuture::from(resp.json().map_err(|e| js_error("json()", e))?)
            .await
            .map_err(|e| js_error("decoding body", e))?;
        serde_wasm_bindgen::from_value(json)
            .map_err(|e| CatalogError::InvalidData(format!("{url}: {e}")))
    }
}

/* --------------------------------------------------------------------------
   CatalogApp
-------------------------------------------------------------------------- */

type Controller = FacetedSearchController<FetchTransport>;

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    // json_compatible: objects become plain JS objects, not Maps.
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(Into::into)
}

fn settle<F>(fut: F) -> js_sys::Promise
where
    F: std::future::Future<Output = ()> + 'static,
{
    future_to_promise(async move {
        fut.await;
        Ok(JsValue::UNDEFINED)
    })
}

/// One catalog page's search state and operations.
#[wasm_bindgen]
pub struct CatalogApp {
    ctrl: Controller,
    subscriptions: RefCell<HashMap<u32, SubscriptionId>>,
    next_handle: Cell<u32>,
}

impl CatalogApp {
    fn build(config: VariantConfig) -> CatalogApp {
        CatalogApp {
            ctrl: FacetedSearchController::new(config, FetchTransport::from_page_origin()),
            subscriptions: RefCell::new(HashMap::new()),
            next_handle: Cell::new(1),
        }
    }
}

#[wasm_bindgen]
impl CatalogApp {
    /// `variant` is `"fuke"` or `"manhole-card"`.
    #[wasm_bindgen(constructor)]
    pub fn new(variant: &str) -> Result<CatalogApp, JsValue> {
        let config = VariantConfig::by_name(variant).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self::build(config))
    }

    /// Builds an app from a full variant configuration object.
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(config: JsValue) -> Result<CatalogApp, JsValue> {
        let config: VariantConfig = serde_wasm_bindgen::from_value(config)?;
        Ok(Self::build(config))
    }

    #[wasm_bindgen(getter)]
    pub fn variant(&self) -> String {
        self.ctrl.config().name.clone()
    }

    #[wasm_bindgen(getter, js_name = hasSecondaryFacet)]
    pub fn has_secondary_facet(&self) -> bool {
        self.ctrl.config().has_secondary()
    }

    /* ---- async operations ---- */

    pub fn init(&self) -> js_sys::Promise {
        let ctrl = self.ctrl.clone();
        settle(async move { ctrl.init().await })
    }

    #[wasm_bindgen(js_name = selectPrimaryFacet)]
    pub fn select_primary_facet(&self, raw: &str) -> js_sys::Promise {
        let ctrl = self.ctrl.clone();
        let raw = raw.to_string();
        settle(async move { ctrl.select_primary_facet_raw(&raw).await })
    }

    #[wasm_bindgen(js_name = applyFilter)]
    pub fn apply_filter(&self) -> js_sys::Promise {
        let ctrl = self.ctrl.clone();
        settle(async move { ctrl.apply_filter().await })
    }

    pub fn search(&self) -> js_sys::Promise {
        let ctrl = self.ctrl.clone();
        settle(async move { ctrl.search().await })
    }

    #[wasm_bindgen(js_name = nextPage)]
    pub fn next_page(&self) -> js_sys::Promise {
        let ctrl = self.ctrl.clone();
        settle(async move { ctrl.next_page().await })
    }

    #[wasm_bindgen(js_name = prevPage)]
    pub fn prev_page(&self) -> js_sys::Promise {
        let ctrl = self.ctrl.clone();
        settle(async move { ctrl.prev_page().await })
    }

    /* ---- sync operations ---- */

    #[wasm_bindgen(js_name = selectSecondaryFacet)]
    pub fn select_secondary_facet(&self, raw: &str) {
        self.ctrl.select_secondary_facet_raw(raw);
    }

    #[wasm_bindgen(js_name = setNameKeyword)]
    pub fn set_name_keyword(&self, text: &str) {
        self.ctrl.set_name_keyword(text);
    }

    #[wasm_bindgen(js_name = resetFilter)]
    pub fn reset_filter(&self) {
        self.ctrl.reset_filter();
    }

    /* ---- views ---- */

    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        self.ctrl.with_state(|s| to_js(s))
    }

    #[wasm_bindgen(js_name = filterLabel)]
    pub fn filter_label(&self) -> String {
        self.ctrl.filter_label()
    }

    #[wasm_bindgen(js_name = hasAnyCriteria)]
    pub fn has_any_criteria(&self) -> bool {
        self.ctrl.has_any_criteria()
    }

    #[wasm_bindgen(js_name = totalPages)]
    pub fn total_pages(&self) -> f64 {
        self.ctrl.with_state(|s| s.total_pages() as f64)
    }

    /* ---- observers ---- */

    /// Calls `callback(change, state)` after every state change. Returns a
    /// handle for [`unsubscribe`](Self::unsubscribe).
    pub fn subscribe(&self, callback: js_sys::Function) -> u32 {
        let id = self.ctrl.subscribe(move |change: StateChange, state: &SearchState| {
            let args = to_js(&change).and_then(|c| Ok((c, to_js(state)?)));
            let result = args.and_then(|(c, s)| callback.call2(&JsValue::NULL, &c, &s));
            if let Err(err) = result {
                web_sys::console::error_2(&"jpostdb observer failed:".into(), &err);
            }
        });

        let handle = self.next_handle.get();
        self.next_handle.set(handle + 1);
        self.subscriptions.borrow_mut().insert(handle, id);
        handle
    }

    pub fn unsubscribe(&self, handle: u32) -> bool {
        match self.subscriptions.borrow_mut().remove(&handle) {
            Some(id) => self.ctrl.unsubscribe(id),
            None => false,
        }
    }
}
