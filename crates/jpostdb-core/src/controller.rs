// crates/jpostdb-core/src/controller.rs

//! # Faceted Search Controller
//!
//! One controller drives both catalog pages. It owns the facet option lists,
//! the filter selection, the current result page and one loading flag per
//! kind of request, and talks to the server through a [`Transport`].
//!
//! ## Scheduling model
//!
//! The controller is a cheap `Rc` handle and every operation takes `&self`.
//! State is borrowed only between await points, so two operations may be in
//! flight at once on a single-threaded executor (a browser event loop, a
//! current-thread tokio runtime) exactly as UI events would interleave.
//!
//! ## Out-of-order responses
//!
//! Searches and city fetches are numbered. When a response arrives for a
//! request that has since been superseded it is dropped, and the loading flag
//! stays with the newest request.
//!
//! ## Failures
//!
//! Nothing is returned to the caller. A failed request is logged, the
//! variant's fixed message is stored in [`SearchState::error`] and the
//! loading flag is cleared. Data from the previous successful request stays.

use crate::config::VariantConfig;
use crate::error::{CatalogError, Result};
use crate::filter::{coerce_facet_id, FilterState};
use crate::model::{parse_facet_options, FacetOption, SearchPage};
use crate::pagination::PaginationState;
use crate::state::{SearchState, StateChange};
use crate::transport::{QueryPairs, Transport};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use tracing::{debug, info, warn};

type Observer = Rc<dyn Fn(StateChange, &SearchState)>;

/// Handle returned by [`FacetedSearchController::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct Inner<T> {
    config: VariantConfig,
    transport: T,
    state: RefCell<SearchState>,
    observers: RefCell<Vec<(SubscriptionId, Observer)>>,
    next_subscription: Cell<u64>,
    search_generation: Cell<u64>,
    secondary_generation: Cell<u64>,
}

pub struct FacetedSearchController<T> {
    inner: Rc<Inner<T>>,
}

impl<T> Clone for FacetedSearchController<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> fmt::Debug for FacetedSearchController<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FacetedSearchController")
            .field("variant", &self.inner.config.name)
            .field("state", &self.inner.state.borrow())
            .finish()
    }
}

/// Builds the search query for `filter` at `pagination`.
///
/// Unset facets and a blank keyword are left out; `page` and `page_size` are
/// always present.
pub fn build_search_query(
    config: &VariantConfig,
    filter: &FilterState,
    pagination: &PaginationState,
) -> QueryPairs {
    let params = &config.params;
    let mut query = QueryPairs::new();

    if let Some(id) = filter.primary_facet_id {
        query.push((params.primary.clone(), id.to_string()));
    }
    if let (Some(name), Some(id)) = (&params.secondary, filter.secondary_facet_id) {
        if config.has_secondary() {
            query.push((name.clone(), id.to_string()));
        }
    }
    if let Some(kw) = filter.keyword() {
        query.push((params.keyword.clone(), kw.to_string()));
    }
    query.push((params.page.clone(), pagination.page.to_string()));
    query.push((params.page_size.clone(), pagination.page_size.to_string()));
    query
}

fn option_label(opt: &FacetOption) -> String {
    match (opt.field("full_name"), opt.field("en_name")) {
        (Some(full), Some(en)) => format!("{full} ({en})"),
        (Some(full), None) => full.to_string(),
        _ => opt
            .field("name")
            .map(str::to_string)
            .unwrap_or_else(|| opt.id.to_string()),
    }
}

impl<T: Transport> FacetedSearchController<T> {
    pub fn new(config: VariantConfig, transport: T) -> Self {
        let state = SearchState::new(config.default_page_size);
        Self {
            inner: Rc::new(Inner {
                config,
                transport,
                state: RefCell::new(state),
                observers: RefCell::new(Vec::new()),
                next_subscription: Cell::new(0),
                search_generation: Cell::new(0),
                secondary_generation: Cell::new(0),
            }),
        }
    }

    pub fn config(&self) -> &VariantConfig {
        &self.inner.config
    }

    pub fn transport(&self) -> &T {
        &self.inner.transport
    }

    /// A copy of the current state.
    pub fn snapshot(&self) -> SearchState {
        self.inner.state.borrow().clone()
    }

    /// Reads the state without copying it.
    ///
    /// `f` must not call back into the controller.
    pub fn with_state<R>(&self, f: impl FnOnce(&SearchState) -> R) -> R {
        f(&self.inner.state.borrow())
    }

    // -------------------------------------------------------------------------
    // OBSERVERS
    // -------------------------------------------------------------------------

    /// Registers `observer`, called after every state mutation with the kind
    /// of change and a snapshot taken right after it.
    ///
    /// No internal borrow is held during the call, so the observer may read
    /// the controller or start another operation.
    pub fn subscribe(&self, observer: impl Fn(StateChange, &SearchState) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.inner.next_subscription.get());
        self.inner.next_subscription.set(id.0 + 1);
        self.inner
            .observers
            .borrow_mut()
            .push((id, Rc::new(observer)));
        id
    }

    /// Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut observers = self.inner.observers.borrow_mut();
        let before = observers.len();
        observers.retain(|(sid, _)| *sid != id);
        observers.len() != before
    }

    fn notify(&self, change: StateChange) {
        let observers: Vec<Observer> = self
            .inner
            .observers
            .borrow()
            .iter()
            .map(|(_, o)| Rc::clone(o))
            .collect();
        if observers.is_empty() {
            return;
        }
        let snapshot = self.snapshot();
        for observer in observers {
            observer(change, &snapshot);
        }
    }

    fn update<R>(&self, change: StateChange, f: impl FnOnce(&mut SearchState) -> R) -> R {
        let out = f(&mut self.inner.state.borrow_mut());
        self.notify(change);
        out
    }

    fn set_error(&self, message: &str) {
        let message = message.to_string();
        self.update(StateChange::Error, |s| s.error = message);
    }

    fn bump(counter: &Cell<u64>) -> u64 {
        let next = counter.get() + 1;
        counter.set(next);
        next
    }

    // -------------------------------------------------------------------------
    // FACETS
    // -------------------------------------------------------------------------

    /// Startup: loads the prefecture list. Does not search.
    pub async fn init(&self) {
        self.fetch_primary_facets().await;
    }

    async fn fetch_options(
        &self,
        path: &str,
        query: &[(String, String)],
        id_fields: &[String],
    ) -> Result<Vec<FacetOption>> {
        let body = self.inner.transport.get_json(path, query).await?;
        parse_facet_options(body, id_fields)
    }

    /// Reloads the primary option list. On failure the previous list stays.
    pub async fn fetch_primary_facets(&self) {
        let config = &self.inner.config;
        self.update(StateChange::Loading, |s| {
            s.loading.primary_facet = true;
            s.error.clear();
        });

        match self
            .fetch_options(&config.primary.path, &[], &config.primary.id_fields)
            .await
        {
            Ok(options) => {
                info!(variant = %config.name, count = options.len(), "primary facet loaded");
                self.update(StateChange::PrimaryOptions, |s| s.primary_options = options);
            }
            Err(err) => {
                warn!(variant = %config.name, error = %err, "primary facet fetch failed");
                self.set_error(&config.messages.primary_facet);
            }
        }

        self.update(StateChange::Loading, |s| s.loading.primary_facet = false);
    }

    async fn fetch_secondary_facets(&self, primary_id: i64) {
        let config = &self.inner.config;
        let Some(secondary) = &config.secondary else {
            return;
        };
        let generation = Self::bump(&self.inner.secondary_generation);

        self.update(StateChange::Loading, |s| {
            s.loading.secondary_facet = true;
            s.error.clear();
        });

        let query = vec![(secondary.scope_param.clone(), primary_id.to_string())];
        let result = self
            .fetch_options(&secondary.endpoint.path, &query, &secondary.endpoint.id_fields)
            .await;

        if self.inner.secondary_generation.get() != generation {
            debug!(variant = %config.name, primary_id, "discarding stale secondary facet response");
            return;
        }

        match result {
            Ok(options) => {
                info!(variant = %config.name, primary_id, count = options.len(), "secondary facet loaded");
                self.update(StateChange::SecondaryOptions, |s| {
                    if let Some(selected) = s.filter.secondary_facet_id {
                        if !options.iter().any(|o| o.id == selected) {
                            s.filter.secondary_facet_id = None;
                        }
                    }
                    s.secondary_options = options;
                });
            }
            Err(err) => {
                warn!(variant = %config.name, primary_id, error = %err, "secondary facet fetch failed");
                self.set_error(&config.messages.secondary_facet);
            }
        }

        self.update(StateChange::Loading, |s| s.loading.secondary_facet = false);
    }

    /// Selects a prefecture (or clears it with `None`) and resets to page 1.
    ///
    /// On a variant with a city facet, clearing also clears the city and its
    /// option list; selecting fetches the cities of that prefecture. A
    /// selected city survives the fetch only if it is still listed.
    /// Never searches.
    pub async fn select_primary_facet(&self, id: Option<i64>) {
        self.update(StateChange::Filter, |s| {
            s.filter.primary_facet_id = id;
            s.pagination.page = 1;
        });

        if !self.inner.config.has_secondary() {
            return;
        }

        match id {
            Some(primary_id) => self.fetch_secondary_facets(primary_id).await,
            None => {
                // Any city fetch still in flight belongs to the old prefecture.
                Self::bump(&self.inner.secondary_generation);
                self.update(StateChange::SecondaryOptions, |s| {
                    s.filter.secondary_facet_id = None;
                    s.secondary_options.clear();
                    s.loading.secondary_facet = false;
                });
            }
        }
    }

    /// [`select_primary_facet`](Self::select_primary_facet) for a raw
    /// select-box value.
    pub async fn select_primary_facet_raw(&self, raw: &str) {
        self.select_primary_facet(coerce_facet_id(raw)).await;
    }

    /// Selects a city and resets to page 1. No request is made.
    pub fn select_secondary_facet(&self, id: Option<i64>) {
        if !self.inner.config.has_secondary() {
            warn!(variant = %self.inner.config.name, "variant has no secondary facet; ignoring selection");
            return;
        }
        self.update(StateChange::Filter, |s| {
            s.filter.secondary_facet_id = id;
            s.pagination.page = 1;
        });
    }

    pub fn select_secondary_facet_raw(&self, raw: &str) {
        self.select_secondary_facet(coerce_facet_id(raw));
    }

    /// Stores the name keyword. Takes effect on the next search.
    pub fn set_name_keyword(&self, text: impl Into<String>) {
        let text = text.into();
        self.update(StateChange::Filter, |s| s.filter.name_keyword = text);
    }

    // -------------------------------------------------------------------------
    // SEARCH
    // -------------------------------------------------------------------------

    /// Starts over at page 1 with the current filter.
    pub async fn apply_filter(&self) {
        self.update(StateChange::Page, |s| s.pagination.page = 1);
        self.search().await;
    }

    /// Runs the search for the current filter and page.
    ///
    /// On success the server's `page` and `page_size` replace the local ones
    /// (a zero or missing value keeps the local one).
    pub async fn search(&self) {
        let config = &self.inner.config;
        let generation = Self::bump(&self.inner.search_generation);
        let query = self.with_state(|s| build_search_query(config, &s.filter, &s.pagination));

        self.update(StateChange::Loading, |s| {
            s.loading.search = true;
            s.error.clear();
        });

        let result = match self
            .inner
            .transport
            .get_json(&config.search_endpoint, &query)
            .await
        {
            Ok(body) => serde_json::from_value::<SearchPage>(body).map_err(CatalogError::from),
            Err(err) => Err(err),
        };

        if self.inner.search_generation.get() != generation {
            debug!(variant = %config.name, generation, "discarding stale search response");
            return;
        }

        match result {
            Ok(page) => {
                debug!(
                    variant = %config.name,
                    total = page.total,
                    page = page.page,
                    items = page.items.len(),
                    "search completed"
                );
                self.update(StateChange::Results, |s| {
                    s.items = page.items;
                    s.pagination.total = page.total;
                    if page.page > 0 {
                        s.pagination.page = page.page;
                    }
                    if page.page_size > 0 {
                        s.pagination.page_size = page.page_size;
                    }
                });
            }
            Err(err) => {
                warn!(variant = %config.name, error = %err, "search failed");
                self.set_error(&config.messages.search);
            }
        }

        self.update(StateChange::Loading, |s| s.loading.search = false);
    }

    /// Clears the filter, the results and the error. The city option list is
    /// kept; nothing is fetched.
    pub fn reset_filter(&self) {
        self.update(StateChange::Reset, |s| {
            s.filter.clear();
            s.pagination.page = 1;
            s.pagination.total = 0;
            s.items.clear();
            s.error.clear();
        });
    }

    /// Advances one page and searches. No-op on the last page or while a
    /// search is in flight.
    pub async fn next_page(&self) {
        if !self.with_state(|s| s.has_next_page() && !s.loading.search) {
            return;
        }
        self.update(StateChange::Page, |s| s.pagination.page += 1);
        self.search().await;
    }

    /// Goes back one page and searches. No-op on page 1 or while a search is
    /// in flight.
    pub async fn prev_page(&self) {
        if !self.with_state(|s| s.pagination.has_prev_page() && !s.loading.search) {
            return;
        }
        self.update(StateChange::Page, |s| s.pagination.page -= 1);
        self.search().await;
    }

    // -------------------------------------------------------------------------
    // DERIVED VIEWS
    // -------------------------------------------------------------------------

    pub fn has_any_criteria(&self) -> bool {
        self.with_state(|s| s.filter.has_any_criteria())
    }

    /// Human-readable summary of the selection, e.g.
    /// `Tokyo (Tokyo) · Shinjuku · Office: Shiba`.
    pub fn filter_label(&self) -> String {
        let config = &self.inner.config;
        self.with_state(|s| {
            let mut parts = Vec::new();
            if let Some(pref) = s.selected_primary() {
                parts.push(option_label(pref));
            }
            if let Some(city) = s.selected_secondary() {
                parts.push(option_label(city));
            }
            if let Some(kw) = s.filter.keyword() {
                parts.push(format!("{}: {kw}", config.keyword_label));
            }
            if parts.is_empty() {
                config.empty_label.clone()
            } else {
                parts.join(" · ")
            }
        })
    }
}
