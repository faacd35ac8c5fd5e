// crates/jpostdb-core/src/lib.rs

//! jpostdb-core
//! ============
//!
//! Client-side core of the Japan Post catalog pages (scenic postmarks,
//! manhole cards) and the batch loader that feeds their document store.
//!
//! - [`controller::FacetedSearchController`]: prefecture -> city cascading
//!   filter, name keyword and paged search, parameterized per catalog by a
//!   [`config::VariantConfig`].
//! - [`transport::Transport`]: the JSON GET seam the controller talks
//!   through (`ReqwestTransport` with the `http` feature).
//! - [`loader`]: reads a JSON document array and writes it to a
//!   [`loader::DocumentStore`] one document at a time.
//!
//! ```no_run
//! use jpostdb_core::{FacetedSearchController, ReqwestTransport, VariantConfig};
//!
//! # async fn run() {
//! let transport = ReqwestTransport::new("http://127.0.0.1:8000");
//! let search = FacetedSearchController::new(VariantConfig::fuke(), transport);
//! search.init().await;
//! search.select_primary_facet(Some(13)).await;
//! search.apply_filter().await;
//! println!("{} results", search.snapshot().pagination.total);
//! # }
//! ```

pub mod config;
pub mod controller;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod pagination;
pub mod state;
pub mod transport;

// Re-exports
pub use crate::config::VariantConfig;
pub use crate::controller::{build_search_query, FacetedSearchController, SubscriptionId};
pub use crate::error::{CatalogError, Result};
pub use crate::filter::{coerce_facet_id, pad_code, FilterState};
pub use crate::model::{FacetOption, FukeItem, ManholeCardItem, SearchPage};
pub use crate::pagination::PaginationState;
pub use crate::state::{LoadingFlags, SearchState, StateChange};
pub use crate::transport::{build_url, QueryPairs, Transport};
#[cfg(feature = "http")]
pub use crate::transport::ReqwestTransport;
