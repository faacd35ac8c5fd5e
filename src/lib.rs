//! jpostdb-rs
//! ==========
//!
//! Workspace crate: re-exports [`jpostdb_core`] so the demos under `demos/`
//! can use a single import path.

pub use jpostdb_core::*;

pub mod prelude {
    pub use jpostdb_core::loader::{BatchLoader, DocumentStore, LoadProgress, MemoryDocumentStore};
    pub use jpostdb_core::{
        CatalogError, FacetOption, FacetedSearchController, QueryPairs, Result, SearchState,
        StateChange, Transport, VariantConfig,
    };
}
