// crates/jpostdb-core/src/state.rs
use crate::filter::FilterState;
use crate::model::FacetOption;
use crate::pagination::PaginationState;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One flag per kind of request; set exactly while that request is outstanding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadingFlags {
    pub primary_facet: bool,
    pub secondary_facet: bool,
    pub search: bool,
}

impl LoadingFlags {
    pub fn any(&self) -> bool {
        self.primary_facet || self.secondary_facet || self.search
    }
}

/// Which part of [`SearchState`] an observer notification is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateChange {
    PrimaryOptions,
    SecondaryOptions,
    Filter,
    Page,
    Loading,
    Results,
    Error,
    Reset,
}

/// Everything a search page renders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchState {
    pub primary_options: Vec<FacetOption>,
    pub secondary_options: Vec<FacetOption>,
    pub filter: FilterState,
    pub pagination: PaginationState,
    /// Opaque result records of the current page.
    pub items: Vec<Value>,
    pub loading: LoadingFlags,
    /// Last user-facing error; empty when there is none.
    pub error: String,
}

impl SearchState {
    pub fn new(page_size: u32) -> Self {
        Self {
            primary_options: Vec::new(),
            secondary_options: Vec::new(),
            filter: FilterState::default(),
            pagination: PaginationState::new(page_size),
            items: Vec::new(),
            loading: LoadingFlags::default(),
            error: String::new(),
        }
    }

    pub fn total_pages(&self) -> u64 {
        self.pagination.total_pages()
    }

    pub fn has_next_page(&self) -> bool {
        self.pagination.has_next_page()
    }

    pub fn loading_any(&self) -> bool {
        self.loading.any()
    }

    pub fn has_error(&self) -> bool {
        !self.error.is_empty()
    }

    pub fn selected_primary(&self) -> Option<&FacetOption> {
        let id = self.filter.primary_facet_id?;
        self.primary_options.iter().find(|o| o.id == id)
    }

    pub fn selected_secondary(&self) -> Option<&FacetOption> {
        let id = self.filter.secondary_facet_id?;
        self.secondary_options.iter().find(|o| o.id == id)
    }
}
