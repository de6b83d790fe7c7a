// dashboard/session/store.rs - Filter/search state container
//
// One ProductStore backs one dashboard session. It owns the current filter
// criteria and the recent-search history, borrows nothing global, and
// derives the visible products from (catalog, criteria) on every read.
//
// Lifecycle:
// - The composition root builds the store with a catalog and a StoreConfig
// - User interaction mutates criteria through set_search / set_filter /
//   apply_smart_filter / reset_filters
// - view() recomputes the derived view from scratch

use crate::dashboard::api::catalog::Catalog;
use crate::dashboard::api::queries;
use crate::dashboard::error::Result;
use crate::dashboard::model::{FilterCriteria, FilterUpdate, Product, ProductView, DEFAULT_PAGE_SIZE};
use crate::dashboard::session::history::{RecentSearches, DEFAULT_HISTORY_LIMIT};
use crate::dashboard::session::smart_filter::{self, SmartFilter};
use crate::dashboard::session::suggestions::{self, Suggestion};

/// Tunables for a store
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StoreConfig {
    pub history_limit: usize,
    pub page_size: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            history_limit: DEFAULT_HISTORY_LIMIT,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Filter/search state for one session
#[derive(Clone, Debug)]
pub struct ProductStore {
    catalog: Catalog,
    criteria: FilterCriteria,
    history: RecentSearches,
    config: StoreConfig,
}

impl ProductStore {
    pub fn new(catalog: Catalog, config: StoreConfig) -> Self {
        ProductStore {
            catalog,
            criteria: FilterCriteria::with_page_size(config.page_size),
            history: RecentSearches::with_capacity(config.history_limit),
            config,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn history(&self) -> &RecentSearches {
        &self.history
    }

    /// Set the free-text query; an empty string turns text filtering off
    pub fn set_search(&mut self, query: impl Into<String>) {
        self.criteria.query = query.into();
        self.criteria.page = 0;
        tracing::debug!("Search set to '{}'", self.criteria.query);
        self.record_query();
    }

    /// Set one filter dimension
    pub fn set_filter(&mut self, update: FilterUpdate) {
        tracing::debug!("Filter update: {:?}", update);
        self.criteria.apply(update);
        self.record_query();
    }

    /// Set one filter dimension from a key/value pair
    ///
    /// Unknown keys fail with `InvalidFilterKey`, unparsable values with
    /// `InvalidFilterValue`. On failure the criteria are left untouched.
    pub fn set_filter_by_key(&mut self, key: &str, value: &str) -> Result<()> {
        let update = FilterUpdate::parse(key, value)?;
        self.set_filter(update);
        Ok(())
    }

    /// Interpret a smart filter token; unknown tokens become the text query
    pub fn apply_smart_filter(&mut self, token: &str) -> SmartFilter {
        let outcome = smart_filter::interpret(token);
        match &outcome {
            SmartFilter::Updates(updates) => {
                for update in updates {
                    self.criteria.apply(update.clone());
                }
                self.record_query();
            }
            SmartFilter::Search(query) => self.set_search(query.clone()),
        }
        outcome
    }

    /// Restore default criteria, keeping the configured page size and the history
    pub fn reset_filters(&mut self) {
        self.criteria = FilterCriteria::with_page_size(self.config.page_size);
    }

    /// The derived view for the current criteria
    pub fn view(&self) -> ProductView {
        queries::derive_view(&self.catalog, &self.criteria)
    }

    /// Every matching product in display order, unpaginated
    pub fn visible_products(&self) -> Vec<&Product> {
        queries::filter_and_sort(self.catalog.products(), &self.criteria)
    }

    pub fn suggestions(&self, input: &str, limit: usize) -> Vec<Suggestion> {
        suggestions::suggest(&self.catalog, &self.history, input, limit)
    }

    fn record_query(&mut self) {
        let query = self.criteria.query.clone();
        self.history.record(&query);
    }
}
