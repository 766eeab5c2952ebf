use crate::notify::Notifier;
use crate::search::engine::SearchEngine;
use crate::search::filters::SearchFilters;
use crate::search::query_string::SearchParams;
use crate::search::sort::{sorted, SortBy, SortOrder};
use schema::Creature;
use std::sync::Arc;
use tracing::{info, warn};

/// Everything a search screen needs to render.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    pub query: String,
    pub filters: SearchFilters,
    pub items: Vec<Arc<Creature>>,
    pub has_more: bool,
    pub has_searched: bool,
    pub total_results: usize,
    /// Offset of the last page loaded.
    pub offset: usize,
    pub sort_by: SortBy,
    pub sort_order: SortOrder,
}

/// Holds one user's search and pages through it.
pub struct SearchSession {
    engine: Arc<SearchEngine>,
    notifier: Notifier,
    page_size: usize,
    state: SearchState,
}

impl SearchSession {
    pub fn new(engine: Arc<SearchEngine>, notifier: Notifier) -> Self {
        let page_size = engine.page_size();
        Self {
            engine,
            notifier,
            page_size,
            state: SearchState::default(),
        }
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    /// The current query and filters as URL parameters.
    pub fn params(&self) -> SearchParams {
        SearchParams {
            query: self.state.query.clone(),
            filters: self.state.filters.clone(),
            offset: self.state.offset,
        }
    }

    /// Restore a search from URL parameters, then page forward until the
    /// stored offset is covered.
    pub async fn restore(&mut self, params: SearchParams) {
        self.perform_search(&params.query, params.filters).await;
        while self.state.has_more && self.state.offset + self.page_size <= params.offset {
            self.load_more().await;
        }
    }

    /// Run a fresh search from offset zero. A blank query with no active
    /// filters just resets the results.
    pub async fn perform_search(&mut self, query: &str, filters: SearchFilters) {
        let query = query.trim();
        if query.is_empty() && !filters.has_active_filters() {
            self.clear();
            return;
        }

        self.state.query = query.to_string();
        self.state.filters = filters;
        self.state.offset = 0;
        self.state.has_searched = true;

        let outcome = self
            .engine
            .try_search(query, &self.state.filters, self.page_size, 0)
            .await;

        match outcome {
            Ok(result) => {
                self.state.items = result.items;
                self.state.has_more = result.has_more;
                self.state.total_results = result.total_results;
                info!(query, total = result.total_results, "search finished");
                self.announce_results(query);
            }
            Err(err) => {
                warn!(query, error = %err, "search failed");
                self.state.items.clear();
                self.state.has_more = false;
                self.state.total_results = 0;
                self.notifier
                    .error("Search Error", "Failed to search Pokémon. Please try again.");
            }
        }
    }

    /// Append the next page. Does nothing when there is no further page.
    ///
    /// The offset moves forward whenever the page was fetched, even if every
    /// creature on it failed to load.
    pub async fn load_more(&mut self) {
        if !self.state.has_more {
            return;
        }

        let next_offset = self.state.offset + self.page_size;
        let outcome = self
            .engine
            .try_search(
                &self.state.query,
                &self.state.filters,
                self.page_size,
                next_offset,
            )
            .await;

        match outcome {
            Ok(page) => {
                self.state.offset = next_offset;
                self.state.items.extend(page.items);
                self.state.has_more = page.has_more;
                self.state.total_results = page.total_results;
            }
            Err(err) => {
                warn!(
                    query = %self.state.query,
                    offset = next_offset,
                    error = %err,
                    "load more failed, keeping current results"
                );
                self.state.has_more = false;
            }
        }
    }

    /// Forget the search but keep the sort preference.
    pub fn clear(&mut self) {
        self.state = SearchState {
            sort_by: self.state.sort_by,
            sort_order: self.state.sort_order,
            ..SearchState::default()
        };
    }

    pub fn set_sort(&mut self, sort_by: SortBy, sort_order: SortOrder) {
        self.state.sort_by = sort_by;
        self.state.sort_order = sort_order;
    }

    pub fn toggle_sort_order(&mut self) {
        self.state.sort_order = self.state.sort_order.toggled();
    }

    pub fn sorted_items(&self) -> Vec<Arc<Creature>> {
        sorted(&self.state.items, self.state.sort_by, self.state.sort_order)
    }

    fn announce_results(&self, query: &str) {
        let total = self.state.total_results;
        if self.state.items.is_empty() {
            self.notifier.warning(
                "No Results",
                "No Pokémon found matching your search criteria",
            );
        } else if !query.is_empty() {
            self.notifier.success(
                "Search Complete",
                format!("Found {total} Pokémon matching \"{query}\""),
            );
        } else {
            self.notifier.info(
                "Filter Applied",
                format!("Found {total} Pokémon matching your filters"),
            );
        }
    }
}
