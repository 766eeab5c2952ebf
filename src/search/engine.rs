use crate::config::SearchConfig;
use crate::errors::FetchResult;
use crate::pokedex::Pokedex;
use crate::search::filters::SearchFilters;
use schema::Creature;
use std::sync::Arc;
use tracing::{debug, warn};

/// One page of search output.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResult {
    pub items: Vec<Arc<Creature>>,
    pub has_more: bool,
    pub total_results: usize,
}

/// Name search and structured filtering over the pokedex.
///
/// With a query, filters are ignored. Without either, nothing is fetched.
pub struct SearchEngine {
    pokedex: Arc<Pokedex>,
    config: SearchConfig,
}

impl SearchEngine {
    pub fn new(pokedex: Arc<Pokedex>, config: SearchConfig) -> Self {
        Self { pokedex, config }
    }

    pub fn page_size(&self) -> usize {
        self.config.page_size
    }

    /// Like [`try_search`](Self::try_search), but an upstream failure gives an
    /// empty page instead of an error.
    pub async fn search(
        &self,
        query: &str,
        filters: &SearchFilters,
        limit: usize,
        offset: usize,
    ) -> SearchResult {
        match self.try_search(query, filters, limit, offset).await {
            Ok(result) => result,
            Err(err) => {
                warn!(query, offset, error = %err, "search failed, returning no results");
                SearchResult::default()
            }
        }
    }

    pub async fn try_search(
        &self,
        query: &str,
        filters: &SearchFilters,
        limit: usize,
        offset: usize,
    ) -> FetchResult<SearchResult> {
        let query = query.trim();
        if !query.is_empty() {
            return self.search_by_name(query, limit, offset).await;
        }
        if filters.has_active_filters() {
            return self.search_by_filters(filters, limit, offset).await;
        }
        Ok(SearchResult::default())
    }

    /// Fetch the page at `offset` and append it to `current`.
    ///
    /// If the page cannot be fetched, `current` comes back unchanged with
    /// `has_more` cleared so the caller stops asking.
    pub async fn load_more(
        &self,
        current: &[Arc<Creature>],
        query: &str,
        filters: &SearchFilters,
        limit: usize,
        offset: usize,
    ) -> SearchResult {
        match self.try_search(query, filters, limit, offset).await {
            Ok(page) => SearchResult {
                items: current.iter().cloned().chain(page.items).collect(),
                has_more: page.has_more,
                total_results: page.total_results,
            },
            Err(err) => {
                warn!(query, offset, error = %err, "load more failed, keeping current results");
                SearchResult {
                    items: current.to_vec(),
                    has_more: false,
                    total_results: current.len(),
                }
            }
        }
    }

    async fn search_by_name(
        &self,
        query: &str,
        limit: usize,
        offset: usize,
    ) -> FetchResult<SearchResult> {
        let found = self
            .pokedex
            .search_by_name(query, offset, limit, self.config.name_index_size)
            .await?;
        debug!(query, matches = found.total_matches, "name search");

        Ok(SearchResult {
            items: found.creatures,
            has_more: found.total_matches > offset + limit,
            total_results: found.total_matches,
        })
    }

    async fn search_by_filters(
        &self,
        filters: &SearchFilters,
        limit: usize,
        offset: usize,
    ) -> FetchResult<SearchResult> {
        let fetch_size = self.config.working_set_cap.min(offset + limit * 2);
        if fetch_size == 0 {
            return Ok(SearchResult::default());
        }

        let working_set = self.pokedex.creature_range(1, fetch_size as u32).await?;
        let filtered: Vec<Arc<Creature>> = working_set
            .iter()
            .filter(|creature| filters.matches(creature))
            .cloned()
            .collect();
        debug!(fetch_size, matched = filtered.len(), "filter search");

        Ok(SearchResult {
            items: filtered
                .iter()
                .skip(offset)
                .take(limit)
                .cloned()
                .collect(),
            has_more: filtered.len() > offset + limit,
            total_results: filtered.len(),
        })
    }
}
