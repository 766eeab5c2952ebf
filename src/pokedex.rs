//! Cached access to the upstream creature database.
//!
//! Every lookup goes through one [`TtlCache`] under a composite key built
//! from the lookup's parameters, so unrelated queries never share an entry.

use crate::api::CreatureSource;
use crate::cache::{CacheStats, TtlCache};
use crate::config::CacheConfig;
use crate::errors::{FetchError, FetchResult};
use futures_util::future::join_all;
use schema::{Creature, CreatureListing, EvolutionChain, NamedRef, SpeciesInfo};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

pub fn creature_key(id: u32) -> String {
    format!("pokemon-{id}")
}

pub fn species_key(id: u32) -> String {
    format!("species-{id}")
}

pub fn evolution_chain_key(id: u32) -> String {
    format!("evolution-chain-{id}")
}

pub fn listing_key(limit: u32, offset: u32) -> String {
    format!("list-{limit}-{offset}")
}

pub fn range_key(start: u32, end: u32) -> String {
    format!("range-{start}-{end}")
}

pub fn initial_batch_key(size: u32) -> String {
    format!("initial-batch-{size}")
}

/// Everything the pokedex stores in its cache.
#[derive(Debug, Clone)]
pub enum Cached {
    Creature(Arc<Creature>),
    Listing(Arc<CreatureListing>),
    Creatures(Arc<Vec<Arc<Creature>>>),
    Species(Arc<SpeciesInfo>),
    Evolution(Arc<EvolutionChain>),
}

trait CachedPayload: Sized {
    fn into_cached(self) -> Cached;
    fn from_cached(cached: Cached) -> Option<Self>;
}

impl CachedPayload for Arc<Creature> {
    fn into_cached(self) -> Cached {
        Cached::Creature(self)
    }

    fn from_cached(cached: Cached) -> Option<Self> {
        match cached {
            Cached::Creature(creature) => Some(creature),
            _ => None,
        }
    }
}

impl CachedPayload for Arc<CreatureListing> {
    fn into_cached(self) -> Cached {
        Cached::Listing(self)
    }

    fn from_cached(cached: Cached) -> Option<Self> {
        match cached {
            Cached::Listing(listing) => Some(listing),
            _ => None,
        }
    }
}

impl CachedPayload for Arc<Vec<Arc<Creature>>> {
    fn into_cached(self) -> Cached {
        Cached::Creatures(self)
    }

    fn from_cached(cached: Cached) -> Option<Self> {
        match cached {
            Cached::Creatures(creatures) => Some(creatures),
            _ => None,
        }
    }
}

impl CachedPayload for Arc<SpeciesInfo> {
    fn into_cached(self) -> Cached {
        Cached::Species(self)
    }

    fn from_cached(cached: Cached) -> Option<Self> {
        match cached {
            Cached::Species(species) => Some(species),
            _ => None,
        }
    }
}

impl CachedPayload for Arc<EvolutionChain> {
    fn into_cached(self) -> Cached {
        Cached::Evolution(self)
    }

    fn from_cached(cached: Cached) -> Option<Self> {
        match cached {
            Cached::Evolution(chain) => Some(chain),
            _ => None,
        }
    }
}

/// Result of a substring search over the name index.
#[derive(Debug, Clone, Default)]
pub struct NameSearch {
    /// The requested window of matches, fully fetched.
    pub creatures: Vec<Arc<Creature>>,
    /// How many names matched in total.
    pub total_matches: usize,
}

pub struct Pokedex {
    source: Arc<dyn CreatureSource>,
    cache: Arc<TtlCache<Cached>>,
    config: CacheConfig,
}

impl Pokedex {
    pub fn new(source: Arc<dyn CreatureSource>, config: CacheConfig) -> Self {
        let cache = Arc::new(TtlCache::with_batch_size(config.default_ttl(), config.batch_size));
        Self::with_cache(source, cache, config)
    }

    /// Use an existing cache, e.g. one the caller already runs a sweeper for.
    pub fn with_cache(
        source: Arc<dyn CreatureSource>,
        cache: Arc<TtlCache<Cached>>,
        config: CacheConfig,
    ) -> Self {
        Self {
            source,
            cache,
            config,
        }
    }

    pub fn cache(&self) -> &Arc<TtlCache<Cached>> {
        &self.cache
    }

    async fn cached<T, F, Fut>(&self, key: String, ttl: Duration, fetch: F) -> FetchResult<T>
    where
        T: CachedPayload,
        F: FnOnce() -> Fut,
        Fut: Future<Output = FetchResult<T>>,
    {
        let cached = self
            .cache
            .get_or_fetch(&key, ttl, || async { fetch().await.map(T::into_cached) })
            .await?;
        T::from_cached(cached).ok_or(FetchError::UnexpectedPayload { key })
    }

    pub async fn creature(&self, id: u32) -> FetchResult<Arc<Creature>> {
        self.cached(creature_key(id), self.config.default_ttl(), || async {
            Ok::<_, FetchError>(Arc::new(self.source.fetch_creature(id).await?))
        })
        .await
    }

    /// Fetch many creatures in batches. Ids that fail to load are left out;
    /// the rest keep the order of `ids`.
    pub async fn creatures(&self, ids: &[u32]) -> Vec<Arc<Creature>> {
        let keys: Vec<String> = ids.iter().map(|id| creature_key(*id)).collect();
        let ids_by_key: HashMap<&str, u32> = keys
            .iter()
            .map(String::as_str)
            .zip(ids.iter().copied())
            .collect();
        let ids_by_key = &ids_by_key;
        let source = &self.source;

        let values = self
            .cache
            .get_or_fetch_many(&keys, self.config.default_ttl(), |chunk| async move {
                join_all(chunk.iter().map(|key| async move {
                    let id = *ids_by_key
                        .get(key.as_str())
                        .ok_or_else(|| FetchError::InvalidReference(key.clone()))?;
                    let creature = source.fetch_creature(id).await?;
                    Ok::<_, FetchError>(Cached::Creature(Arc::new(creature)))
                }))
                .await
            })
            .await;

        values
            .into_iter()
            .filter_map(<Arc<Creature> as CachedPayload>::from_cached)
            .collect()
    }

    /// Every creature with an id in `start..=end`, cached as one entry.
    pub async fn creature_range(&self, start: u32, end: u32) -> FetchResult<Arc<Vec<Arc<Creature>>>> {
        self.cached(range_key(start, end), self.config.range_ttl(), || async {
            let ids: Vec<u32> = (start..=end).collect();
            let creatures = self.creatures(&ids).await;
            debug!(start, end, loaded = creatures.len(), "loaded creature range");
            Ok::<_, FetchError>(Arc::new(creatures))
        })
        .await
    }

    pub async fn listing(&self, limit: u32, offset: u32) -> FetchResult<Arc<CreatureListing>> {
        self.cached(listing_key(limit, offset), self.config.list_ttl(), || async {
            Ok::<_, FetchError>(Arc::new(self.source.fetch_listing(limit, offset).await?))
        })
        .await
    }

    /// Names in the first `index_size` index entries containing `query`,
    /// case-insensitively, in index order.
    pub async fn name_matches(&self, query: &str, index_size: u32) -> FetchResult<Vec<NamedRef>> {
        let needle = query.trim().to_lowercase();
        let listing = self.listing(index_size, 0).await?;

        Ok(listing
            .results
            .iter()
            .filter(|entry| entry.name.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    /// Fetch the matches at positions `offset..offset + limit` of the name
    /// index. The window is taken over the matched names, so a creature that
    /// fails to load leaves a gap instead of shifting later pages.
    pub async fn search_by_name(
        &self,
        query: &str,
        offset: usize,
        limit: usize,
        index_size: u32,
    ) -> FetchResult<NameSearch> {
        let matches = self.name_matches(query, index_size).await?;
        let ids: Vec<u32> = matches
            .iter()
            .skip(offset)
            .take(limit)
            .filter_map(|entry| {
                let id = entry.id();
                if id.is_none() {
                    warn!(name = %entry.name, url = %entry.url, "index entry has no usable id");
                }
                id
            })
            .collect();

        Ok(NameSearch {
            creatures: self.creatures(&ids).await,
            total_matches: matches.len(),
        })
    }

    pub async fn species(&self, id: u32) -> FetchResult<Arc<SpeciesInfo>> {
        self.cached(species_key(id), self.config.default_ttl(), || async {
            Ok::<_, FetchError>(Arc::new(self.source.fetch_species(id).await?))
        })
        .await
    }

    pub async fn evolution_chain(&self, id: u32) -> FetchResult<Arc<EvolutionChain>> {
        self.cached(evolution_chain_key(id), self.config.default_ttl(), || async {
            Ok::<_, FetchError>(Arc::new(self.source.fetch_evolution_chain(id).await?))
        })
        .await
    }

    /// Evolution chain of a creature's species, or `None` if any step of the
    /// lookup fails.
    pub async fn evolution_chain_for(&self, creature_id: u32) -> Option<Arc<EvolutionChain>> {
        let lookup = async {
            let species = self.species(creature_id).await?;
            let chain_id = species.evolution_chain_id().ok_or_else(|| {
                FetchError::InvalidReference(format!("species {} has no evolution chain", species.name))
            })?;
            self.evolution_chain(chain_id).await
        };

        match lookup.await {
            Ok(chain) => Some(chain),
            Err(err) => {
                warn!(creature_id, error = %err, "could not resolve evolution chain");
                None
            }
        }
    }

    /// Warm the cache with the featured creatures that are not cached yet.
    /// Returns how many were loaded.
    pub async fn preload_featured(&self) -> usize {
        let uncached: Vec<u32> = self
            .config
            .featured_ids
            .iter()
            .copied()
            .filter(|id| !self.cache.contains_fresh(&creature_key(*id)))
            .collect();

        if uncached.is_empty() {
            return 0;
        }

        let loaded = self.creatures(&uncached).await.len();
        info!(loaded, requested = uncached.len(), "preloaded featured creatures");
        loaded
    }

    /// The first page of creatures shown before any search.
    pub async fn preload_initial_batch(&self) -> FetchResult<Arc<Vec<Arc<Creature>>>> {
        let size = self.config.initial_batch_size;
        self.cached(initial_batch_key(size), self.config.range_ttl(), || async {
            self.creature_range(1, size).await
        })
        .await
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn clear_expired(&self) -> usize {
        self.cache.sweep_expired()
    }

    pub fn clear_all(&self) {
        self.cache.clear();
    }
}
