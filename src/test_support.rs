//! Shared fixtures for unit tests: a creature builder and an in-memory
//! [`CreatureSource`] that counts its calls.

use crate::api::CreatureSource;
use crate::errors::{FetchError, FetchResult};
use async_trait::async_trait;
use schema::{
    BaseStat, Creature, CreatureListing, EvolutionChain, NamedRef, PokemonType, SpeciesInfo,
    StatKind,
};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Builds creatures with all six stats set to 50 unless overridden.
pub struct TestCreatureBuilder {
    id: u32,
    name: String,
    types: Vec<PokemonType>,
    stats: Vec<(StatKind, u32)>,
    moves: Vec<String>,
}

impl TestCreatureBuilder {
    pub fn new(id: u32, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            types: vec![PokemonType::Normal],
            stats: StatKind::ALL.iter().map(|kind| (*kind, 50)).collect(),
            moves: Vec::new(),
        }
    }

    pub fn with_types(mut self, types: &[PokemonType]) -> Self {
        self.types = types.to_vec();
        self
    }

    pub fn with_stat(mut self, kind: StatKind, value: u32) -> Self {
        match self.stats.iter_mut().find(|(k, _)| *k == kind) {
            Some(entry) => entry.1 = value,
            None => self.stats.push((kind, value)),
        }
        self
    }

    pub fn without_stat(mut self, kind: StatKind) -> Self {
        self.stats.retain(|(k, _)| *k != kind);
        self
    }

    pub fn with_moves(mut self, moves: &[&str]) -> Self {
        self.moves = moves.iter().map(|m| m.to_string()).collect();
        self
    }

    pub fn build(self) -> Creature {
        Creature {
            id: self.id,
            name: self.name,
            types: self.types,
            stats: self
                .stats
                .into_iter()
                .map(|(kind, value)| BaseStat {
                    name: kind.api_name().to_string(),
                    value,
                })
                .collect(),
            moves: self.moves,
            base_experience: None,
            height: 0,
            weight: 0,
            artwork_url: None,
            species: None,
        }
    }
}

#[derive(Default)]
pub struct FakeSource {
    creatures: HashMap<u32, Creature>,
    species: HashMap<u32, SpeciesInfo>,
    chains: HashMap<u32, EvolutionChain>,
    failing: HashSet<u32>,
    listing_fails: bool,
    creature_calls: AtomicUsize,
    listing_calls: AtomicUsize,
    chain_calls: AtomicUsize,
    fetched_ids: Mutex<Vec<u32>>,
}

impl FakeSource {
    pub fn with_creatures(creatures: impl IntoIterator<Item = Creature>) -> Self {
        Self {
            creatures: creatures.into_iter().map(|c| (c.id, c)).collect(),
            ..Self::default()
        }
    }

    /// Creatures 1..=n, named `mon-<id>`, Normal type, all stats 50.
    pub fn numbered(n: u32) -> Self {
        Self::with_creatures((1..=n).map(|id| TestCreatureBuilder::new(id, &format!("mon-{id}")).build()))
    }

    pub fn failing_on(mut self, ids: &[u32]) -> Self {
        self.failing.extend(ids);
        self
    }

    pub fn failing_listing(mut self) -> Self {
        self.listing_fails = true;
        self
    }

    pub fn with_species(mut self, species: SpeciesInfo) -> Self {
        self.species.insert(species.id, species);
        self
    }

    pub fn with_chain(mut self, chain: EvolutionChain) -> Self {
        self.chains.insert(chain.id, chain);
        self
    }

    pub fn creature_calls(&self) -> usize {
        self.creature_calls.load(Ordering::SeqCst)
    }

    pub fn listing_calls(&self) -> usize {
        self.listing_calls.load(Ordering::SeqCst)
    }

    pub fn chain_calls(&self) -> usize {
        self.chain_calls.load(Ordering::SeqCst)
    }

    pub fn fetched_ids(&self) -> Vec<u32> {
        self.fetched_ids.lock().unwrap().clone()
    }
}

fn not_found(resource: String) -> FetchError {
    FetchError::Status {
        status: 404,
        resource,
    }
}

#[async_trait]
impl CreatureSource for FakeSource {
    async fn fetch_creature(&self, id: u32) -> FetchResult<Creature> {
        self.creature_calls.fetch_add(1, Ordering::SeqCst);
        self.fetched_ids.lock().unwrap().push(id);
        if self.failing.contains(&id) {
            return Err(FetchError::Status {
                status: 500,
                resource: format!("pokemon/{id}"),
            });
        }
        self.creatures
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found(format!("pokemon/{id}")))
    }

    async fn fetch_listing(&self, limit: u32, offset: u32) -> FetchResult<CreatureListing> {
        self.listing_calls.fetch_add(1, Ordering::SeqCst);
        if self.listing_fails {
            return Err(FetchError::Status {
                status: 503,
                resource: "pokemon".to_string(),
            });
        }
        let mut all: Vec<&Creature> = self.creatures.values().collect();
        all.sort_by_key(|c| c.id);

        Ok(CreatureListing {
            count: all.len() as u32,
            results: all
                .into_iter()
                .skip(offset as usize)
                .take(limit as usize)
                .map(|c| NamedRef {
                    name: c.name.clone(),
                    url: format!("https://pokeapi.co/api/v2/pokemon/{}/", c.id),
                })
                .collect(),
        })
    }

    async fn fetch_species(&self, id: u32) -> FetchResult<SpeciesInfo> {
        self.species
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found(format!("pokemon-species/{id}")))
    }

    async fn fetch_evolution_chain(&self, id: u32) -> FetchResult<EvolutionChain> {
        self.chain_calls.fetch_add(1, Ordering::SeqCst);
        self.chains
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found(format!("evolution-chain/{id}")))
    }
}
