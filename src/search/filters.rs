use schema::{Creature, PokemonType, StatKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Which end of a stat range a bound applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatBound {
    Min,
    Max,
}

/// Structured filters for a search without a text query.
///
/// An empty field places no constraint. A creature that lacks a stat fails
/// any bound set on that stat.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchFilters {
    /// The creature must have at least one of these types.
    pub types: Vec<PokemonType>,
    /// The creature's generation must be one of these.
    pub generations: Vec<u8>,
    pub min_stats: BTreeMap<StatKind, u32>,
    pub max_stats: BTreeMap<StatKind, u32>,
}

impl SearchFilters {
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
            && self.generations.is_empty()
            && self.min_stats.is_empty()
            && self.max_stats.is_empty()
    }

    pub fn has_active_filters(&self) -> bool {
        !self.is_empty()
    }

    pub fn toggle_type(&mut self, pokemon_type: PokemonType) {
        match self.types.iter().position(|t| *t == pokemon_type) {
            Some(index) => {
                self.types.remove(index);
            }
            None => self.types.push(pokemon_type),
        }
    }

    pub fn toggle_generation(&mut self, generation: u8) {
        match self.generations.iter().position(|g| *g == generation) {
            Some(index) => {
                self.generations.remove(index);
            }
            None => self.generations.push(generation),
        }
    }

    fn bounds_mut(&mut self, bound: StatBound) -> &mut BTreeMap<StatKind, u32> {
        match bound {
            StatBound::Min => &mut self.min_stats,
            StatBound::Max => &mut self.max_stats,
        }
    }

    pub fn set_stat_bound(&mut self, stat: StatKind, bound: StatBound, value: u32) {
        self.bounds_mut(bound).insert(stat, value);
    }

    pub fn clear_stat_bound(&mut self, stat: StatKind, bound: StatBound) {
        self.bounds_mut(bound).remove(&stat);
    }

    /// The bound currently in effect, or the edge of the stat's known range.
    pub fn stat_bound(&self, stat: StatKind, bound: StatBound) -> u32 {
        let (low, high) = stat.range();
        match bound {
            StatBound::Min => self.min_stats.get(&stat).copied().unwrap_or(low),
            StatBound::Max => self.max_stats.get(&stat).copied().unwrap_or(high),
        }
    }

    /// False if any stat has a minimum above its maximum.
    pub fn validate(&self) -> bool {
        self.min_stats.iter().all(|(stat, min)| {
            self.max_stats
                .get(stat)
                .is_none_or(|max| min <= max)
        })
    }

    /// Types first, then generations, then minimums, then maximums.
    pub fn matches(&self, creature: &Creature) -> bool {
        if !self.types.is_empty() && !creature.has_any_type(&self.types) {
            return false;
        }

        if !self.generations.is_empty() && !self.generations.contains(&creature.generation()) {
            return false;
        }

        let meets_min = self
            .min_stats
            .iter()
            .all(|(stat, min)| creature.stat(*stat).is_some_and(|value| value >= *min));
        if !meets_min {
            return false;
        }

        self.max_stats
            .iter()
            .all(|(stat, max)| creature.stat(*stat).is_some_and(|value| value <= *max))
    }
}
