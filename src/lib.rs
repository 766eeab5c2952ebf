//! Pokemon Companion
//!
//! Creature search, team building and quick one-on-one battles over a
//! cached copy of the public Pokemon database.

// --- MODULE DECLARATIONS ---
pub mod api;
pub mod battle;
pub mod cache;
pub mod config;
pub mod errors;
pub mod notify;
pub mod pokedex;
pub mod recommend;
pub mod search;
pub mod teams;

#[cfg(test)]
mod test_support;

// --- PUBLIC API RE-EXPORTS ---

// --- From the `schema` crate ---
pub use schema::{
    // Creature records
    Creature,
    CreatureListing,
    EvolutionChain,
    NamedRef,
    SpeciesInfo,
    // Enums
    PokemonType,
    StatKind,
};

// --- From this crate's modules (`src/`) ---

// Data access.
pub use api::{CreatureSource, PokeApiClient};
pub use cache::{spawn_sweeper, CacheStats, SweepHandle, TtlCache};
pub use pokedex::Pokedex;

// Search.
pub use search::engine::{SearchEngine, SearchResult};
pub use search::filters::SearchFilters;
pub use search::query_string::SearchParams;
pub use search::session::{SearchSession, SearchState};
pub use search::sort::{SortBy, SortOrder};

// Teams and battles.
pub use battle::calculators::BattleRules;
pub use battle::engine::{run_battle, simulate, BattleSim};
pub use battle::state::{BattleEvent, BattleOutcome, BattleReport, Side};
pub use teams::{RosterMember, Team};

pub use config::CompanionConfig;
pub use notify::{Notice, NoticeLevel, Notifier};

// Crate-specific error and result types.
pub use errors::{
    CompanionError, CompanionResult, ConfigError, FetchError, FetchResult, QueryStringError,
    TeamError,
};
