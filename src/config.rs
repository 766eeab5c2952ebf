//! Runtime configuration.
//!
//! Every field has a default, so an empty RON file (or no file at all) gives a
//! working setup. Environment variables are applied on top of the file.

use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "https://pokeapi.co/api/v2";

/// Creatures worth having warm before anyone searches.
pub const FEATURED_CREATURE_IDS: [u32; 17] = [
    1, 4, 7, 25, 39, 52, 54, 74, 104, 113, 133, 143, 150, 151, 251, 384, 493,
];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanionConfig {
    pub upstream: UpstreamConfig,
    pub cache: CacheConfig,
    pub search: SearchConfig,
    pub battle: BattleConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub default_ttl_secs: u64,
    /// Name index pages change rarely and live longer.
    pub list_ttl_multiplier: u32,
    /// Whole id ranges are reused by filter searches and live longer.
    pub range_ttl_multiplier: u32,
    pub sweep_interval_secs: u64,
    pub batch_size: usize,
    pub featured_ids: Vec<u32>,
    pub initial_batch_size: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub page_size: usize,
    /// Upper bound on the id range a filter search pulls in.
    pub working_set_cap: usize,
    /// How many names the substring search scans.
    pub name_index_size: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    pub level: u32,
    pub power: u32,
    pub max_turns: u32,
    pub start_delay_ms: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout_secs: 10,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_ttl_secs: 10 * 60,
            list_ttl_multiplier: 3,
            range_ttl_multiplier: 2,
            sweep_interval_secs: 3 * 60,
            batch_size: 10,
            featured_ids: FEATURED_CREATURE_IDS.to_vec(),
            initial_batch_size: 50,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            page_size: 20,
            working_set_cap: 1000,
            name_index_size: 1000,
        }
    }
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            level: 50,
            power: 80,
            max_turns: 20,
            start_delay_ms: 100,
        }
    }
}

impl CacheConfig {
    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl_secs)
    }

    pub fn list_ttl(&self) -> Duration {
        self.default_ttl() * self.list_ttl_multiplier
    }

    pub fn range_ttl(&self) -> Duration {
        self.default_ttl() * self.range_ttl_multiplier
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

impl UpstreamConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl BattleConfig {
    pub fn start_delay(&self) -> Duration {
        Duration::from_millis(self.start_delay_ms)
    }
}

impl CompanionConfig {
    /// Load configuration from an optional RON file, then apply environment
    /// overrides and validate the result.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_ron(&std::fs::read_to_string(path)?)?,
            None => Self::default(),
        };
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_ron(text: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(text)?)
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(base_url) = env::var("POKEAPI_BASE_URL") {
            self.upstream.base_url = base_url;
        }
        if let Ok(ttl) = env::var("COMPANION_CACHE_TTL_SECS") {
            self.cache.default_ttl_secs = parse_env_number("COMPANION_CACHE_TTL_SECS", &ttl)?;
        }
        if let Ok(interval) = env::var("COMPANION_SWEEP_INTERVAL_SECS") {
            self.cache.sweep_interval_secs =
                parse_env_number("COMPANION_SWEEP_INTERVAL_SECS", &interval)?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field, reason: &str| ConfigError::InvalidValue {
            field,
            reason: reason.to_string(),
        };

        if self.cache.default_ttl_secs == 0 {
            return Err(invalid("cache.default_ttl_secs", "must be greater than zero"));
        }
        if self.cache.sweep_interval_secs == 0 {
            return Err(invalid("cache.sweep_interval_secs", "must be greater than zero"));
        }
        if self.cache.batch_size == 0 {
            return Err(invalid("cache.batch_size", "must be greater than zero"));
        }
        if self.search.page_size == 0 {
            return Err(invalid("search.page_size", "must be greater than zero"));
        }
        if self.battle.max_turns == 0 {
            return Err(invalid("battle.max_turns", "must be greater than zero"));
        }
        if self.upstream.base_url.trim().is_empty() {
            return Err(invalid("upstream.base_url", "must not be empty"));
        }
        Ok(())
    }
}

fn parse_env_number(field: &'static str, value: &str) -> Result<u64, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        field,
        reason: format!("'{}' is not a whole number", value),
    })
}
