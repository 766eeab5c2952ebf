//! Upstream creature database.
//!
//! [`CreatureSource`] is the port the rest of the crate talks to.
//! [`PokeApiClient`] implements it over the PokeAPI REST endpoints and maps
//! their JSON into the `schema` types.

use crate::config::UpstreamConfig;
use crate::errors::{FetchError, FetchResult};
use async_trait::async_trait;
use schema::{
    BaseStat, Creature, CreatureListing, EvolutionChain, EvolutionNode, NamedRef, PokemonType,
    SpeciesInfo,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

#[async_trait]
pub trait CreatureSource: Send + Sync {
    async fn fetch_creature(&self, id: u32) -> FetchResult<Creature>;

    /// One page of the name index.
    async fn fetch_listing(&self, limit: u32, offset: u32) -> FetchResult<CreatureListing>;

    async fn fetch_species(&self, id: u32) -> FetchResult<SpeciesInfo>;

    async fn fetch_evolution_chain(&self, id: u32) -> FetchResult<EvolutionChain>;
}

/// HTTP client for the PokeAPI v2 endpoints.
#[derive(Debug, Clone)]
pub struct PokeApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl PokeApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> FetchResult<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &UpstreamConfig) -> FetchResult<Self> {
        Self::new(&config.base_url, config.timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> FetchResult<T> {
        let url = format!("{}/{}", self.base_url, path);
        debug!(url = %url, "requesting upstream resource");

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .inspect_err(|err| warn!(url = %url, error = %err, "upstream request failed"))?;

        let status = response.status();
        if !status.is_success() {
            warn!(url = %url, status = status.as_u16(), "upstream returned an error status");
            return Err(FetchError::Status {
                status: status.as_u16(),
                resource: path.to_string(),
            });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl CreatureSource for PokeApiClient {
    async fn fetch_creature(&self, id: u32) -> FetchResult<Creature> {
        let raw: RawPokemon = self.get_json(&format!("pokemon/{id}"), &[]).await?;
        Ok(raw.into())
    }

    async fn fetch_listing(&self, limit: u32, offset: u32) -> FetchResult<CreatureListing> {
        let query = [("limit", limit.to_string()), ("offset", offset.to_string())];
        self.get_json("pokemon", &query).await
    }

    async fn fetch_species(&self, id: u32) -> FetchResult<SpeciesInfo> {
        let raw: RawSpecies = self.get_json(&format!("pokemon-species/{id}"), &[]).await?;
        Ok(raw.into())
    }

    async fn fetch_evolution_chain(&self, id: u32) -> FetchResult<EvolutionChain> {
        let raw: RawEvolutionChain = self.get_json(&format!("evolution-chain/{id}"), &[]).await?;
        Ok(raw.into())
    }
}

// --- Wire format ---
// Only the fields the crate uses are declared; serde ignores the rest.

#[derive(Debug, Deserialize)]
struct RawName {
    name: String,
}

#[derive(Debug, Deserialize)]
struct RawUrl {
    url: String,
}

#[derive(Debug, Deserialize)]
struct RawTypeSlot {
    #[serde(rename = "type")]
    kind: RawName,
}

#[derive(Debug, Deserialize)]
struct RawStat {
    base_stat: u32,
    stat: RawName,
}

#[derive(Debug, Deserialize)]
struct RawMoveSlot {
    #[serde(rename = "move")]
    move_ref: RawName,
}

#[derive(Debug, Default, Deserialize)]
struct RawSprites {
    #[serde(default)]
    other: Option<RawOtherSprites>,
}

#[derive(Debug, Deserialize)]
struct RawOtherSprites {
    #[serde(rename = "official-artwork", default)]
    official_artwork: Option<RawArtwork>,
}

#[derive(Debug, Deserialize)]
struct RawArtwork {
    front_default: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawPokemon {
    id: u32,
    name: String,
    types: Vec<RawTypeSlot>,
    stats: Vec<RawStat>,
    #[serde(default)]
    moves: Vec<RawMoveSlot>,
    base_experience: Option<u32>,
    #[serde(default)]
    height: u32,
    #[serde(default)]
    weight: u32,
    #[serde(default)]
    sprites: RawSprites,
    species: Option<NamedRef>,
}

impl From<RawPokemon> for Creature {
    fn from(raw: RawPokemon) -> Self {
        let artwork_url = raw
            .sprites
            .other
            .and_then(|other| other.official_artwork)
            .and_then(|artwork| artwork.front_default);

        Creature {
            id: raw.id,
            name: raw.name,
            types: raw
                .types
                .into_iter()
                .map(|slot| PokemonType::from_name(&slot.kind.name))
                .collect(),
            stats: raw
                .stats
                .into_iter()
                .map(|stat| BaseStat {
                    name: stat.stat.name,
                    value: stat.base_stat,
                })
                .collect(),
            moves: raw.moves.into_iter().map(|slot| slot.move_ref.name).collect(),
            base_experience: raw.base_experience,
            height: raw.height,
            weight: raw.weight,
            artwork_url,
            species: raw.species,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawSpecies {
    id: u32,
    name: String,
    generation: RawName,
    color: RawName,
    habitat: Option<RawName>,
    capture_rate: u8,
    evolution_chain: Option<RawUrl>,
}

impl From<RawSpecies> for SpeciesInfo {
    fn from(raw: RawSpecies) -> Self {
        SpeciesInfo {
            id: raw.id,
            name: raw.name,
            generation: raw.generation.name,
            color: raw.color.name,
            habitat: raw.habitat.map(|habitat| habitat.name),
            capture_rate: raw.capture_rate,
            evolution_chain_url: raw.evolution_chain.map(|chain| chain.url),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawChainLink {
    species: RawName,
    #[serde(default)]
    evolves_to: Vec<RawChainLink>,
}

impl From<RawChainLink> for EvolutionNode {
    fn from(raw: RawChainLink) -> Self {
        EvolutionNode {
            species: raw.species.name,
            evolves_to: raw.evolves_to.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawEvolutionChain {
    id: u32,
    chain: RawChainLink,
}

impl From<RawEvolutionChain> for EvolutionChain {
    fn from(raw: RawEvolutionChain) -> Self {
        EvolutionChain {
            id: raw.id,
            root: raw.chain.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use schema::StatKind;

    const PIKACHU_JSON: &str = r#"{
        "id": 25,
        "name": "pikachu",
        "base_experience": 112,
        "height": 4,
        "weight": 60,
        "types": [{"slot": 1, "type": {"name": "electric", "url": "https://pokeapi.co/api/v2/type/13/"}}],
        "stats": [
            {"base_stat": 35, "effort": 0, "stat": {"name": "hp", "url": ""}},
            {"base_stat": 55, "effort": 0, "stat": {"name": "attack", "url": ""}},
            {"base_stat": 40, "effort": 0, "stat": {"name": "defense", "url": ""}},
            {"base_stat": 90, "effort": 2, "stat": {"name": "speed", "url": ""}}
        ],
        "moves": [
            {"move": {"name": "thunder-shock", "url": ""}, "version_group_details": []},
            {"move": {"name": "quick-attack", "url": ""}, "version_group_details": []}
        ],
        "sprites": {
            "front_default": "front.png",
            "other": {"official-artwork": {"front_default": "https://img/25.png"}}
        },
        "species": {"name": "pikachu", "url": "https://pokeapi.co/api/v2/pokemon-species/25/"}
    }"#;

    #[test]
    fn test_pokemon_payload_maps_to_creature() {
        let raw: RawPokemon = serde_json::from_str(PIKACHU_JSON).unwrap();
        let creature = Creature::from(raw);

        assert_eq!(creature.id, 25);
        assert_eq!(creature.types, vec![PokemonType::Electric]);
        assert_eq!(creature.stat(StatKind::Speed), Some(90));
        assert_eq!(creature.stat(StatKind::SpecialAttack), None);
        assert_eq!(creature.moves, vec!["thunder-shock", "quick-attack"]);
        assert_eq!(creature.artwork_url.as_deref(), Some("https://img/25.png"));
        assert_eq!(creature.species.and_then(|s| s.id()), Some(25));
    }

    #[test]
    fn test_unknown_type_name_maps_to_typeless() {
        let json = r#"{"id": 10001, "name": "oddity", "base_experience": null,
            "types": [{"type": {"name": "stellar"}}], "stats": [], "species": null}"#;
        let creature = Creature::from(serde_json::from_str::<RawPokemon>(json).unwrap());

        assert_eq!(creature.types, vec![PokemonType::Typeless]);
        assert!(creature.moves.is_empty());
        assert_eq!(creature.artwork_url, None);
    }

    #[test]
    fn test_listing_payload_ignores_paging_links() {
        let json = r#"{"count": 1302, "next": "https://pokeapi.co/api/v2/pokemon?offset=2&limit=2",
            "previous": null, "results": [
                {"name": "bulbasaur", "url": "https://pokeapi.co/api/v2/pokemon/1/"},
                {"name": "ivysaur", "url": "https://pokeapi.co/api/v2/pokemon/2/"}
            ]}"#;
        let listing: CreatureListing = serde_json::from_str(json).unwrap();

        assert_eq!(listing.count, 1302);
        assert_eq!(listing.results[1].id(), Some(2));
    }

    #[test]
    fn test_species_and_chain_payloads() {
        let species_json = r#"{"id": 133, "name": "eevee", "capture_rate": 45,
            "generation": {"name": "generation-i"}, "color": {"name": "brown"},
            "habitat": {"name": "urban"},
            "evolution_chain": {"url": "https://pokeapi.co/api/v2/evolution-chain/67/"}}"#;
        let species = SpeciesInfo::from(serde_json::from_str::<RawSpecies>(species_json).unwrap());
        assert_eq!(species.evolution_chain_id(), Some(67));
        assert_eq!(species.habitat.as_deref(), Some("urban"));

        let chain_json = r#"{"id": 67, "chain": {"species": {"name": "eevee"}, "evolves_to": [
            {"species": {"name": "vaporeon"}, "evolves_to": []},
            {"species": {"name": "jolteon"}, "evolves_to": []}
        ]}}"#;
        let chain =
            EvolutionChain::from(serde_json::from_str::<RawEvolutionChain>(chain_json).unwrap());
        assert_eq!(chain.stages(), vec![vec!["eevee"], vec!["vaporeon", "jolteon"]]);
    }

    #[test]
    fn test_client_trims_trailing_slash() {
        let client = PokeApiClient::new("https://pokeapi.co/api/v2/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url(), "https://pokeapi.co/api/v2");
    }
}
