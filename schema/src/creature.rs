use crate::PokemonType;
use serde::{Deserialize, Serialize};
use strum::{EnumString, IntoStaticStr};

/// The six base stats the upstream database reports for every creature.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    IntoStaticStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum StatKind {
    Hp,
    Attack,
    Defense,
    SpecialAttack,
    SpecialDefense,
    Speed,
}

impl StatKind {
    pub const ALL: [StatKind; 6] = [
        StatKind::Hp,
        StatKind::Attack,
        StatKind::Defense,
        StatKind::SpecialAttack,
        StatKind::SpecialDefense,
        StatKind::Speed,
    ];

    /// Name used by the upstream API (`special-attack`, ...).
    pub fn api_name(self) -> &'static str {
        self.into()
    }

    pub fn display_name(self) -> &'static str {
        match self {
            StatKind::Hp => "HP",
            StatKind::Attack => "Attack",
            StatKind::Defense => "Defense",
            StatKind::SpecialAttack => "Sp. Attack",
            StatKind::SpecialDefense => "Sp. Defense",
            StatKind::Speed => "Speed",
        }
    }

    /// Lowest and highest base value any known creature has for this stat.
    /// Stat sliders are bounded by these.
    pub fn range(self) -> (u32, u32) {
        match self {
            StatKind::Hp => (1, 255),
            StatKind::Attack => (1, 190),
            StatKind::Defense => (1, 230),
            StatKind::SpecialAttack => (1, 194),
            StatKind::SpecialDefense => (1, 230),
            StatKind::Speed => (1, 180),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseStat {
    pub name: String,
    pub value: u32,
}

/// A `{name, url}` reference as the upstream API hands them out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedRef {
    pub name: String,
    pub url: String,
}

impl NamedRef {
    pub fn id(&self) -> Option<u32> {
        resource_id(&self.url)
    }
}

/// Extract the trailing numeric id from a resource URL such as
/// `https://pokeapi.co/api/v2/pokemon/25/`.
pub fn resource_id(url: &str) -> Option<u32> {
    url.strip_suffix('/')?.rsplit('/').next()?.parse().ok()
}

/// One page of the upstream name index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatureListing {
    pub count: u32,
    pub results: Vec<NamedRef>,
}

/// An immutable creature record as fetched from upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Creature {
    pub id: u32,
    pub name: String,
    /// One or two elemental types, primary first.
    pub types: Vec<PokemonType>,
    /// Base stats in upstream order.
    pub stats: Vec<BaseStat>,
    /// Every move this creature can know, by upstream name.
    pub moves: Vec<String>,
    pub base_experience: Option<u32>,
    pub height: u32,
    pub weight: u32,
    pub artwork_url: Option<String>,
    pub species: Option<NamedRef>,
}

impl Creature {
    pub fn stat(&self, kind: StatKind) -> Option<u32> {
        self.stats
            .iter()
            .find(|stat| stat.name == kind.api_name())
            .map(|stat| stat.value)
    }

    /// Sum of every listed base stat.
    pub fn total_stats(&self) -> u32 {
        self.stats.iter().map(|stat| stat.value).sum()
    }

    /// The type its attacks take. Falls back to Normal for untyped records.
    pub fn primary_type(&self) -> PokemonType {
        self.types.first().copied().unwrap_or(PokemonType::Normal)
    }

    pub fn has_any_type(&self, wanted: &[PokemonType]) -> bool {
        self.types.iter().any(|t| wanted.contains(t))
    }

    pub fn generation(&self) -> u8 {
        generation_for_id(self.id)
    }
}

impl AsRef<Creature> for Creature {
    fn as_ref(&self) -> &Creature {
        self
    }
}

/// National dex id ranges per generation.
pub fn generation_for_id(id: u32) -> u8 {
    match id {
        0..=151 => 1,
        152..=251 => 2,
        252..=386 => 3,
        387..=493 => 4,
        494..=649 => 5,
        650..=721 => 6,
        722..=809 => 7,
        810..=905 => 8,
        _ => 9,
    }
}
