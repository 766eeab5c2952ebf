use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Hash,
    Display,
    EnumString,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum PokemonType {
    Normal,
    Fire,
    Water,
    Electric,
    Grass,
    Ice,
    Fighting,
    Poison,
    Ground,
    Flying,
    Psychic,
    Bug,
    Rock,
    Ghost,
    Dragon,
    Dark,
    Steel,
    Fairy,
    /// Stand-in for upstream types the chart does not know about
    /// ("unknown", "shadow", "stellar"). Neutral in both directions.
    Typeless,
}

/// Offensive relationships of one attacking type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeMatchup {
    pub super_effective_against: &'static [PokemonType],
    pub not_very_effective_against: &'static [PokemonType],
    pub no_effect_against: &'static [PokemonType],
}

/// Defensive relationships of one defending type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefensiveProfile {
    pub weak_to: &'static [PokemonType],
    pub resistant_to: &'static [PokemonType],
    pub immune_to: &'static [PokemonType],
}

const NO_TYPES: &[PokemonType] = &[];

const fn attacks(
    super_effective_against: &'static [PokemonType],
    not_very_effective_against: &'static [PokemonType],
    no_effect_against: &'static [PokemonType],
) -> TypeMatchup {
    TypeMatchup {
        super_effective_against,
        not_very_effective_against,
        no_effect_against,
    }
}

const fn defends(
    weak_to: &'static [PokemonType],
    resistant_to: &'static [PokemonType],
    immune_to: &'static [PokemonType],
) -> DefensiveProfile {
    DefensiveProfile {
        weak_to,
        resistant_to,
        immune_to,
    }
}

impl PokemonType {
    /// Every charted type, in the order the type picker lists them.
    pub const ALL: [PokemonType; 18] = [
        PokemonType::Normal,
        PokemonType::Fire,
        PokemonType::Water,
        PokemonType::Electric,
        PokemonType::Grass,
        PokemonType::Ice,
        PokemonType::Fighting,
        PokemonType::Poison,
        PokemonType::Ground,
        PokemonType::Flying,
        PokemonType::Psychic,
        PokemonType::Bug,
        PokemonType::Rock,
        PokemonType::Ghost,
        PokemonType::Dragon,
        PokemonType::Dark,
        PokemonType::Steel,
        PokemonType::Fairy,
    ];

    /// Parse an upstream type name. Names outside the chart become `Typeless`.
    pub fn from_name(name: &str) -> PokemonType {
        name.parse().unwrap_or(PokemonType::Typeless)
    }

    pub fn name(self) -> &'static str {
        self.into()
    }

    /// The attacking side of the type chart.
    pub fn matchup(self) -> TypeMatchup {
        use PokemonType::*;

        match self {
            Normal => attacks(NO_TYPES, &[Rock, Steel], &[Ghost]),
            Fire => attacks(
                &[Grass, Ice, Bug, Steel],
                &[Fire, Water, Rock, Dragon],
                NO_TYPES,
            ),
            Water => attacks(&[Fire, Ground, Rock], &[Water, Grass, Dragon], NO_TYPES),
            Electric => attacks(&[Water, Flying], &[Electric, Grass, Dragon], &[Ground]),
            Grass => attacks(
                &[Water, Ground, Rock],
                &[Fire, Grass, Poison, Flying, Bug, Dragon, Steel],
                NO_TYPES,
            ),
            Ice => attacks(
                &[Grass, Ground, Flying, Dragon],
                &[Fire, Water, Ice, Steel],
                NO_TYPES,
            ),
            Fighting => attacks(
                &[Normal, Ice, Rock, Dark, Steel],
                &[Poison, Flying, Psychic, Bug, Fairy],
                &[Ghost],
            ),
            Poison => attacks(&[Grass, Fairy], &[Poison, Ground, Rock, Ghost], &[Steel]),
            Ground => attacks(
                &[Fire, Electric, Poison, Rock, Steel],
                &[Grass, Bug],
                &[Flying],
            ),
            Flying => attacks(&[Grass, Fighting, Bug], &[Electric, Rock, Steel], NO_TYPES),
            Psychic => attacks(&[Fighting, Poison], &[Psychic, Steel], &[Dark]),
            Bug => attacks(
                &[Grass, Psychic, Dark],
                &[Fire, Fighting, Poison, Flying, Ghost, Steel, Fairy],
                NO_TYPES,
            ),
            Rock => attacks(
                &[Fire, Ice, Flying, Bug],
                &[Fighting, Ground, Steel],
                NO_TYPES,
            ),
            Ghost => attacks(&[Psychic, Ghost], &[Dark], &[Normal]),
            Dragon => attacks(&[Dragon], &[Steel], &[Fairy]),
            Dark => attacks(&[Psychic, Ghost], &[Fighting, Dark, Fairy], NO_TYPES),
            Steel => attacks(&[Ice, Rock, Fairy], &[Fire, Water, Electric, Steel], NO_TYPES),
            Fairy => attacks(&[Fighting, Dragon, Dark], &[Fire, Poison, Steel], NO_TYPES),
            Typeless => attacks(NO_TYPES, NO_TYPES, NO_TYPES),
        }
    }

    /// The defending side of the type chart, used for weakness summaries.
    pub fn defensive_profile(self) -> DefensiveProfile {
        use PokemonType::*;

        match self {
            Normal => defends(&[Fighting], NO_TYPES, &[Ghost]),
            Fire => defends(
                &[Water, Ground, Rock],
                &[Fire, Grass, Ice, Bug, Steel, Fairy],
                NO_TYPES,
            ),
            Water => defends(&[Electric, Grass], &[Fire, Water, Ice, Steel], NO_TYPES),
            Electric => defends(&[Ground], &[Electric, Flying, Steel], NO_TYPES),
            Grass => defends(
                &[Fire, Ice, Poison, Flying, Bug],
                &[Water, Electric, Grass, Ground],
                NO_TYPES,
            ),
            Ice => defends(&[Fire, Fighting, Rock, Steel], &[Ice], NO_TYPES),
            Fighting => defends(&[Flying, Psychic, Fairy], &[Bug, Rock, Dark], NO_TYPES),
            Poison => defends(
                &[Ground, Psychic],
                &[Grass, Fighting, Poison, Bug, Fairy],
                NO_TYPES,
            ),
            Ground => defends(&[Water, Grass, Ice], &[Poison, Rock], &[Electric]),
            Flying => defends(&[Electric, Ice, Rock], &[Grass, Fighting, Bug], &[Ground]),
            Psychic => defends(&[Bug, Ghost, Dark], &[Fighting, Psychic], NO_TYPES),
            Bug => defends(&[Fire, Flying, Rock], &[Grass, Fighting, Ground], NO_TYPES),
            Rock => defends(
                &[Water, Grass, Fighting, Ground, Steel],
                &[Normal, Fire, Poison, Flying],
                NO_TYPES,
            ),
            Ghost => defends(&[Ghost, Dark], &[Poison, Bug], &[Normal, Fighting]),
            Dragon => defends(
                &[Ice, Dragon, Fairy],
                &[Fire, Water, Electric, Grass],
                NO_TYPES,
            ),
            Dark => defends(&[Fighting, Bug, Fairy], &[Ghost, Dark], &[Psychic]),
            Steel => defends(
                &[Fire, Fighting, Ground],
                &[
                    Normal, Grass, Ice, Flying, Psychic, Bug, Rock, Dragon, Steel, Fairy,
                ],
                &[Poison],
            ),
            Fairy => defends(&[Poison, Steel], &[Fighting, Bug, Dark], &[Dragon]),
            Typeless => defends(NO_TYPES, NO_TYPES, NO_TYPES),
        }
    }

    /// Calculate type effectiveness multiplier for attacking type vs defending type
    /// Returns: 2.0 = Super Effective, 1.0 = Normal, 0.5 = Not Very Effective, 0.0 = No Effect
    pub fn type_effectiveness(attacking: PokemonType, defending: PokemonType) -> f64 {
        let chart = attacking.matchup();

        if chart.super_effective_against.contains(&defending) {
            2.0
        } else if chart.not_very_effective_against.contains(&defending) {
            0.5
        } else if chart.no_effect_against.contains(&defending) {
            0.0
        } else {
            1.0
        }
    }

    /// Multiplier against a (possibly dual-typed) defender; per-type
    /// multipliers compound.
    pub fn effectiveness_against(attacking: PokemonType, defending: &[PokemonType]) -> f64 {
        defending
            .iter()
            .map(|defending| Self::type_effectiveness(attacking, *defending))
            .product()
    }
}
