use crate::battle::state::{BattleStats, DEFAULT_MOVE};
use crate::config::BattleConfig;
use crate::teams::RosterMember;
use rand::Rng;
use schema::PokemonType;
use std::ops::Range;

/// Random damage spread, applied to the base damage.
pub const VARIANCE_RANGE: Range<f64> = 0.85..1.0;

/// Fixed inputs to the damage formula and the battle length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BattleRules {
    pub level: u32,
    pub power: u32,
    pub max_turns: u32,
}

impl Default for BattleRules {
    fn default() -> Self {
        Self {
            level: 50,
            power: 80,
            max_turns: 20,
        }
    }
}

impl From<&BattleConfig> for BattleRules {
    fn from(config: &BattleConfig) -> Self {
        Self {
            level: config.level,
            power: config.power,
            max_turns: config.max_turns,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageResult {
    pub damage: u32,
    pub effectiveness: f64,
}

/// Damage before type effectiveness.
///
/// `floor(((2 * level / 5 + 2) * power * attack / defense / 50 + 2) * variance)`.
/// Defense is treated as at least 1.
pub fn base_damage(rules: &BattleRules, attack: u32, defense: u32, variance: f64) -> u32 {
    let level_factor = 2.0 * rules.level as f64 / 5.0 + 2.0;
    let defense = defense.max(1) as f64;
    let raw = level_factor * rules.power as f64 * attack as f64 / defense / 50.0 + 2.0;
    (raw * variance).floor() as u32
}

/// Full damage for one hit: never below 1, even against an immune defender.
pub fn calculate_damage(
    rules: &BattleRules,
    attacker: &BattleStats,
    defender: &BattleStats,
    defender_types: &[PokemonType],
    move_type: PokemonType,
    variance: f64,
) -> DamageResult {
    let base = base_damage(rules, attacker.attack, defender.defense, variance);
    let effectiveness = PokemonType::effectiveness_against(move_type, defender_types);
    let damage = ((base as f64 * effectiveness).floor() as u32).max(1);

    DamageResult {
        damage,
        effectiveness,
    }
}

pub fn roll_variance<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.random_range(VARIANCE_RANGE)
}

/// Pick one of the member's moves uniformly, or [`DEFAULT_MOVE`].
pub fn choose_move<'m, R: Rng + ?Sized>(member: &'m RosterMember, rng: &mut R) -> &'m str {
    if member.moves.is_empty() {
        return DEFAULT_MOVE;
    }
    &member.moves[rng.random_range(0..member.moves.len())]
}
