use crate::teams::RosterMember;
use schema::{Creature, PokemonType, StatKind};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Move used by a combatant that knows none.
pub const DEFAULT_MOVE: &str = "tackle";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    First,
    Second,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::First => Side::Second,
            Side::Second => Side::First,
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Side::First => 0,
            Side::Second => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrawReason {
    /// Both combatants were already down before the first turn.
    BothFainted,
    TurnLimit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleOutcome {
    Win(Side),
    Draw(DrawReason),
}

impl BattleOutcome {
    pub fn winner(self) -> Option<Side> {
        match self {
            BattleOutcome::Win(side) => Some(side),
            BattleOutcome::Draw(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattlePhase {
    NotStarted,
    InProgress,
    Concluded(BattleOutcome),
}

/// The four stats a battle reads. Missing stats fall back to
/// 100 HP and 50 for everything else; a stat reported as zero stays zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleStats {
    pub hp: u32,
    pub attack: u32,
    pub defense: u32,
    pub speed: u32,
}

impl BattleStats {
    pub const DEFAULT_HP: u32 = 100;
    pub const DEFAULT_STAT: u32 = 50;

    pub fn from_creature(creature: &Creature) -> Self {
        let stat = |kind, default| creature.stat(kind).unwrap_or(default);
        Self {
            hp: stat(StatKind::Hp, Self::DEFAULT_HP),
            attack: stat(StatKind::Attack, Self::DEFAULT_STAT),
            defense: stat(StatKind::Defense, Self::DEFAULT_STAT),
            speed: stat(StatKind::Speed, Self::DEFAULT_STAT),
        }
    }
}

/// One side's working snapshot.
#[derive(Debug, Clone)]
pub struct Combatant<'a> {
    pub member: &'a RosterMember,
    pub stats: BattleStats,
    /// Can go below zero on the final hit.
    pub current_hp: i64,
}

impl<'a> Combatant<'a> {
    pub fn new(member: &'a RosterMember) -> Self {
        let stats = BattleStats::from_creature(&member.creature);
        Self {
            member,
            stats,
            current_hp: stats.hp as i64,
        }
    }

    pub fn name(&self) -> &'a str {
        self.member.display_name()
    }

    pub fn max_hp(&self) -> u32 {
        self.stats.hp
    }

    pub fn types(&self) -> &'a [PokemonType] {
        &self.member.creature.types
    }

    /// Every move takes the combatant's primary type.
    pub fn move_type(&self) -> PokemonType {
        self.member.creature.primary_type()
    }

    pub fn is_fainted(&self) -> bool {
        self.current_hp <= 0
    }

    /// Apply damage and report whether this knocked the combatant out.
    pub fn take_damage(&mut self, damage: u32) -> bool {
        self.current_hp -= damage as i64;
        self.is_fainted()
    }
}

/// Everything that happens during a battle, in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BattleEvent {
    BattleStarted {
        first: String,
        second: String,
    },
    StartingHp {
        name: String,
        hp: i64,
    },
    Divider,
    TurnStarted {
        turn_number: u32,
    },
    MoveUsed {
        side: Side,
        attacker: String,
        move_name: String,
    },
    TypeEffectiveness {
        multiplier: f64,
    },
    DamageDealt {
        target_side: Side,
        target: String,
        damage: u32,
        remaining_hp: i64,
    },
    PokemonFainted {
        side: Side,
        name: String,
    },
    HpSummary {
        name: String,
        hp: i64,
        max_hp: u32,
    },
    BattleEnded {
        outcome: BattleOutcome,
        winner_name: Option<String>,
    },
}

impl BattleEvent {
    /// The narration line for this event, if it has one.
    pub fn format(&self) -> Option<String> {
        match self {
            BattleEvent::BattleStarted { first, second } => Some(format!("{first} vs {second}!")),
            BattleEvent::StartingHp { name, hp } => Some(format!("{name}: {hp} HP")),
            BattleEvent::Divider => Some("---".to_string()),
            BattleEvent::TurnStarted { turn_number } => Some(format!("Turn {turn_number}:")),
            BattleEvent::MoveUsed {
                attacker,
                move_name,
                ..
            } => Some(format!("{attacker} used {move_name}!")),
            BattleEvent::TypeEffectiveness { multiplier } => {
                effectiveness_message(*multiplier).map(str::to_string)
            }
            BattleEvent::DamageDealt { target, damage, .. } => {
                Some(format!("{target} took {damage} damage!"))
            }
            BattleEvent::PokemonFainted { name, .. } => Some(format!("{name} fainted!")),
            BattleEvent::HpSummary { name, hp, max_hp } => {
                Some(format!("{name}: {}/{max_hp} HP", (*hp).max(0)))
            }
            BattleEvent::BattleEnded {
                outcome,
                winner_name,
            } => Some(match (outcome, winner_name) {
                (BattleOutcome::Win(_), Some(name)) => format!("{name} wins!"),
                (BattleOutcome::Win(side), None) => format!("{side:?} side wins!"),
                (BattleOutcome::Draw(DrawReason::BothFainted), _) => "It's a tie!".to_string(),
                (BattleOutcome::Draw(DrawReason::TurnLimit), _) => {
                    "Battle ended in a draw (turn limit reached)!".to_string()
                }
            }),
        }
    }
}

/// `None` for neutral hits.
pub fn effectiveness_message(multiplier: f64) -> Option<&'static str> {
    if multiplier > 1.0 {
        Some("It's super effective!")
    } else if multiplier == 0.0 {
        Some("It has no effect!")
    } else if multiplier < 1.0 {
        Some("It's not very effective...")
    } else {
        None
    }
}

/// The finished battle.
#[derive(Debug, Clone, PartialEq)]
pub struct BattleReport {
    pub outcome: BattleOutcome,
    pub winner: Option<Side>,
    /// Turns actually played, counting the turn that ended the battle. A
    /// knockout on the first turn reports 1; a side that starts the battle
    /// already fainted reports 0.
    pub total_turns: u32,
    /// Remaining HP per side, first side first. May be negative.
    pub final_hp: [i64; 2],
    pub events: Vec<BattleEvent>,
    /// Narration lines, in the order they were produced.
    pub log: Vec<String>,
}

impl BattleReport {
    /// Print all events in debug format with a custom prefix message.
    pub fn print_debug_with_message(&self, message: &str) {
        println!("{}", message);
        for event in &self.events {
            println!("  {:?}", event);
        }
    }
}

impl fmt::Display for BattleReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.log {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
