use crate::errors::TeamError;
use chrono::{DateTime, Utc};
use schema::{Creature, PokemonType};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use uuid::Uuid;

pub const MAX_TEAM_SIZE: usize = 6;
pub const MAX_MOVES: usize = 4;

/// A creature placed in a team slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterMember {
    pub creature: Creature,
    /// At most [`MAX_MOVES`] entries.
    pub moves: Vec<String>,
    pub nickname: Option<String>,
}

impl RosterMember {
    /// Extra moves past [`MAX_MOVES`] are dropped.
    pub fn new(creature: Creature, mut moves: Vec<String>, nickname: Option<String>) -> Self {
        moves.truncate(MAX_MOVES);
        Self {
            creature,
            moves,
            nickname,
        }
    }

    /// Bind a creature with the first moves it knows and no nickname.
    pub fn with_default_moves(creature: Creature) -> Self {
        let moves = creature.moves.iter().take(MAX_MOVES).cloned().collect();
        Self::new(creature, moves, None)
    }

    pub fn set_moves(&mut self, mut moves: Vec<String>) {
        moves.truncate(MAX_MOVES);
        self.moves = moves;
    }

    /// Nickname if set and not blank, otherwise the creature's name.
    pub fn display_name(&self) -> &str {
        match self.nickname.as_deref().map(str::trim) {
            Some(nickname) if !nickname.is_empty() => nickname,
            _ => &self.creature.name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: Uuid,
    pub name: String,
    pub members: Vec<RosterMember>,
    pub created_at: DateTime<Utc>,
}

impl Team {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            members: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.members.len() >= MAX_TEAM_SIZE
    }

    pub fn member(&self, index: usize) -> Option<&RosterMember> {
        self.members.get(index)
    }

    pub fn add_member(&mut self, member: RosterMember) -> Result<(), TeamError> {
        if self.is_full() {
            return Err(TeamError::TeamFull { max: MAX_TEAM_SIZE });
        }
        self.members.push(member);
        Ok(())
    }

    pub fn remove_member(&mut self, index: usize) -> Result<RosterMember, TeamError> {
        if index >= self.members.len() {
            return Err(TeamError::NoSuchMember(index));
        }
        Ok(self.members.remove(index))
    }

    fn member_mut(&mut self, index: usize) -> Result<&mut RosterMember, TeamError> {
        self.members
            .get_mut(index)
            .ok_or(TeamError::NoSuchMember(index))
    }

    pub fn set_moves(&mut self, index: usize, moves: Vec<String>) -> Result<(), TeamError> {
        self.member_mut(index)?.set_moves(moves);
        Ok(())
    }

    pub fn set_nickname(&mut self, index: usize, nickname: Option<String>) -> Result<(), TeamError> {
        self.member_mut(index)?.nickname = nickname;
        Ok(())
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }
}

/// Types that hit a creature with these types for extra damage.
///
/// Starts from every type any of its types is weak to, then removes
/// anything one of its types resists or is immune to. Returned in chart
/// order.
pub fn type_weaknesses(types: &[PokemonType]) -> Vec<PokemonType> {
    let mut weak: BTreeSet<PokemonType> = BTreeSet::new();
    for pokemon_type in types {
        weak.extend(pokemon_type.defensive_profile().weak_to);
    }
    for pokemon_type in types {
        let profile = pokemon_type.defensive_profile();
        for covered in profile.resistant_to.iter().chain(profile.immune_to) {
            weak.remove(covered);
        }
    }
    weak.into_iter().collect()
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeamCoverage {
    /// Attacking type -> members weak to it.
    pub weaknesses: BTreeMap<PokemonType, u32>,
    /// Attacking type -> members resisting it.
    pub resistances: BTreeMap<PokemonType, u32>,
    /// Lower is better: total weaknesses minus half the total resistances.
    pub score: f64,
}

pub fn team_coverage(members: &[RosterMember]) -> TeamCoverage {
    let mut coverage = TeamCoverage::default();

    for member in members {
        for weakness in type_weaknesses(&member.creature.types) {
            *coverage.weaknesses.entry(weakness).or_insert(0) += 1;
        }
        for pokemon_type in &member.creature.types {
            for resisted in pokemon_type.defensive_profile().resistant_to {
                *coverage.resistances.entry(*resisted).or_insert(0) += 1;
            }
        }
    }

    let weak_total: u32 = coverage.weaknesses.values().sum();
    let resist_total: u32 = coverage.resistances.values().sum();
    coverage.score = weak_total as f64 - resist_total as f64 * 0.5;
    coverage
}
