use crate::battle::calculators::BattleRules;
use crate::teams::RosterMember;
use rand::rngs::StdRng;
use rand::SeedableRng;
use schema::{PokemonType, StatKind};

pub use crate::test_support::TestCreatureBuilder;

/// A builder for roster members with explicit battle stats.
///
/// # Example
/// ```ignore
/// let pikachu = TestMemberBuilder::new(25, "pikachu")
///     .with_types(&[PokemonType::Electric])
///     .with_battle_stats(35, 55, 40, 90)
///     .with_moves(&["thunder-shock"])
///     .build();
/// ```
pub struct TestMemberBuilder {
    creature: TestCreatureBuilder,
    moves: Vec<String>,
    nickname: Option<String>,
}

impl TestMemberBuilder {
    pub fn new(id: u32, name: &str) -> Self {
        Self {
            creature: TestCreatureBuilder::new(id, name),
            moves: Vec::new(),
            nickname: None,
        }
    }

    pub fn with_types(mut self, types: &[PokemonType]) -> Self {
        self.creature = self.creature.with_types(types);
        self
    }

    /// Sets hp, attack, defense and speed.
    pub fn with_battle_stats(mut self, hp: u32, attack: u32, defense: u32, speed: u32) -> Self {
        self.creature = self
            .creature
            .with_stat(StatKind::Hp, hp)
            .with_stat(StatKind::Attack, attack)
            .with_stat(StatKind::Defense, defense)
            .with_stat(StatKind::Speed, speed);
        self
    }

    pub fn without_stat(mut self, kind: StatKind) -> Self {
        self.creature = self.creature.without_stat(kind);
        self
    }

    pub fn with_moves(mut self, moves: &[&str]) -> Self {
        self.moves = moves.iter().map(|m| m.to_string()).collect();
        self
    }

    pub fn with_nickname(mut self, nickname: &str) -> Self {
        self.nickname = Some(nickname.to_string());
        self
    }

    pub fn build(self) -> RosterMember {
        RosterMember::new(self.creature.build(), self.moves, self.nickname)
    }
}

/// Hits hard enough to knock out anything with low HP in one blow.
pub fn glass_cannon(id: u32, name: &str, speed: u32) -> RosterMember {
    TestMemberBuilder::new(id, name)
        .with_battle_stats(10, 200, 10, speed)
        .build()
}

/// Can neither deal nor take meaningful damage within the turn limit.
pub fn wall(id: u32, name: &str) -> RosterMember {
    TestMemberBuilder::new(id, name)
        .with_battle_stats(255, 1, 255, 50)
        .build()
}

pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

pub fn default_rules() -> BattleRules {
    BattleRules::default()
}
