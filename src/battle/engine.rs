//! Turn-based one-on-one battle.
//!
//! [`BattleSim`] produces the battle as a lazy sequence of [`BattleEvent`]s,
//! one step (intro, a single turn, or the conclusion) at a time. [`simulate`]
//! drives it to the end and collects a [`BattleReport`]; [`run_battle`] is
//! the async entry point used by front ends.

use crate::battle::calculators::{calculate_damage, choose_move, roll_variance, BattleRules};
use crate::battle::state::{
    BattleEvent, BattleOutcome, BattlePhase, BattleReport, Combatant, DrawReason, Side,
};
use crate::config::BattleConfig;
use crate::notify::Notifier;
use crate::teams::RosterMember;
use rand::Rng;
use std::collections::VecDeque;
use tracing::{debug, info};

pub struct BattleSim<'a, R: Rng> {
    combatants: [Combatant<'a>; 2],
    rules: BattleRules,
    rng: R,
    phase: BattlePhase,
    turn: u32,
    pending: VecDeque<BattleEvent>,
}

impl<'a, R: Rng> BattleSim<'a, R> {
    pub fn new(first: &'a RosterMember, second: &'a RosterMember, rules: BattleRules, rng: R) -> Self {
        Self {
            combatants: [Combatant::new(first), Combatant::new(second)],
            rules,
            rng,
            phase: BattlePhase::NotStarted,
            turn: 0,
            pending: VecDeque::new(),
        }
    }

    pub fn phase(&self) -> BattlePhase {
        self.phase
    }

    pub fn turns_played(&self) -> u32 {
        self.turn
    }

    pub fn combatant(&self, side: Side) -> &Combatant<'a> {
        &self.combatants[side.index()]
    }

    /// Narration lines only.
    pub fn lines(self) -> impl Iterator<Item = String> + 'a
    where
        R: 'a,
    {
        self.filter_map(|event| event.format())
    }

    fn advance(&mut self) {
        match self.phase {
            BattlePhase::NotStarted => self.start(),
            BattlePhase::InProgress => {
                let both_standing = self.combatants.iter().all(|c| !c.is_fainted());
                if both_standing && self.turn < self.rules.max_turns {
                    self.play_turn();
                } else {
                    self.conclude();
                }
            }
            BattlePhase::Concluded(_) => {}
        }
    }

    fn start(&mut self) {
        let [first, second] = &self.combatants;
        debug!(first = first.name(), second = second.name(), "battle starting");

        self.pending.push_back(BattleEvent::BattleStarted {
            first: first.name().to_string(),
            second: second.name().to_string(),
        });
        for combatant in &self.combatants {
            self.pending.push_back(BattleEvent::StartingHp {
                name: combatant.name().to_string(),
                hp: combatant.current_hp,
            });
        }
        self.pending.push_back(BattleEvent::Divider);
        self.phase = BattlePhase::InProgress;
    }

    /// Faster side strikes first, ties go to the first side. A knockout ends
    /// the turn on the spot.
    fn play_turn(&mut self) {
        self.turn += 1;
        self.pending.push_back(BattleEvent::TurnStarted {
            turn_number: self.turn,
        });

        let (leader, follower) =
            if self.combatants[0].stats.speed >= self.combatants[1].stats.speed {
                (Side::First, Side::Second)
            } else {
                (Side::Second, Side::First)
            };

        if self.strike(leader, follower) || self.strike(follower, leader) {
            return;
        }

        for combatant in &self.combatants {
            self.pending.push_back(BattleEvent::HpSummary {
                name: combatant.name().to_string(),
                hp: combatant.current_hp,
                max_hp: combatant.max_hp(),
            });
        }
        self.pending.push_back(BattleEvent::Divider);
    }

    /// One attack. Returns true if the defender fainted.
    fn strike(&mut self, attacker: Side, defender: Side) -> bool {
        let member = self.combatants[attacker.index()].member;
        let move_name = choose_move(member, &mut self.rng).to_string();
        let variance = roll_variance(&mut self.rng);

        let attacking = &self.combatants[attacker.index()];
        let defending = &self.combatants[defender.index()];
        let result = calculate_damage(
            &self.rules,
            &attacking.stats,
            &defending.stats,
            defending.types(),
            attacking.move_type(),
            variance,
        );

        self.pending.push_back(BattleEvent::MoveUsed {
            side: attacker,
            attacker: attacking.name().to_string(),
            move_name,
        });
        self.pending.push_back(BattleEvent::TypeEffectiveness {
            multiplier: result.effectiveness,
        });

        let defending = &mut self.combatants[defender.index()];
        let fainted = defending.take_damage(result.damage);
        self.pending.push_back(BattleEvent::DamageDealt {
            target_side: defender,
            target: defending.name().to_string(),
            damage: result.damage,
            remaining_hp: defending.current_hp,
        });

        if fainted {
            self.pending.push_back(BattleEvent::PokemonFainted {
                side: defender,
                name: defending.name().to_string(),
            });
        }
        fainted
    }

    fn conclude(&mut self) {
        let [first, second] = &self.combatants;
        let outcome = match (first.is_fainted(), second.is_fainted()) {
            (true, true) => BattleOutcome::Draw(DrawReason::BothFainted),
            (true, false) => BattleOutcome::Win(Side::Second),
            (false, true) => BattleOutcome::Win(Side::First),
            (false, false) => BattleOutcome::Draw(DrawReason::TurnLimit),
        };
        let winner_name = outcome
            .winner()
            .map(|side| self.combatants[side.index()].name().to_string());

        self.pending.push_back(BattleEvent::BattleEnded {
            outcome,
            winner_name,
        });
        self.phase = BattlePhase::Concluded(outcome);
    }

    /// Run to the end, calling `observer` with each narration line as it is
    /// produced.
    pub fn run<F: FnMut(&str)>(mut self, mut observer: F) -> BattleReport {
        let mut events = Vec::new();
        let mut log = Vec::new();

        for event in self.by_ref() {
            if let Some(line) = event.format() {
                observer(&line);
                log.push(line);
            }
            events.push(event);
        }

        let BattlePhase::Concluded(outcome) = self.phase else {
            unreachable!("battle events ran out before the battle concluded");
        };

        BattleReport {
            outcome,
            winner: outcome.winner(),
            total_turns: self.turn,
            final_hp: [self.combatants[0].current_hp, self.combatants[1].current_hp],
            events,
            log,
        }
    }
}

impl<R: Rng> Iterator for BattleSim<'_, R> {
    type Item = BattleEvent;

    fn next(&mut self) -> Option<BattleEvent> {
        loop {
            if let Some(event) = self.pending.pop_front() {
                return Some(event);
            }
            if matches!(self.phase, BattlePhase::Concluded(_)) {
                return None;
            }
            self.advance();
        }
    }
}

pub fn simulate<R: Rng>(
    first: &RosterMember,
    second: &RosterMember,
    rules: BattleRules,
    rng: R,
) -> BattleReport {
    BattleSim::new(first, second, rules, rng).run(|_| {})
}

pub fn simulate_with_observer<R: Rng, F: FnMut(&str)>(
    first: &RosterMember,
    second: &RosterMember,
    rules: BattleRules,
    rng: R,
    observer: F,
) -> BattleReport {
    BattleSim::new(first, second, rules, rng).run(observer)
}

/// Wait the configured start delay, simulate, then post the result.
pub async fn run_battle<R: Rng, F: FnMut(&str)>(
    first: &RosterMember,
    second: &RosterMember,
    config: &BattleConfig,
    rng: R,
    notifier: &Notifier,
    observer: F,
) -> BattleReport {
    tokio::time::sleep(config.start_delay()).await;

    info!(
        first = first.display_name(),
        second = second.display_name(),
        "battle started"
    );
    let report = simulate_with_observer(first, second, BattleRules::from(config), rng, observer);

    let summary = report
        .log
        .last()
        .cloned()
        .unwrap_or_else(|| "Battle finished".to_string());
    info!(outcome = ?report.outcome, turns = report.total_turns, "battle finished");
    notifier.success("Battle Complete", summary);

    report
}
