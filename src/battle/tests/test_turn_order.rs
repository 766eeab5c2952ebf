#[cfg(test)]
mod tests {
    use crate::battle::engine::simulate;
    use crate::battle::state::{BattleEvent, BattleOutcome, Side};
    use crate::battle::tests::common::{default_rules, glass_cannon, seeded_rng, wall};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn first_mover(events: &[BattleEvent]) -> Option<Side> {
        events.iter().find_map(|event| match event {
            BattleEvent::MoveUsed { side, .. } => Some(*side),
            _ => None,
        })
    }

    #[test]
    fn test_faster_second_side_strikes_first() {
        // Arrange
        let slow = glass_cannon(1, "slowpoke", 15);
        let fast = glass_cannon(2, "jolteon", 130);

        // Act
        let report = simulate(&slow, &fast, default_rules(), seeded_rng(21));

        // Assert
        assert_eq!(first_mover(&report.events), Some(Side::Second));
        assert_eq!(report.outcome, BattleOutcome::Win(Side::Second));
        assert_eq!(report.log[5], "jolteon used tackle!");
        assert_eq!(report.log.last().map(String::as_str), Some("jolteon wins!"));
        assert_eq!(report.final_hp[1], 10);
    }

    #[rstest]
    #[case(50, 50, Side::First)]
    #[case(90, 10, Side::First)]
    #[case(10, 90, Side::Second)]
    fn test_speed_decides_who_acts_first(
        #[case] first_speed: u32,
        #[case] second_speed: u32,
        #[case] expected: Side,
    ) {
        let first = glass_cannon(1, "a", first_speed);
        let second = glass_cannon(2, "b", second_speed);

        let report = simulate(&first, &second, default_rules(), seeded_rng(22));

        assert_eq!(first_mover(&report.events), Some(expected));
        assert_eq!(report.winner, Some(expected));
    }

    #[test]
    fn test_order_holds_every_turn() {
        let report = simulate(&wall(1, "a"), &wall(2, "b"), default_rules(), seeded_rng(23));

        let movers: Vec<Side> = report
            .events
            .iter()
            .filter_map(|event| match event {
                BattleEvent::MoveUsed { side, .. } => Some(*side),
                _ => None,
            })
            .collect();

        assert_eq!(movers.len(), 40);
        for pair in movers.chunks(2) {
            assert_eq!(pair, [Side::First, Side::Second]);
        }
    }
}
