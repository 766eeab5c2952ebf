#[cfg(test)]
mod tests {
    use crate::battle::engine::run_battle;
    use crate::battle::state::{BattleOutcome, Side};
    use crate::battle::tests::common::{glass_cannon, seeded_rng, TestMemberBuilder};
    use crate::config::BattleConfig;
    use crate::notify::{NoticeLevel, Notifier};
    use pretty_assertions::assert_eq;
    use std::time::Duration;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn test_run_battle_waits_then_reports() {
        // Arrange
        let first = glass_cannon(6, "charizard", 100);
        let second = glass_cannon(9, "blastoise", 78);
        let config = BattleConfig::default();
        let (notifier, mut notices) = Notifier::channel();
        let mut streamed = Vec::new();
        let started = Instant::now();

        // Act
        let report = run_battle(&first, &second, &config, seeded_rng(41), &notifier, |line| {
            streamed.push(line.to_string())
        })
        .await;

        // Assert
        assert!(started.elapsed() >= Duration::from_millis(100));
        assert_eq!(report.outcome, BattleOutcome::Win(Side::First));
        assert_eq!(streamed, report.log);

        let notice = notices.try_recv().expect("a completion notice");
        assert_eq!(notice.level, NoticeLevel::Success);
        assert_eq!(notice.title, "Battle Complete");
        assert_eq!(notice.message, "charizard wins!");
        assert!(notices.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_battle_uses_configured_rules() {
        let first = TestMemberBuilder::new(1, "a").with_battle_stats(100, 50, 50, 50).build();
        let second = TestMemberBuilder::new(2, "b").with_battle_stats(100, 50, 50, 40).build();
        let config = BattleConfig {
            power: 1,
            max_turns: 2,
            start_delay_ms: 0,
            ..BattleConfig::default()
        };

        let report = run_battle(&first, &second, &config, seeded_rng(42), &Notifier::disabled(), |_| {}).await;

        // Power 1 lands about two points a hit.
        assert_eq!(report.total_turns, 2);
        assert_eq!(
            report.log.last().map(String::as_str),
            Some("Battle ended in a draw (turn limit reached)!")
        );
    }
}
