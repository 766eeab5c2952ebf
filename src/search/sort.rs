use schema::Creature;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use strum::{Display, EnumString};

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SortBy {
    #[default]
    Id,
    Name,
    Stats,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn toggled(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}

fn compare(a: &Creature, b: &Creature, by: SortBy) -> Ordering {
    match by {
        SortBy::Id => a.id.cmp(&b.id),
        SortBy::Name => a.name.cmp(&b.name),
        SortBy::Stats => a.total_stats().cmp(&b.total_stats()),
    }
}

/// Stable in both directions: equal elements keep their input order even
/// when sorting descending.
pub fn sort_creatures<C: AsRef<Creature>>(items: &mut [C], by: SortBy, order: SortOrder) {
    items.sort_by(|a, b| {
        let ordering = compare(a.as_ref(), b.as_ref(), by);
        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
}

pub fn sorted<C: AsRef<Creature> + Clone>(items: &[C], by: SortBy, order: SortOrder) -> Vec<C> {
    let mut items = items.to_vec();
    sort_creatures(&mut items, by, order);
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TestCreatureBuilder;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use schema::StatKind;
    use std::sync::Arc;

    fn creature(id: u32, name: &str, attack: u32) -> Arc<Creature> {
        Arc::new(
            TestCreatureBuilder::new(id, name)
                .with_stat(StatKind::Attack, attack)
                .build(),
        )
    }

    fn roster() -> Vec<Arc<Creature>> {
        vec![
            creature(6, "charizard", 84),
            creature(1, "bulbasaur", 49),
            creature(25, "pikachu", 55),
            creature(4, "charmander", 52),
        ]
    }

    fn ids(items: &[Arc<Creature>]) -> Vec<u32> {
        items.iter().map(|c| c.id).collect()
    }

    #[rstest]
    #[case(SortBy::Id, SortOrder::Asc, vec![1, 4, 6, 25])]
    #[case(SortBy::Id, SortOrder::Desc, vec![25, 6, 4, 1])]
    #[case(SortBy::Name, SortOrder::Asc, vec![1, 6, 4, 25])]
    #[case(SortBy::Stats, SortOrder::Desc, vec![6, 25, 4, 1])]
    fn test_sort_orders(#[case] by: SortBy, #[case] order: SortOrder, #[case] expected: Vec<u32>) {
        assert_eq!(ids(&sorted(&roster(), by, order)), expected);
    }

    #[rstest]
    #[case(SortOrder::Asc)]
    #[case(SortOrder::Desc)]
    fn test_equal_keys_keep_input_order(#[case] order: SortOrder) {
        let items = vec![
            creature(10, "a", 60),
            creature(3, "b", 60),
            creature(7, "c", 60),
        ];

        let once = sorted(&items, SortBy::Stats, order);
        let twice = sorted(&once, SortBy::Stats, order);

        assert_eq!(ids(&once), vec![10, 3, 7]);
        assert_eq!(ids(&twice), vec![10, 3, 7]);
    }

    #[test]
    fn test_sorts_plain_creatures_in_place() {
        let mut items: Vec<Creature> = roster().iter().map(|c| (**c).clone()).collect();
        sort_creatures(&mut items, SortBy::Name, SortOrder::Desc);
        assert_eq!(items[0].name, "pikachu");
    }

    #[test]
    fn test_order_toggle_and_parsing() {
        assert_eq!(SortOrder::Asc.toggled(), SortOrder::Desc);
        assert_eq!("STATS".parse::<SortBy>().ok(), Some(SortBy::Stats));
        assert_eq!(SortBy::Name.to_string(), "name");
    }
}
