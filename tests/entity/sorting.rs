//! Integration tests for sorted collections

use collate_entity::{EntityAdapter, EntityState, Update};
use proptest::prelude::*;

#[derive(Clone, Debug)]
struct Score {
    player: u16,
    points: u32,
}

fn adapter() -> EntityAdapter<u16, Score> {
    EntityAdapter::new(|s: &Score| s.player)
        .with_sort_comparer(|a: &Score, b: &Score| b.points.cmp(&a.points))
}

fn players(state: &EntityState<u16, Score>) -> Vec<u16> {
    state.ids().to_vec()
}

#[test]
fn sorted_by_descending_points() {
    let a = adapter();
    let state = a.get_initial_state_with([
        Score { player: 1, points: 10 },
        Score { player: 2, points: 30 },
        Score { player: 3, points: 20 },
    ]);
    assert_eq!(players(&state), vec![2, 3, 1]);
}

#[test]
fn update_moves_entity_to_new_rank() {
    let a = adapter();
    let state = a.get_initial_state_with([
        Score { player: 1, points: 10 },
        Score { player: 2, points: 30 },
        Score { player: 3, points: 20 },
    ]);
    let next = a.update_one(Update::new(1, |s: &mut Score| s.points = 40), &state);
    assert_eq!(players(&next), vec![1, 2, 3]);
}

#[test]
fn ties_keep_earlier_entries_first() {
    let a = adapter();
    let state = a.get_initial_state_with([Score { player: 1, points: 5 }]);
    let next = a.add_many(
        [Score { player: 2, points: 5 }, Score { player: 3, points: 5 }],
        &state,
    );
    assert_eq!(players(&next), vec![1, 2, 3]);
}

#[test]
fn adapter_reports_sorting() {
    assert!(adapter().is_sorted());
    assert!(adapter().sort_comparer().is_some());
    assert!(!EntityAdapter::new(|s: &Score| s.player).is_sorted());
}

proptest! {
    #[test]
    fn any_sequence_of_operators_stays_sorted(
        batch in prop::collection::vec((0u16..50, 0u32..20), 0..60),
        removed in prop::collection::vec(0u16..50, 0..10),
    ) {
        let a = adapter();
        let scores: Vec<Score> = batch
            .iter()
            .map(|&(player, points)| Score { player, points })
            .collect();

        let state = a.add_many(scores.clone(), &a.get_initial_state());
        let state = a.remove_many(removed, &state);
        let state = a.set_many(scores.into_iter().map(|s| Score { points: s.points + 1, ..s }), &state);

        let points: Vec<u32> = state.iter().map(|s| s.points).collect();
        prop_assert!(points.windows(2).all(|w| w[0] >= w[1]));
        prop_assert!(state.validate().is_ok());
    }
}
