//! Integration tests for entity selectors

use std::sync::Arc;

use collate_entity::{EntityAdapter, EntityState, Update};
use collate_select::{
    RootState, Selector, create_feature_selector, create_selector, selector_fn,
};

#[derive(Clone, Debug, PartialEq)]
struct Note {
    id: u32,
    pinned: bool,
}

fn adapter() -> EntityAdapter<u32, Note> {
    EntityAdapter::new(|n: &Note| n.id)
}

#[test]
fn selectors_through_feature_slice() {
    let a = adapter();
    let notes = create_feature_selector::<EntityState<u32, Note>>("notes");
    let selectors = a.get_selectors_from(selector_fn(move |root: &RootState| {
        notes.select(root).map(|state| (*state).clone()).unwrap_or_default()
    }));

    let state = a.get_initial_state_with((1..=4).map(|id| Note { id, pinned: id % 2 == 0 }));
    let root = RootState::new().with_feature("notes", state);

    assert_eq!(selectors.select_total.select(&root), 4);
    assert_eq!(selectors.select_ids.select(&root), [1, 2, 3, 4]);
}

#[test]
fn missing_feature_yields_empty_collection() {
    let a = adapter();
    let notes = create_feature_selector::<EntityState<u32, Note>>("notes");
    let selectors = a.get_selectors_from(selector_fn(move |root: &RootState| {
        notes.select(root).map(|state| (*state).clone()).unwrap_or_default()
    }));

    assert_eq!(selectors.select_total.select(&RootState::new()), 0);
}

#[test]
fn derived_selector_recomputes_only_on_change() {
    let a = adapter();
    let selectors = a.get_selectors();
    let pinned = create_selector(
        (Arc::clone(&selectors.select_all),),
        |all: &Arc<Vec<Arc<Note>>>| all.iter().filter(|n| n.pinned).count(),
    );

    let state = a.get_initial_state_with((1..=4).map(|id| Note { id, pinned: false }));
    assert_eq!(pinned.select(&state), 0);

    let same = a.remove_one(&99, &state);
    assert_eq!(pinned.select(&same), 0);
    assert_eq!(pinned.recomputations(), 1);

    let next = a.update_one(Update::new(3, |n: &mut Note| n.pinned = true), &state);
    assert_eq!(pinned.select(&next), 1);
    assert_eq!(pinned.recomputations(), 2);
}
