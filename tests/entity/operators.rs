//! Integration tests for collection operators

use std::sync::Arc;

use collate_entity::{
    DidMutate, EntityAdapter, EntityContainer, EntityState, Update, create_state_operator,
};

#[derive(Clone, Debug, PartialEq)]
struct User {
    id: u32,
    name: String,
    active: bool,
}

fn user(id: u32, name: &str) -> User {
    User {
        id,
        name: name.to_string(),
        active: true,
    }
}

fn adapter() -> EntityAdapter<u32, User> {
    EntityAdapter::new(|u: &User| u.id)
}

fn names(state: &EntityState<u32, User>) -> Vec<String> {
    state.iter().map(|u| u.name.clone()).collect()
}

#[derive(Clone)]
struct UsersState {
    users: EntityState<u32, User>,
    selected: Option<u32>,
    loading: bool,
}

impl EntityContainer for UsersState {
    type Id = u32;
    type Entity = User;

    fn entity_state(&self) -> &EntityState<u32, User> {
        &self.users
    }

    fn with_entity_state(&self, users: EntityState<u32, User>) -> Self {
        Self {
            users,
            ..self.clone()
        }
    }
}

// =============================================================================
// Identity of no-op results
// =============================================================================

#[test]
fn noop_operators_return_input() {
    let a = adapter();
    let state = a.get_initial_state_with([user(1, "ann"), user(2, "bob")]);

    assert!(a.add_one(user(1, "other"), &state).ptr_eq(&state));
    assert!(a.add_many([user(2, "x"), user(1, "y")], &state).ptr_eq(&state));
    assert!(a.remove_one(&9, &state).ptr_eq(&state));
    assert!(a.remove_many([7, 8, 9], &state).ptr_eq(&state));
    assert!(a.remove_many_by(|u| u.name == "nobody", &state).ptr_eq(&state));
    assert!(a.update_one(Update::new(9, |u: &mut User| u.active = false), &state).ptr_eq(&state));
    assert!(a.map_one(&9, Clone::clone, &state).ptr_eq(&state));
    assert!(a.map(|_| None, &state).ptr_eq(&state));
    assert!(a.upsert_many(Vec::new(), &state).ptr_eq(&state));
}

#[test]
fn entity_only_changes_share_id_list() {
    let a = adapter();
    let state = a.get_initial_state_with([user(1, "ann"), user(2, "bob")]);

    let updated = a.update_one(Update::new(1, |u: &mut User| u.active = false), &state);
    assert!(updated.ids().ptr_eq(state.ids()));
    assert!(!updated.get(&1).unwrap().active);

    let set = a.set_one(user(2, "bea"), &state);
    assert!(set.ids().ptr_eq(state.ids()));
    assert_eq!(names(&set), vec!["ann", "bea"]);
}

// =============================================================================
// Operators
// =============================================================================

#[test]
fn set_all_replaces_everything() {
    let a = adapter();
    let state = a.get_initial_state_with([user(1, "ann"), user(2, "bob")]);
    let next = a.set_all([user(3, "cy")], &state);

    assert_eq!(next.ids(), &[3]);
    assert!(!next.contains(&1));
}

#[test]
fn remove_all_then_add() {
    let a = adapter();
    let state = a.get_initial_state_with([user(1, "ann")]);
    let empty = a.remove_all(&state);
    let next = a.add_one(user(1, "ann again"), &empty);

    assert!(empty.is_empty());
    assert_eq!(names(&next), vec!["ann again"]);
}

#[test]
fn update_many_applies_in_order() {
    let a = adapter();
    let state = a.get_initial_state_with([user(1, "ann"), user(2, "bob")]);
    let next = a.update_many(
        [
            Update::new(1, (|u: &mut User| u.name.push('!')) as fn(&mut User)),
            Update::new(1, (|u: &mut User| u.name.push('?')) as fn(&mut User)),
        ],
        &state,
    );
    assert_eq!(names(&next), vec!["ann!?", "bob"]);
}

#[test]
fn update_rekey_moves_to_end() {
    let a = adapter();
    let state = a.get_initial_state_with([user(1, "ann"), user(2, "bob"), user(3, "cy")]);
    let next = a.update_one(Update::new(1, |u: &mut User| u.id = 10), &state);

    assert_eq!(next.ids(), &[2, 3, 10]);
    assert_eq!(next.get(&10).unwrap().name, "ann");
    assert!(next.validate().is_ok());
}

#[test]
fn upsert_keeps_position() {
    let a = adapter();
    let state = a.get_initial_state_with([user(1, "ann"), user(2, "bob")]);
    let next = a.upsert_one(user(1, "anne"), &state);

    assert_eq!(names(&next), vec!["anne", "bob"]);
}

#[test]
fn map_changes_only_some() {
    let a = adapter();
    let state = a.get_initial_state_with([user(1, "ann"), user(2, "bob")]);
    let next = a.map(
        |u| {
            u.name.starts_with('b').then(|| User {
                active: false,
                ..u.clone()
            })
        },
        &state,
    );

    assert!(next.get(&1).unwrap().active);
    assert!(!next.get(&2).unwrap().active);
    assert!(Arc::ptr_eq(next.get(&1).unwrap(), state.get(&1).unwrap()));
}

#[test]
fn operators_keep_container_fields() {
    let a = adapter();
    let state = UsersState {
        users: a.get_initial_state(),
        selected: Some(1),
        loading: true,
    };
    let next = a.add_many([user(1, "ann"), user(2, "bob")], &state);
    let next = a.remove_one(&2, &next);

    assert_eq!(next.users.ids(), &[1]);
    assert_eq!(next.selected, Some(1));
    assert!(next.loading);
}

#[test]
fn custom_state_operator() {
    let state = adapter().get_initial_state_with([user(1, "ann"), user(2, "bob")]);
    let reversed = create_state_operator(&state, |draft| {
        let ids: Vec<u32> = draft.ids().iter().rev().copied().collect();
        *draft.ids_mut() = ids.into_iter().collect();
        DidMutate::Both
    });

    assert_eq!(reversed.ids(), &[2, 1]);
    assert_eq!(state.ids(), &[1, 2]);
}
