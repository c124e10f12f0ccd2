//! Properties every collection operator upholds

use std::collections::HashSet;

use collate::entity::{EntityAdapter, EntityState, Update};

#[derive(Clone, Debug, PartialEq)]
struct Record {
    id: u32,
    key: String,
}

fn keyed() -> EntityAdapter<String, Record> {
    EntityAdapter::new(|r: &Record| r.key.clone())
}

fn assert_set_invariant<T>(state: &EntityState<String, T>) {
    let ids: HashSet<&String> = state.ids().iter().collect();
    let keys: HashSet<&String> = state.entities().keys().collect();
    assert_eq!(ids.len(), state.ids().len());
    assert_eq!(ids, keys);
}

#[test]
fn add_is_idempotent() {
    let a = keyed();
    let e = Record {
        id: 1,
        key: "a".to_string(),
    };
    let once = a.add_one(e.clone(), &a.get_initial_state());
    let twice = a.add_one(e, &once);

    assert!(twice.ptr_eq(&once));
    assert_set_invariant(&twice);
}

#[test]
fn removing_missing_id_returns_same_state() {
    let a = keyed();
    let s = a.get_initial_state_with([Record {
        id: 1,
        key: "a".to_string(),
    }]);
    assert!(a.remove_one(&"missing".to_string(), &s).ptr_eq(&s));
}

#[test]
fn add_many_preserves_order_without_comparer() {
    let a = keyed();
    let e1 = Record {
        id: 1,
        key: "z".to_string(),
    };
    let e2 = Record {
        id: 2,
        key: "y".to_string(),
    };
    let s = a.add_many([e1, e2], &a.get_initial_state());
    assert_eq!(s.ids(), &["z".to_string(), "y".to_string()]);
}

#[test]
fn update_rekeys_entity() {
    let a = keyed();
    let s = a.get_initial_state_with([Record {
        id: 1,
        key: "a".to_string(),
    }]);
    let next = a.update_one(
        Update::new("a".to_string(), |r: &mut Record| r.key = "b".to_string()),
        &s,
    );

    assert!(next.get(&"a".to_string()).is_none());
    assert_eq!(
        next.get(&"b".to_string()).map(|r| (**r).clone()),
        Some(Record {
            id: 1,
            key: "b".to_string(),
        })
    );
    assert_eq!(next.ids(), &["b".to_string()]);
    assert_set_invariant(&next);
}

#[test]
fn every_operator_keeps_set_invariant() {
    let a = keyed();
    let record = |id: u32, key: &str| Record {
        id,
        key: key.to_string(),
    };

    let s = a.get_initial_state();
    let s = a.add_many([record(1, "a"), record(2, "b"), record(3, "a")], &s);
    assert_set_invariant(&s);
    let s = a.set_many([record(4, "c"), record(5, "a")], &s);
    assert_set_invariant(&s);
    let s = a.upsert_many([record(6, "d"), record(7, "b")], &s);
    assert_set_invariant(&s);
    let s = a.update_one(
        Update::new("c".to_string(), |r: &mut Record| r.key = "a".to_string()),
        &s,
    );
    assert_set_invariant(&s);
    let s = a.map(
        |r| (r.id % 2 == 0).then(|| Record {
            key: format!("{}-even", r.key),
            ..r.clone()
        }),
        &s,
    );
    assert_set_invariant(&s);
    let s = a.remove_many_by(|r| r.id > 5, &s);
    assert_set_invariant(&s);
    let s = a.set_all([record(8, "x"), record(9, "x")], &s);
    assert_set_invariant(&s);
    assert_eq!(s.len(), 1);
}
