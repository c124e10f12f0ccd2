//! Entity adapters: the collection operators.
//!
//! An [`EntityAdapter`] knows how to read an entity's id and, optionally,
//! how to order two entities. Every operator takes its argument and a
//! state and returns a new state built through
//! [`create_state_operator`]. Operators never fail: ids that are absent
//! (for removal or update) or already present (for `add_*`) are skipped
//! one by one, and an operator that changes nothing hands back a snapshot
//! that is `ptr_eq` to its input.

use std::cmp::Ordering;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use collate_foundation::{Patch, Update};
use tracing::debug;

use crate::operator::{DidMutate, Draft, create_state_operator};
use crate::state::{EntityContainer, EntityState};

/// Reads the id of an entity.
pub type SelectId<Id, T> = Arc<dyn Fn(&T) -> Id + Send + Sync>;

/// Orders two entities.
pub type Comparer<T> = Arc<dyn Fn(&T, &T) -> Ordering + Send + Sync>;

/// Operators over the [`EntityState`] of one entity type.
pub struct EntityAdapter<Id, T> {
    select_id: SelectId<Id, T>,
    sort_comparer: Option<Comparer<T>>,
}

impl<Id, T> Clone for EntityAdapter<Id, T> {
    fn clone(&self) -> Self {
        Self {
            select_id: Arc::clone(&self.select_id),
            sort_comparer: self.sort_comparer.clone(),
        }
    }
}

impl<Id, T> fmt::Debug for EntityAdapter<Id, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityAdapter")
            .field("sorted", &self.sort_comparer.is_some())
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Construction
// =============================================================================

impl<Id, T> EntityAdapter<Id, T>
where
    Id: Clone + Eq + Hash + fmt::Debug,
{
    /// Creates an unsorted adapter.
    #[must_use]
    pub fn new<F>(select_id: F) -> Self
    where
        F: Fn(&T) -> Id + Send + Sync + 'static,
    {
        Self {
            select_id: Arc::new(select_id),
            sort_comparer: None,
        }
    }

    /// Keeps ids ordered by `compare`, stable for equal entities.
    #[must_use]
    pub fn with_sort_comparer<F>(mut self, compare: F) -> Self
    where
        F: Fn(&T, &T) -> Ordering + Send + Sync + 'static,
    {
        self.sort_comparer = Some(Arc::new(compare));
        self
    }

    /// Returns the id of `entity`.
    pub fn select_id(&self, entity: &T) -> Id {
        (self.select_id)(entity)
    }

    /// Returns the sort comparer, if the adapter is sorted.
    #[must_use]
    pub fn sort_comparer(&self) -> Option<&Comparer<T>> {
        self.sort_comparer.as_ref()
    }

    /// Returns true if the adapter keeps ids sorted.
    #[must_use]
    pub fn is_sorted(&self) -> bool {
        self.sort_comparer.is_some()
    }

    /// Returns an empty collection.
    #[must_use]
    pub fn get_initial_state(&self) -> EntityState<Id, T> {
        EntityState::new()
    }

    /// Returns a collection holding `entities`, as [`set_all`](Self::set_all)
    /// would build it.
    pub fn get_initial_state_with<I>(&self, entities: I) -> EntityState<Id, T>
    where
        I: IntoIterator<Item = T>,
    {
        self.set_all(entities, &EntityState::new())
    }

    // =========================================================================
    // Add / set
    // =========================================================================

    /// Adds `entity` unless its id is already present.
    pub fn add_one<S>(&self, entity: T, state: &S) -> S
    where
        S: EntityContainer<Id = Id, Entity = T>,
    {
        self.add_many([entity], state)
    }

    /// Adds each entity whose id is not already present.
    pub fn add_many<S, I>(&self, entities: I, state: &S) -> S
    where
        S: EntityContainer<Id = Id, Entity = T>,
        I: IntoIterator<Item = T>,
    {
        create_state_operator(state, |draft| {
            let mut added = false;
            for entity in entities {
                added |= self.add_into(draft, entity);
            }
            if added { DidMutate::Both } else { DidMutate::None }
        })
    }

    /// Adds `entity`, replacing the whole record if its id is present.
    pub fn set_one<S>(&self, entity: T, state: &S) -> S
    where
        S: EntityContainer<Id = Id, Entity = T>,
    {
        self.set_many([entity], state)
    }

    /// Adds each entity, replacing whole records whose ids are present.
    pub fn set_many<S, I>(&self, entities: I, state: &S) -> S
    where
        S: EntityContainer<Id = Id, Entity = T>,
        I: IntoIterator<Item = T>,
    {
        create_state_operator(state, |draft| {
            let mut touched = false;
            for entity in entities {
                self.set_into(draft, entity);
                touched = true;
            }
            draft.outcome(touched)
        })
    }

    /// Replaces the whole collection with `entities`.
    ///
    /// When an id repeats, the last value wins. Unsorted collections keep
    /// the position of the id's first occurrence.
    pub fn set_all<S, I>(&self, entities: I, state: &S) -> S
    where
        S: EntityContainer<Id = Id, Entity = T>,
        I: IntoIterator<Item = T>,
    {
        create_state_operator(state, |draft| {
            draft.clear();
            for entity in entities {
                self.set_into(draft, entity);
            }
            DidMutate::Both
        })
    }

    // =========================================================================
    // Remove
    // =========================================================================

    /// Removes the entity under `id`, if any.
    pub fn remove_one<S>(&self, id: &Id, state: &S) -> S
    where
        S: EntityContainer<Id = Id, Entity = T>,
    {
        self.remove_many([id.clone()], state)
    }

    /// Removes every listed id that is present.
    pub fn remove_many<S, I>(&self, ids: I, state: &S) -> S
    where
        S: EntityContainer<Id = Id, Entity = T>,
        I: IntoIterator<Item = Id>,
    {
        create_state_operator(state, |draft| {
            let mut removed = false;
            for id in ids {
                removed |= draft.entities_mut().remove_mut(&id).is_some();
            }
            if removed {
                draft.prune_ids();
                DidMutate::Both
            } else {
                DidMutate::None
            }
        })
    }

    /// Removes every entity for which `predicate` returns true.
    pub fn remove_many_by<S, F>(&self, predicate: F, state: &S) -> S
    where
        S: EntityContainer<Id = Id, Entity = T>,
        F: Fn(&T) -> bool,
    {
        let matching: Vec<Id> = state
            .entity_state()
            .entities()
            .iter()
            .filter(|(_, entity)| predicate(entity))
            .map(|(id, _)| id.clone())
            .collect();
        self.remove_many(matching, state)
    }

    /// Empties the collection.
    pub fn remove_all<S>(&self, state: &S) -> S
    where
        S: EntityContainer<Id = Id, Entity = T>,
    {
        create_state_operator(state, |draft| {
            if draft.ids().is_empty() {
                return DidMutate::None;
            }
            draft.clear();
            DidMutate::Both
        })
    }

    // =========================================================================
    // Update / upsert / map
    // =========================================================================

    /// Applies `update.changes` to a copy of the entity under `update.id`.
    ///
    /// Absent ids are skipped. If the changed entity reports a new id it
    /// moves to that id: appended for unsorted collections, re-sorted
    /// otherwise. An entity already stored under the new id is replaced.
    pub fn update_one<S, P>(&self, update: Update<Id, P>, state: &S) -> S
    where
        S: EntityContainer<Id = Id, Entity = T>,
        P: Patch<T>,
        T: Clone,
    {
        self.update_many([update], state)
    }

    /// Applies each update in turn, as [`update_one`](Self::update_one).
    pub fn update_many<S, P, I>(&self, updates: I, state: &S) -> S
    where
        S: EntityContainer<Id = Id, Entity = T>,
        P: Patch<T>,
        T: Clone,
        I: IntoIterator<Item = Update<Id, P>>,
    {
        create_state_operator(state, |draft| {
            let mut touched = false;
            for Update { id, changes } in updates {
                let Some(current) = draft.entities().get(&id) else {
                    continue;
                };
                let mut merged = T::clone(current);
                changes.apply_to(&mut merged);
                self.store_changed(draft, id, merged);
                touched = true;
            }
            draft.outcome(touched)
        })
    }

    /// Adds `entity`, or replaces the stored record in place if its id is
    /// present.
    pub fn upsert_one<S>(&self, entity: T, state: &S) -> S
    where
        S: EntityContainer<Id = Id, Entity = T>,
    {
        self.upsert_many([entity], state)
    }

    /// Upserts each entity in turn.
    pub fn upsert_many<S, I>(&self, entities: I, state: &S) -> S
    where
        S: EntityContainer<Id = Id, Entity = T>,
        I: IntoIterator<Item = T>,
    {
        create_state_operator(state, |draft| {
            let mut touched = false;
            for entity in entities {
                let id = self.select_id(&entity);
                if draft.entities().contains_key(&id) {
                    self.store_changed(draft, id, entity);
                    touched = true;
                } else {
                    touched |= self.add_into(draft, entity);
                }
            }
            draft.outcome(touched)
        })
    }

    /// Replaces the entity under `id` with `f` of it. Absent ids are skipped.
    pub fn map_one<S, F>(&self, id: &Id, f: F, state: &S) -> S
    where
        S: EntityContainer<Id = Id, Entity = T>,
        F: FnOnce(&T) -> T,
    {
        create_state_operator(state, |draft| {
            let Some(current) = draft.entities().get(id) else {
                return DidMutate::None;
            };
            let changed = f(current);
            self.store_changed(draft, id.clone(), changed);
            draft.outcome(true)
        })
    }

    /// Replaces each entity for which `f` returns `Some`, in collection
    /// order. Entities for which it returns `None` are kept as they are.
    pub fn map<S, F>(&self, f: F, state: &S) -> S
    where
        S: EntityContainer<Id = Id, Entity = T>,
        F: Fn(&T) -> Option<T>,
    {
        create_state_operator(state, |draft| {
            let changes: Vec<(Id, T)> = draft
                .ids()
                .iter()
                .filter_map(|id| {
                    let entity = draft.entities().get(id)?;
                    f(entity).map(|changed| (id.clone(), changed))
                })
                .collect();
            let touched = !changes.is_empty();
            for (id, changed) in changes {
                self.store_changed(draft, id, changed);
            }
            draft.outcome(touched)
        })
    }

    // =========================================================================
    // Draft helpers
    // =========================================================================

    fn add_into(&self, draft: &mut Draft<Id, T>, entity: T) -> bool {
        let id = self.select_id(&entity);
        if draft.entities().contains_key(&id) {
            return false;
        }
        draft.entities_mut().insert_mut(id.clone(), Arc::new(entity));
        draft.insert_id(id, self.sort_comparer.as_ref());
        true
    }

    fn set_into(&self, draft: &mut Draft<Id, T>, entity: T) {
        let id = self.select_id(&entity);
        if draft
            .entities_mut()
            .insert_mut(id.clone(), Arc::new(entity))
            .is_some()
        {
            draft.reposition(&id, self.sort_comparer.as_ref());
        } else {
            draft.insert_id(id, self.sort_comparer.as_ref());
        }
    }

    /// Stores `changed`, previously held under `id`, under its own id.
    fn store_changed(&self, draft: &mut Draft<Id, T>, id: Id, changed: T) {
        let order = self.sort_comparer.as_ref();
        let new_id = self.select_id(&changed);
        if new_id == id {
            draft.entities_mut().insert_mut(id.clone(), Arc::new(changed));
            draft.reposition(&id, order);
            return;
        }

        debug!(from = ?id, to = ?new_id, "re-keying entity");
        draft.entities_mut().remove_mut(&id);
        let replaced = draft
            .entities_mut()
            .insert_mut(new_id.clone(), Arc::new(changed))
            .is_some();
        draft
            .ids_mut()
            .retain_mut(|existing| *existing != id && (!replaced || *existing != new_id));
        draft.insert_id(new_id, order);
    }
}
