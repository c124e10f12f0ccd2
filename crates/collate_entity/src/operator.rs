//! The copy-on-write state operator.
//!
//! Every collection operator is a mutator run against a [`Draft`], a
//! working copy of the input's id list and entity map. Persistent
//! containers make the copy O(1); writes to the draft copy only the paths
//! they touch. The mutator reports what it changed:
//!
//! - [`DidMutate::None`]: the input is returned as is.
//! - [`DidMutate::EntitiesOnly`]: a new snapshot with the draft's entity
//!   map and the input's id list.
//! - [`DidMutate::Both`]: a new snapshot with both draft containers.
//!
//! The input state is never written to.

use std::cmp::Ordering;
use std::hash::Hash;

use collate_foundation::{EntityMap, IdList};

use crate::adapter::Comparer;
use crate::state::{EntityContainer, EntityState};

/// What a mutator changed in its draft.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DidMutate {
    /// Nothing changed.
    None,
    /// Entity values changed, the id sequence did not.
    EntitiesOnly,
    /// The id sequence changed (and possibly entity values).
    Both,
}

/// Working copy of a collection, private to one operator call.
#[derive(Debug)]
pub struct Draft<Id, T>
where
    Id: Clone + Eq + Hash,
{
    ids: IdList<Id>,
    entities: EntityMap<Id, T>,
    base_ids: IdList<Id>,
}

impl<Id: Clone + Eq + Hash, T> Draft<Id, T> {
    fn new(state: &EntityState<Id, T>) -> Self {
        Self {
            ids: state.ids().clone(),
            entities: state.entities().clone(),
            base_ids: state.ids().clone(),
        }
    }

    /// Returns the working id sequence.
    #[must_use]
    pub fn ids(&self) -> &IdList<Id> {
        &self.ids
    }

    /// Returns the working entity map.
    #[must_use]
    pub fn entities(&self) -> &EntityMap<Id, T> {
        &self.entities
    }

    /// Returns the working id sequence for in-place edits.
    pub fn ids_mut(&mut self) -> &mut IdList<Id> {
        &mut self.ids
    }

    /// Returns the working entity map for in-place edits.
    pub fn entities_mut(&mut self) -> &mut EntityMap<Id, T> {
        &mut self.entities
    }

    /// Replaces both containers with empty ones.
    pub fn clear(&mut self) {
        self.ids = IdList::new();
        self.entities = EntityMap::new();
    }

    /// Adds `id`, whose entity is already in the map, to the id sequence.
    ///
    /// Unsorted: appended. Sorted: inserted after every entity that does
    /// not compare greater, so equal entities keep their arrival order.
    pub(crate) fn insert_id(&mut self, id: Id, order: Option<&Comparer<T>>) {
        let Some(compare) = order else {
            self.ids.push_back_mut(id);
            return;
        };
        let Some(entity) = self.entities.get(&id) else {
            return;
        };
        let entities = &self.entities;
        let index = self.ids.partition_point(|existing| {
            entities
                .get(existing)
                .is_some_and(|other| compare(&**other, &**entity) == Ordering::Greater)
        });
        self.ids.insert_mut(index, id);
    }

    /// Moves `id` to its sorted position if its entity no longer fits
    /// between its neighbours. A no-op for unsorted collections.
    pub(crate) fn reposition(&mut self, id: &Id, order: Option<&Comparer<T>>) {
        let Some(compare) = order else {
            return;
        };
        let Some(index) = self.ids.iter().position(|existing| existing == id) else {
            return;
        };
        let Some(entity) = self.entities.get(id) else {
            return;
        };
        let neighbour = |offset: usize| {
            self.ids
                .get(offset)
                .and_then(|neighbour_id| self.entities.get(neighbour_id))
        };
        let fits_after_previous = index == 0
            || neighbour(index - 1).is_none_or(|prev| compare(&**prev, &**entity) != Ordering::Greater);
        let fits_before_next =
            neighbour(index + 1).is_none_or(|next| compare(&**entity, &**next) != Ordering::Greater);
        if fits_after_previous && fits_before_next {
            return;
        }
        self.ids.retain_mut(|existing| existing != id);
        self.insert_id(id.clone(), order);
    }

    /// Drops ids whose entity has been removed.
    pub(crate) fn prune_ids(&mut self) {
        let entities = &self.entities;
        self.ids.retain_mut(|id| entities.contains_key(id));
    }

    /// Classifies the draft against its input.
    pub(crate) fn outcome(&self, entities_touched: bool) -> DidMutate {
        let ids_changed = !self.ids.ptr_eq(&self.base_ids) && self.ids != self.base_ids;
        if ids_changed {
            DidMutate::Both
        } else if entities_touched {
            DidMutate::EntitiesOnly
        } else {
            DidMutate::None
        }
    }
}

/// Runs `mutator` against a working copy of `state`'s collection and
/// folds the result back into a new state.
///
/// When the mutator reports [`DidMutate::None`] the returned state is a
/// clone of the input, so [`EntityState::ptr_eq`] holds between them.
pub fn create_state_operator<S, F>(state: &S, mutator: F) -> S
where
    S: EntityContainer,
    F: FnOnce(&mut Draft<S::Id, S::Entity>) -> DidMutate,
{
    let current = state.entity_state();
    let mut draft = Draft::new(current);
    match mutator(&mut draft) {
        DidMutate::None => state.clone(),
        DidMutate::EntitiesOnly => state.with_entity_state(EntityState::from_parts_unchecked(
            current.ids().clone(),
            draft.entities,
        )),
        DidMutate::Both => {
            state.with_entity_state(EntityState::from_parts_unchecked(draft.ids, draft.entities))
        }
    }
}
