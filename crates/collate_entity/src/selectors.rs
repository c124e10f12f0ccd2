//! Memoized selectors over an entity collection.
//!
//! [`EntityAdapter::get_selectors`] reads an [`EntityState`] directly;
//! [`EntityAdapter::get_selectors_from`] reads it through a parent selector,
//! typically a feature selector or a field of a larger root state.

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use collate_foundation::{EntityMap, IdList};
use collate_select::{Selector, SelectorFactory, SharedSelector, selector_fn};

use crate::adapter::EntityAdapter;
use crate::state::EntityState;

/// The four standard selectors of one collection.
pub struct EntitySelectors<S, Id, T>
where
    Id: Clone + Eq + Hash,
{
    /// The ids, in collection order.
    pub select_ids: SharedSelector<S, IdList<Id>>,
    /// The id-keyed entity map.
    pub select_entities: SharedSelector<S, EntityMap<Id, T>>,
    /// The entities, in collection order. Recomputed only when the id
    /// list or entity map changes.
    pub select_all: SharedSelector<S, Arc<Vec<Arc<T>>>>,
    /// The number of entities.
    pub select_total: SharedSelector<S, usize>,
}

impl<S, Id: Clone + Eq + Hash, T> Clone for EntitySelectors<S, Id, T> {
    fn clone(&self) -> Self {
        Self {
            select_ids: Arc::clone(&self.select_ids),
            select_entities: Arc::clone(&self.select_entities),
            select_all: Arc::clone(&self.select_all),
            select_total: Arc::clone(&self.select_total),
        }
    }
}

impl<S, Id: Clone + Eq + Hash, T> fmt::Debug for EntitySelectors<S, Id, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntitySelectors").finish_non_exhaustive()
    }
}

impl<Id, T> EntityAdapter<Id, T>
where
    Id: Clone + Eq + Hash + fmt::Debug + Send + Sync + 'static,
    T: Send + Sync + 'static,
{
    /// Returns selectors over an [`EntityState`] itself.
    #[must_use]
    pub fn get_selectors(&self) -> EntitySelectors<EntityState<Id, T>, Id, T> {
        self.get_selectors_from(selector_fn(|state: &EntityState<Id, T>| state.clone()))
    }

    /// Returns selectors over the collection that `select_state` reads out
    /// of a larger state.
    pub fn get_selectors_from<S, X>(&self, select_state: X) -> EntitySelectors<S, Id, T>
    where
        S: 'static,
        X: Selector<S, Output = EntityState<Id, T>> + Send + Sync + 'static,
    {
        self.get_selectors_with(&SelectorFactory::default(), select_state)
    }

    /// Like [`get_selectors_from`](Self::get_selectors_from), building the
    /// memoized selectors with `factory`.
    pub fn get_selectors_with<S, X>(
        &self,
        factory: &SelectorFactory,
        select_state: X,
    ) -> EntitySelectors<S, Id, T>
    where
        S: 'static,
        X: Selector<S, Output = EntityState<Id, T>> + Send + Sync + 'static,
    {
        let select_state: SharedSelector<S, EntityState<Id, T>> = Arc::new(select_state);

        let select_ids: SharedSelector<S, IdList<Id>> = Arc::new(factory.create(
            (Arc::clone(&select_state),),
            |state: &EntityState<Id, T>| state.ids().clone(),
        ));
        let select_entities: SharedSelector<S, EntityMap<Id, T>> = Arc::new(factory.create(
            (select_state,),
            |state: &EntityState<Id, T>| state.entities().clone(),
        ));
        let select_all: SharedSelector<S, Arc<Vec<Arc<T>>>> = Arc::new(factory.create(
            (Arc::clone(&select_ids), Arc::clone(&select_entities)),
            |ids: &IdList<Id>, entities: &EntityMap<Id, T>| {
                Arc::new(
                    ids.iter()
                        .filter_map(|id| entities.get(id).cloned())
                        .collect::<Vec<_>>(),
                )
            },
        ));
        let select_total: SharedSelector<S, usize> = Arc::new(
            factory.create((Arc::clone(&select_ids),), |ids: &IdList<Id>| ids.len()),
        );

        EntitySelectors {
            select_ids,
            select_entities,
            select_all,
            select_total,
        }
    }
}
