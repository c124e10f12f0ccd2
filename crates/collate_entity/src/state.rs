//! Immutable entity collection snapshots.
//!
//! An [`EntityState`] pairs an ordered id sequence with an id-keyed entity
//! map. The two always hold the same set of ids and the sequence has no
//! duplicates. Snapshots are never changed in place; operators build new
//! ones that share every untouched entity with their input.

use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use collate_foundation::{EntityMap, Error, IdList, Result, SameValue};

#[cfg(feature = "serde")]
mod serde_support {
    use std::fmt;
    use std::hash::Hash;

    use collate_foundation::{EntityMap, IdList};
    use serde::de;
    use serde::ser::SerializeStruct;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::EntityState;

    impl<Id, T> Serialize for EntityState<Id, T>
    where
        Id: Serialize + Clone + Eq + Hash,
        T: Serialize,
    {
        fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            let mut state = serializer.serialize_struct("EntityState", 2)?;
            state.serialize_field("ids", &self.ids)?;
            state.serialize_field("entities", &self.entities)?;
            state.end()
        }
    }

    #[derive(Deserialize)]
    #[serde(bound(deserialize = "Id: Deserialize<'de> + Clone + Eq + Hash, T: Deserialize<'de>"))]
    struct RawEntityState<Id, T>
    where
        Id: Clone + Eq + Hash,
    {
        ids: IdList<Id>,
        entities: EntityMap<Id, T>,
    }

    impl<'de, Id, T> Deserialize<'de> for EntityState<Id, T>
    where
        Id: Deserialize<'de> + Clone + Eq + Hash + fmt::Debug,
        T: Deserialize<'de>,
    {
        fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
        where
            D: Deserializer<'de>,
        {
            let raw = RawEntityState::deserialize(deserializer)?;
            EntityState::from_parts(raw.ids, raw.entities).map_err(de::Error::custom)
        }
    }
}

/// A normalized, ordered collection of entities.
pub struct EntityState<Id, T>
where
    Id: Clone + Eq + Hash,
{
    ids: IdList<Id>,
    entities: EntityMap<Id, T>,
}

impl<Id: Clone + Eq + Hash, T> EntityState<Id, T> {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self {
            ids: IdList::new(),
            entities: EntityMap::new(),
        }
    }

    /// Builds a collection from parts, checking that they agree.
    ///
    /// # Errors
    /// Returns `DuplicateId` if an id repeats, `MissingEntity` if an id has
    /// no entity, or `OrphanEntity` if an entity's id is not listed.
    pub fn from_parts(ids: IdList<Id>, entities: EntityMap<Id, T>) -> Result<Self>
    where
        Id: fmt::Debug,
    {
        let mut seen = HashSet::with_capacity(ids.len());
        for id in &ids {
            if !seen.insert(id) {
                return Err(Error::duplicate_id(format!("{id:?}")));
            }
            if !entities.contains_key(id) {
                return Err(Error::missing_entity(format!("{id:?}")));
            }
        }
        if let Some(orphan) = entities.keys().find(|id| !seen.contains(id)) {
            return Err(Error::orphan_entity(format!("{orphan:?}")));
        }
        Ok(Self { ids, entities })
    }

    /// Assembles a collection from parts the caller keeps consistent.
    pub(crate) fn from_parts_unchecked(ids: IdList<Id>, entities: EntityMap<Id, T>) -> Self {
        Self { ids, entities }
    }

    /// Re-checks the collection invariant.
    ///
    /// # Errors
    /// Returns the same errors as [`from_parts`](Self::from_parts).
    pub fn validate(&self) -> Result<()>
    where
        Id: fmt::Debug,
    {
        Self::from_parts(self.ids.clone(), self.entities.clone()).map(|_| ())
    }

    /// Returns the ids in collection order.
    #[must_use]
    pub fn ids(&self) -> &IdList<Id> {
        &self.ids
    }

    /// Returns the id-keyed entity map.
    #[must_use]
    pub fn entities(&self) -> &EntityMap<Id, T> {
        &self.entities
    }

    /// Returns the number of entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns true if the collection is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Gets an entity by id.
    #[must_use]
    pub fn get(&self, id: &Id) -> Option<&Arc<T>> {
        self.entities.get(id)
    }

    /// Returns true if an entity is stored under `id`.
    #[must_use]
    pub fn contains(&self, id: &Id) -> bool {
        self.entities.contains_key(id)
    }

    /// Iterates over entities in collection order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<T>> {
        self.ids.iter().filter_map(|id| self.entities.get(id))
    }

    /// Copies the entities, in collection order, into a `Vec`.
    #[must_use]
    pub fn to_vec(&self) -> Vec<Arc<T>> {
        self.iter().cloned().collect()
    }

    /// Returns true if both snapshots share their id and entity containers.
    ///
    /// Operators that change nothing return a snapshot that is `ptr_eq`
    /// to their input.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.ids.ptr_eq(&other.ids) && self.entities.ptr_eq(&other.entities)
    }
}

impl<Id: Clone + Eq + Hash, T> Clone for EntityState<Id, T> {
    fn clone(&self) -> Self {
        Self {
            ids: self.ids.clone(),
            entities: self.entities.clone(),
        }
    }
}

impl<Id: Clone + Eq + Hash, T> Default for EntityState<Id, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Id: Clone + Eq + Hash + fmt::Debug, T: fmt::Debug> fmt::Debug for EntityState<Id, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityState")
            .field("ids", &self.ids)
            .field("entities", &self.entities)
            .finish()
    }
}

impl<Id: Clone + Eq + Hash, T: PartialEq> PartialEq for EntityState<Id, T> {
    fn eq(&self, other: &Self) -> bool {
        self.ids == other.ids && self.entities == other.entities
    }
}

impl<Id: Clone + Eq + Hash, T: Eq> Eq for EntityState<Id, T> {}

impl<Id: Clone + Eq + Hash, T> SameValue for EntityState<Id, T> {
    fn same_value(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

/// Application state that embeds an [`EntityState`].
///
/// Operators accept any container and carry its other fields over
/// unchanged, replacing only the embedded collection.
pub trait EntityContainer: Clone {
    /// Entity id type.
    type Id: Clone + Eq + Hash;
    /// Entity type.
    type Entity;

    /// Returns the embedded collection.
    fn entity_state(&self) -> &EntityState<Self::Id, Self::Entity>;

    /// Returns a copy of `self` holding `entities` instead.
    #[must_use]
    fn with_entity_state(&self, entities: EntityState<Self::Id, Self::Entity>) -> Self;
}

impl<Id: Clone + Eq + Hash, T> EntityContainer for EntityState<Id, T> {
    type Id = Id;
    type Entity = T;

    fn entity_state(&self) -> &EntityState<Id, T> {
        self
    }

    fn with_entity_state(&self, entities: EntityState<Id, T>) -> Self {
        entities
    }
}
