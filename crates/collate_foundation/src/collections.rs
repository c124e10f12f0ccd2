//! Persistent collections with structural sharing.
//!
//! These wrap the `im` crate's persistent data structures with the two
//! shapes a normalized collection needs: an ordered id sequence and an
//! id-keyed entity map. Both expose an immutable API (returning new
//! collections) and an in-place API used on private working copies.
//!
//! Cloning either collection is O(1). `ptr_eq` reports whether two values
//! share the same underlying allocation, which is how callers detect that
//! an operation left a collection untouched.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter::FromIterator;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Ordered, persistent sequence of entity ids.
///
/// The vector sits behind an `Arc` so that identity survives cloning for
/// every size of list: `im::Vector` stores short vectors inline, where its
/// own `ptr_eq` cannot tell a clone from an unrelated value.
#[derive(Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct IdList<Id>(Arc<im::Vector<Id>>)
where
    Id: Clone;

impl<Id: Clone> IdList<Id> {
    /// Creates an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self(Arc::new(im::Vector::new()))
    }

    /// Returns the number of ids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Gets an id by position.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Id> {
        self.0.get(index)
    }

    /// Returns an iterator over the ids in order.
    pub fn iter(&self) -> im::vector::Iter<'_, Id> {
        self.0.iter()
    }

    /// Returns true if both lists share the same allocation.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Returns a new list with the id appended.
    #[must_use]
    pub fn push_back(&self, id: Id) -> Self {
        let mut new = self.clone();
        new.push_back_mut(id);
        new
    }

    /// Appends an id in place.
    pub fn push_back_mut(&mut self, id: Id) {
        Arc::make_mut(&mut self.0).push_back(id);
    }

    /// Inserts an id at `index` in place, shifting later ids right.
    ///
    /// # Panics
    /// Panics if `index > len`.
    pub fn insert_mut(&mut self, index: usize, id: Id) {
        Arc::make_mut(&mut self.0).insert(index, id);
    }

    /// Keeps only the ids for which `keep` returns true.
    ///
    /// Returns the number of ids removed. The list is only touched (and
    /// its allocation only replaced) when at least one id is removed.
    pub fn retain_mut<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(&Id) -> bool,
    {
        let mut kept = im::Vector::new();
        let mut removed = 0;
        for id in self.0.iter() {
            if keep(id) {
                kept.push_back(id.clone());
            } else {
                removed += 1;
            }
        }
        if removed > 0 {
            self.0 = Arc::new(kept);
        }
        removed
    }

    /// Returns the first position for which `is_after` is true, assuming
    /// the list is partitioned (all false positions precede all true ones).
    ///
    /// Runs in O(log n) comparisons.
    pub fn partition_point<F>(&self, mut is_after: F) -> usize
    where
        F: FnMut(&Id) -> bool,
    {
        let mut low = 0;
        let mut high = self.len();
        while low < high {
            let mid = low + (high - low) / 2;
            if is_after(&self.0[mid]) {
                high = mid;
            } else {
                low = mid + 1;
            }
        }
        low
    }

    /// Returns true if the list is sorted under `compare`.
    pub fn is_sorted_by<F>(&self, mut compare: F) -> bool
    where
        F: FnMut(&Id, &Id) -> Ordering,
    {
        self.0
            .iter()
            .zip(self.0.iter().skip(1))
            .all(|(a, b)| compare(a, b) != Ordering::Greater)
    }

    /// Copies the ids into a `Vec`.
    #[must_use]
    pub fn to_vec(&self) -> Vec<Id> {
        self.0.iter().cloned().collect()
    }
}

impl<Id: Clone> Default for IdList<Id> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Id: Clone + fmt::Debug> fmt::Debug for IdList<Id> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<Id: Clone + PartialEq> PartialEq for IdList<Id> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || self.0 == other.0
    }
}

impl<Id: Clone + Eq> Eq for IdList<Id> {}

impl<Id: Clone + Hash> Hash for IdList<Id> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for id in self.iter() {
            id.hash(state);
        }
    }
}

impl<Id: Clone + PartialEq> PartialEq<[Id]> for IdList<Id> {
    fn eq(&self, other: &[Id]) -> bool {
        self.len() == other.len() && self.iter().zip(other).all(|(a, b)| a == b)
    }
}

impl<Id: Clone + PartialEq, const N: usize> PartialEq<[Id; N]> for IdList<Id> {
    fn eq(&self, other: &[Id; N]) -> bool {
        self == other.as_slice()
    }
}

impl<Id: Clone> FromIterator<Id> for IdList<Id> {
    fn from_iter<I: IntoIterator<Item = Id>>(iter: I) -> Self {
        Self(Arc::new(im::Vector::from_iter(iter)))
    }
}

impl<'a, Id: Clone> IntoIterator for &'a IdList<Id> {
    type Item = &'a Id;
    type IntoIter = im::vector::Iter<'a, Id>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Persistent map from entity id to a shared entity value.
///
/// Values are stored as `Arc<T>` so that untouched entities are shared
/// between snapshots and can be compared by identity.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[cfg_attr(
    feature = "serde",
    serde(bound(
        serialize = "Id: Serialize + Clone + Eq + Hash, T: Serialize",
        deserialize = "Id: Deserialize<'de> + Clone + Eq + Hash, T: Deserialize<'de>"
    ))
)]
pub struct EntityMap<Id, T>(im::HashMap<Id, Arc<T>>)
where
    Id: Clone + Eq + Hash;

impl<Id: Clone + Eq + Hash, T> EntityMap<Id, T> {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self(im::HashMap::new())
    }

    /// Returns the number of entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the map is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Gets an entity by id.
    #[must_use]
    pub fn get(&self, id: &Id) -> Option<&Arc<T>> {
        self.0.get(id)
    }

    /// Returns true if the map contains the id.
    #[must_use]
    pub fn contains_key(&self, id: &Id) -> bool {
        self.0.contains_key(id)
    }

    /// Returns true if both maps share the same root node.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.0.ptr_eq(&other.0)
    }

    /// Returns a new map with the entity inserted.
    #[must_use]
    pub fn insert(&self, id: Id, entity: Arc<T>) -> Self {
        let mut new = self.clone();
        new.insert_mut(id, entity);
        new
    }

    /// Returns a new map with the id removed.
    #[must_use]
    pub fn remove(&self, id: &Id) -> Self {
        let mut new = self.clone();
        new.remove_mut(id);
        new
    }

    /// Inserts an entity in place, returning the previous value.
    pub fn insert_mut(&mut self, id: Id, entity: Arc<T>) -> Option<Arc<T>> {
        self.0.insert(id, entity)
    }

    /// Removes an entity in place, returning it if present.
    pub fn remove_mut(&mut self, id: &Id) -> Option<Arc<T>> {
        self.0.remove(id)
    }

    /// Returns an iterator over id-entity pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&Id, &Arc<T>)> {
        self.0.iter()
    }

    /// Returns an iterator over ids in unspecified order.
    pub fn keys(&self) -> impl Iterator<Item = &Id> {
        self.0.keys()
    }

    /// Returns an iterator over entities in unspecified order.
    pub fn values(&self) -> impl Iterator<Item = &Arc<T>> {
        self.0.values()
    }
}

impl<Id: Clone + Eq + Hash, T> Clone for EntityMap<Id, T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<Id: Clone + Eq + Hash, T> Default for EntityMap<Id, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Id: Clone + Eq + Hash + fmt::Debug, T: fmt::Debug> fmt::Debug for EntityMap<Id, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<Id: Clone + Eq + Hash, T: PartialEq> PartialEq for EntityMap<Id, T> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || self.0 == other.0
    }
}

impl<Id: Clone + Eq + Hash, T: Eq> Eq for EntityMap<Id, T> {}

impl<Id: Clone + Eq + Hash, T> FromIterator<(Id, Arc<T>)> for EntityMap<Id, T> {
    fn from_iter<I: IntoIterator<Item = (Id, Arc<T>)>>(iter: I) -> Self {
        Self(im::HashMap::from_iter(iter))
    }
}
