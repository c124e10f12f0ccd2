//! Feature slices of a root state.
//!
//! A root state is a keyed collection of independently owned slices
//! ("features"). [`FeatureSource`] is the lookup seam; [`RootState`] is a
//! persistent implementation for applications without their own container.
//! A [`FeatureSelector`] reads one slice by key and yields `None` when the
//! slice is missing or has another type, leaving strictness to callers
//! (see [`FeatureSelector::try_select`]).

use std::any::{Any, type_name};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use collate_foundation::{Error, Result};
use tracing::warn;

use crate::config::SelectorConfig;
use crate::selector::Selector;

/// A type-erased feature slice.
pub type FeatureSlice = Arc<dyn Any + Send + Sync>;

/// A root state that can look up feature slices by key.
pub trait FeatureSource {
    /// Returns the slice stored under `key`, if any.
    fn feature(&self, key: &str) -> Option<&FeatureSlice>;
}

/// Persistent map from feature key to slice.
///
/// Cloning is O(1); `with_feature` returns a new root sharing every other
/// slice with the original.
#[derive(Clone, Default)]
pub struct RootState {
    slices: im::HashMap<Arc<str>, FeatureSlice>,
}

impl RootState {
    /// Creates an empty root state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a new root with `value` stored under `key`.
    #[must_use]
    pub fn with_feature<T>(&self, key: &str, value: T) -> Self
    where
        T: Any + Send + Sync,
    {
        self.with_shared_feature(key, Arc::new(value))
    }

    /// Returns a new root with an already shared slice stored under `key`.
    #[must_use]
    pub fn with_shared_feature<T>(&self, key: &str, value: Arc<T>) -> Self
    where
        T: Any + Send + Sync,
    {
        let mut slices = self.slices.clone();
        slices.insert(Arc::from(key), value as FeatureSlice);
        Self { slices }
    }

    /// Returns a new root without the slice under `key`.
    #[must_use]
    pub fn without_feature(&self, key: &str) -> Self {
        let mut slices = self.slices.clone();
        slices.remove(key);
        Self { slices }
    }

    /// Returns the slice under `key` if it has type `T`.
    #[must_use]
    pub fn get<T>(&self, key: &str) -> Option<Arc<T>>
    where
        T: Any + Send + Sync,
    {
        self.slices
            .get(key)
            .and_then(|slice| Arc::clone(slice).downcast::<T>().ok())
    }

    /// Returns true if a slice is stored under `key`.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.slices.contains_key(key)
    }

    /// Returns the number of slices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slices.len()
    }

    /// Returns true if there are no slices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    /// Returns an iterator over feature keys in unspecified order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.slices.keys().map(|key| &**key)
    }
}

impl FeatureSource for RootState {
    fn feature(&self, key: &str) -> Option<&FeatureSlice> {
        self.slices.get(key)
    }
}

impl fmt::Debug for RootState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.keys()).finish()
    }
}

/// Selector reading the slice of type `T` stored under one key.
pub struct FeatureSelector<T> {
    key: Arc<str>,
    warn_on_missing: bool,
    _slice: PhantomData<fn() -> T>,
}

impl<T> Clone for FeatureSelector<T> {
    fn clone(&self) -> Self {
        Self {
            key: Arc::clone(&self.key),
            warn_on_missing: self.warn_on_missing,
            _slice: PhantomData,
        }
    }
}

impl<T> fmt::Debug for FeatureSelector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeatureSelector")
            .field("key", &self.key)
            .field("type", &type_name::<T>())
            .finish()
    }
}

/// Creates a selector for the feature slice under `key`.
#[must_use]
pub fn create_feature_selector<T>(key: &str) -> FeatureSelector<T>
where
    T: Any + Send + Sync,
{
    FeatureSelector::with_config(key, &SelectorConfig::default())
}

impl<T> FeatureSelector<T>
where
    T: Any + Send + Sync,
{
    /// Creates a feature selector under `config`.
    #[must_use]
    pub fn with_config(key: &str, config: &SelectorConfig) -> Self {
        Self {
            key: Arc::from(key),
            warn_on_missing: config.warn_on_missing_feature,
            _slice: PhantomData,
        }
    }

    /// Returns the feature key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Reads the slice, or `None` if it is absent or of another type.
    pub fn select<S: FeatureSource>(&self, state: &S) -> Option<Arc<T>> {
        match self.try_select(state) {
            Ok(slice) => Some(slice),
            Err(err) => {
                if self.warn_on_missing {
                    warn!(feature = %self.key, "{err}");
                }
                None
            }
        }
    }

    /// Reads the slice, failing when it is absent or of another type.
    ///
    /// # Errors
    /// Returns `FeatureNotFound` if no slice is stored under the key, or
    /// `FeatureTypeMismatch` if the slice is not a `T`.
    pub fn try_select<S: FeatureSource>(&self, state: &S) -> Result<Arc<T>> {
        let slice = state
            .feature(&self.key)
            .ok_or_else(|| Error::feature_not_found(&*self.key))?;
        Arc::clone(slice)
            .downcast::<T>()
            .map_err(|_| Error::feature_type_mismatch(&*self.key, type_name::<T>()))
    }
}

impl<S, P, T> Selector<S, P> for FeatureSelector<T>
where
    S: FeatureSource,
    T: Any + Send + Sync,
{
    type Output = Option<Arc<T>>;

    fn select_with(&self, state: &S, _props: &P) -> Self::Output {
        FeatureSelector::select(self, state)
    }
}
