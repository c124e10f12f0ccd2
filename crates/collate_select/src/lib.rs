//! Memoized selector graph for Collate.
//!
//! Selectors derive values from an opaque root state. A memoized selector
//! evaluates its dependency selectors on every call, compares the result
//! tuple with the one it saw last, and only runs its projector when some
//! element differs.
//!
//! This crate provides:
//! - [`Selector`] - The derivation trait, with plain function selectors
//! - [`create_selector`] - Memoized composition of dependency selectors
//! - [`SelectorFactory`] - Selector construction under a [`SelectorConfig`]
//! - [`default_memoize`] / [`result_memoize`] - Standalone memoized functions
//! - [`create_feature_selector`] - Named slices of a [`RootState`]

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod feature;
pub mod memoize;
pub mod selector;

pub use collate_foundation::SameValue;
pub use config::{MemoStrategy, SelectorConfig};
pub use feature::{FeatureSelector, FeatureSource, RootState, create_feature_selector};
pub use memoize::{
    EqualityCheck, MemoizedProjection, default_memoize, result_memoize, same_value_check,
};
pub use selector::{
    Dependencies, FnSelector, MemoizedSelector, Projector, PropsFnSelector, PropsSelector,
    Selector, SelectorFactory, SharedSelector, create_selector, create_selector_factory,
    create_selector_with_props, props_fn, select_props, selector_fn,
};
