//! Normalized entity collections for Collate.
//!
//! A collection stores each entity once, under the id an application
//! function reads from it, next to an ordered list of ids. Operators are
//! pure: each takes a state and returns a new one, sharing every untouched
//! entity with its input.
//!
//! This crate provides:
//! - [`EntityState`] - Immutable collection snapshot
//! - [`EntityAdapter`] - Add, set, update, upsert, map and remove operators
//! - [`create_state_operator`] - The copy-on-write wrapper behind every operator
//! - [`EntityContainer`] - Operators over states that embed a collection
//! - `selectors` - Memoized selectors over a collection (feature `selectors`)

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod adapter;
pub mod operator;
#[cfg(feature = "selectors")]
pub mod selectors;
pub mod state;

pub use adapter::{Comparer, EntityAdapter, SelectId};
pub use collate_foundation::{Patch, Update};
pub use operator::{DidMutate, Draft, create_state_operator};
#[cfg(feature = "selectors")]
pub use selectors::EntitySelectors;
pub use state::{EntityContainer, EntityState};
