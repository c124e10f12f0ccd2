//! Core types and persistent collections for Collate.
//!
//! This crate provides:
//! - [`IdList`] - Ordered, persistent sequence of entity ids
//! - [`EntityMap`] - Persistent id to entity map with shared values
//! - [`Patch`] and [`Update`] - Explicit partial changes to an entity
//! - [`SameValue`] - Identity comparison used by memoization
//! - [`Error`] - Error types with structured kinds

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod collections;
pub mod error;
pub mod identity;
pub mod patch;

pub use collections::{EntityMap, IdList};
pub use error::{Error, ErrorKind};
pub use identity::SameValue;
pub use patch::{Patch, Update};

/// Result type alias using Collate's Error.
pub type Result<T> = std::result::Result<T, Error>;
