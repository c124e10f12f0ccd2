//! Collate - Normalized entity collections and memoized selectors
//!
//! This crate re-exports all layers of the Collate system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 2: collate_entity      - Entity collections, adapters, entity selectors
//! Layer 1: collate_select      - Selector trait, memoization, feature selectors
//! Layer 0: collate_foundation  - Persistent id list and entity map, Patch, Error
//! ```

pub use collate_entity as entity;
pub use collate_foundation as foundation;
pub use collate_select as select;
