//! Error types for the Collate system.
//!
//! Uses `thiserror` for ergonomic error definition. Collection operators
//! never fail; errors only come from validating externally built state
//! and from strict feature lookups.

use thiserror::Error;

/// The main error type for Collate operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind }
    }

    /// Creates a duplicate id error.
    #[must_use]
    pub fn duplicate_id(id: impl Into<String>) -> Self {
        Self::new(ErrorKind::DuplicateId(id.into()))
    }

    /// Creates an error for an id listed without a stored entity.
    #[must_use]
    pub fn missing_entity(id: impl Into<String>) -> Self {
        Self::new(ErrorKind::MissingEntity(id.into()))
    }

    /// Creates an error for a stored entity whose id is not listed.
    #[must_use]
    pub fn orphan_entity(id: impl Into<String>) -> Self {
        Self::new(ErrorKind::OrphanEntity(id.into()))
    }

    /// Creates a feature not found error.
    #[must_use]
    pub fn feature_not_found(key: impl Into<String>) -> Self {
        Self::new(ErrorKind::FeatureNotFound(key.into()))
    }

    /// Creates a feature type mismatch error.
    #[must_use]
    pub fn feature_type_mismatch(key: impl Into<String>, expected: &'static str) -> Self {
        Self::new(ErrorKind::FeatureTypeMismatch {
            key: key.into(),
            expected,
        })
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    /// The same id appears more than once in the id sequence.
    #[error("duplicate id: {0}")]
    DuplicateId(String),

    /// An id in the sequence has no entity.
    #[error("id {0} has no entity")]
    MissingEntity(String),

    /// An entity is stored under an id missing from the sequence.
    #[error("entity {0} is not listed in ids")]
    OrphanEntity(String),

    /// The root state has no slice under the feature key.
    #[error("feature not found: {0}")]
    FeatureNotFound(String),

    /// The feature slice exists but holds a different type.
    #[error("feature {key} is not a {expected}")]
    FeatureTypeMismatch {
        /// The feature key that was looked up.
        key: String,
        /// Name of the type the caller asked for.
        expected: &'static str,
    },
}
