//! Configuration for selector construction.

use std::num::NonZeroUsize;

/// How many recent argument tuples a memo slot remembers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MemoStrategy {
    /// Remember only the immediately preceding call.
    #[default]
    Single,
    /// Remember up to `n` recent calls, evicting the least recently used.
    ///
    /// Useful for selectors fed by props that alternate between a few
    /// values across call sites.
    Lru(NonZeroUsize),
}

impl MemoStrategy {
    /// Returns the number of cached entries this strategy keeps.
    #[must_use]
    pub fn capacity(self) -> usize {
        match self {
            Self::Single => 1,
            Self::Lru(n) => n.get(),
        }
    }
}

/// Configuration threaded into every selector a factory builds.
///
/// Controls memoization and diagnostics.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectorConfig {
    /// Recompute on every call, ignoring cached results.
    ///
    /// Meant for tests that swap whole states between assertions.
    pub memoization_disabled: bool,

    /// Memo slot strategy.
    pub strategy: MemoStrategy,

    /// Log a warning when a feature selector finds no slice.
    pub warn_on_missing_feature: bool,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            memoization_disabled: false,
            strategy: MemoStrategy::Single,
            warn_on_missing_feature: true,
        }
    }
}

impl SelectorConfig {
    /// Creates a new configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a configuration for tests: no memoization, no warnings.
    #[must_use]
    pub fn testing() -> Self {
        Self {
            memoization_disabled: true,
            strategy: MemoStrategy::Single,
            warn_on_missing_feature: false,
        }
    }

    /// Builder method to disable or enable memoization.
    #[must_use]
    pub fn with_memoization_disabled(mut self, disabled: bool) -> Self {
        self.memoization_disabled = disabled;
        self
    }

    /// Builder method to set the memo strategy.
    #[must_use]
    pub fn with_strategy(mut self, strategy: MemoStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Builder method to use an LRU memo of the given capacity.
    ///
    /// A capacity of zero falls back to [`MemoStrategy::Single`].
    #[must_use]
    pub fn with_lru(self, capacity: usize) -> Self {
        let strategy = NonZeroUsize::new(capacity).map_or(MemoStrategy::Single, MemoStrategy::Lru);
        self.with_strategy(strategy)
    }

    /// Builder method to enable/disable missing feature warnings.
    #[must_use]
    pub fn with_warn_on_missing_feature(mut self, warn: bool) -> Self {
        self.warn_on_missing_feature = warn;
        self
    }
}
