//! Memoized functions.
//!
//! A [`MemoizedProjection`] wraps a pure function of one argument (for a
//! selector, the tuple of dependency results) and caches recent
//! argument/result pairs. A memo slot starts empty; the first call
//! populates it, later calls either hit (matching arguments, cached result
//! returned, projection skipped) or miss (projection runs, slot refreshed).
//!
//! The slot sits behind a `parking_lot::Mutex`. The lock is held only while
//! comparing and storing, never while the projection runs, so two threads
//! racing on a cold slot may both compute and the later store wins.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use collate_foundation::SameValue;
use parking_lot::Mutex;
use tracing::trace;

use crate::config::{MemoStrategy, SelectorConfig};

/// Strategy deciding whether two values count as equal for memoization.
pub type EqualityCheck<T> = Arc<dyn Fn(&T, &T) -> bool + Send + Sync>;

/// Returns the default equality check, [`SameValue::same_value`].
#[must_use]
pub fn same_value_check<T: SameValue + 'static>() -> EqualityCheck<T> {
    Arc::new(|previous: &T, next: &T| previous.same_value(next))
}

/// Recent argument/result pairs, most recent first.
struct Memo<A, O> {
    capacity: usize,
    entries: VecDeque<(A, O)>,
    pinned: Option<O>,
}

impl<A, O: Clone> Memo<A, O> {
    fn new(strategy: MemoStrategy) -> Self {
        Self {
            capacity: strategy.capacity(),
            entries: VecDeque::with_capacity(strategy.capacity()),
            pinned: None,
        }
    }

    fn lookup(&mut self, args: &A, equal: &EqualityCheck<A>) -> Option<O> {
        let index = self
            .entries
            .iter()
            .position(|(cached, _)| equal(cached, args))?;
        if index > 0 {
            let entry = self.entries.remove(index)?;
            self.entries.push_front(entry);
        }
        self.entries.front().map(|(_, result)| result.clone())
    }

    fn last_result(&self) -> Option<&O> {
        self.entries.front().map(|(_, result)| result)
    }

    fn store(&mut self, args: A, result: O) {
        self.entries.push_front((args, result));
        self.entries.truncate(self.capacity);
    }
}

/// A function wrapped with a memo slot.
pub struct MemoizedProjection<A, O> {
    projection: Arc<dyn Fn(&A) -> O + Send + Sync>,
    args_equal: EqualityCheck<A>,
    result_equal: Option<EqualityCheck<O>>,
    memoization_disabled: bool,
    memo: Mutex<Memo<A, O>>,
    recomputations: AtomicUsize,
}

impl<A, O: Clone> MemoizedProjection<A, O> {
    /// Wraps `projection`, comparing arguments with `args_equal`.
    pub fn new<F>(projection: F, args_equal: EqualityCheck<A>, config: &SelectorConfig) -> Self
    where
        F: Fn(&A) -> O + Send + Sync + 'static,
    {
        Self {
            projection: Arc::new(projection),
            args_equal,
            result_equal: None,
            memoization_disabled: config.memoization_disabled,
            memo: Mutex::new(Memo::new(config.strategy)),
            recomputations: AtomicUsize::new(0),
        }
    }

    /// Also memoizes on the result: when a recomputed result equals the
    /// previous one under `result_equal`, the previous result is returned
    /// so downstream identity checks see no change.
    #[must_use]
    pub fn with_result_equality(mut self, result_equal: EqualityCheck<O>) -> Self {
        self.result_equal = Some(result_equal);
        self
    }

    /// Replaces the argument equality check.
    #[must_use]
    pub fn with_argument_equality(mut self, args_equal: EqualityCheck<A>) -> Self {
        self.args_equal = args_equal;
        self
    }

    /// Calls the function through the memo slot.
    pub fn invoke(&self, args: A) -> O {
        {
            let mut memo = self.memo.lock();
            if let Some(pinned) = &memo.pinned {
                return pinned.clone();
            }
            if !self.memoization_disabled {
                if let Some(hit) = memo.lookup(&args, &self.args_equal) {
                    trace!("memo hit");
                    return hit;
                }
            }
        }

        let computed = (self.projection)(&args);
        let count = self.recomputations.fetch_add(1, Ordering::Relaxed) + 1;
        trace!(recomputations = count, "projection recomputed");

        if self.memoization_disabled {
            return computed;
        }

        let mut memo = self.memo.lock();
        let result = match (&self.result_equal, memo.last_result()) {
            (Some(equal), Some(previous)) if equal(previous, &computed) => previous.clone(),
            _ => computed,
        };
        memo.store(args, result.clone());
        result
    }

    /// Calls the function directly, bypassing and leaving the memo alone.
    pub fn project(&self, args: &A) -> O {
        (self.projection)(args)
    }

    /// Clears every cached argument/result pair.
    pub fn reset(&self) {
        self.memo.lock().entries.clear();
    }

    /// Pins `result`: every call returns it until [`clear_result`](Self::clear_result).
    pub fn set_result(&self, result: O) {
        self.memo.lock().pinned = Some(result);
    }

    /// Removes a result pinned by [`set_result`](Self::set_result).
    pub fn clear_result(&self) {
        self.memo.lock().pinned = None;
    }

    /// Returns how many times the wrapped function has run through `invoke`.
    #[must_use]
    pub fn recomputations(&self) -> usize {
        self.recomputations.load(Ordering::Relaxed)
    }

    /// Resets the recomputation counter to zero.
    pub fn reset_recomputations(&self) {
        self.recomputations.store(0, Ordering::Relaxed);
    }
}

impl<A, O> fmt::Debug for MemoizedProjection<A, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoizedProjection")
            .field("memoization_disabled", &self.memoization_disabled)
            .field(
                "recomputations",
                &self.recomputations.load(Ordering::Relaxed),
            )
            .finish_non_exhaustive()
    }
}

/// Memoizes `projection` on its last argument, compared with [`SameValue`].
pub fn default_memoize<A, O, F>(projection: F) -> MemoizedProjection<A, O>
where
    A: SameValue + 'static,
    O: Clone,
    F: Fn(&A) -> O + Send + Sync + 'static,
{
    MemoizedProjection::new(projection, same_value_check(), &SelectorConfig::default())
}

/// Like [`default_memoize`], and also keeps the previous result when the
/// new one is equal under `is_result_equal`.
pub fn result_memoize<A, O, F>(projection: F, is_result_equal: EqualityCheck<O>) -> MemoizedProjection<A, O>
where
    A: SameValue + 'static,
    O: Clone,
    F: Fn(&A) -> O + Send + Sync + 'static,
{
    default_memoize(projection).with_result_equality(is_result_equal)
}
