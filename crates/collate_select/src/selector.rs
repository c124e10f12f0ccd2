//! Selectors and their memoized composition.
//!
//! A selector is anything implementing [`Selector`]: plain functions wrapped
//! with [`selector_fn`], feature selectors, or memoized selectors built with
//! [`create_selector`]. Memoized selectors take a tuple of dependency
//! selectors and a projector over references to their results:
//!
//! ```
//! use std::sync::Arc;
//! use collate_select::{Selector, create_selector, selector_fn};
//!
//! struct Cart {
//!     prices: Arc<Vec<u32>>,
//!     discount: u32,
//! }
//!
//! let total = create_selector(
//!     (
//!         selector_fn(|cart: &Cart| Arc::clone(&cart.prices)),
//!         selector_fn(|cart: &Cart| cart.discount),
//!     ),
//!     |prices: &Arc<Vec<u32>>, discount: &u32| prices.iter().sum::<u32>() - discount,
//! );
//!
//! let cart = Cart { prices: Arc::new(vec![10, 20]), discount: 5 };
//! assert_eq!(total.select(&cart), 25);
//! assert_eq!(total.select(&cart), 25);
//! assert_eq!(total.recomputations(), 1);
//! ```
//!
//! Dependencies are evaluated on every call, leaves first. Comparison is
//! per tuple, not per field: any changed element reruns the projector.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use collate_foundation::SameValue;

use crate::config::SelectorConfig;
use crate::memoize::{EqualityCheck, MemoizedProjection, same_value_check};

// =============================================================================
// Selector trait
// =============================================================================

/// Derives a value from a state and optional props.
pub trait Selector<S, P = ()> {
    /// The derived value.
    type Output: Clone;

    /// Derives the value for `state` under `props`.
    fn select_with(&self, state: &S, props: &P) -> Self::Output;

    /// Derives the value for `state` with default props.
    fn select(&self, state: &S) -> Self::Output
    where
        P: Default,
    {
        self.select_with(state, &P::default())
    }
}

impl<S, P, X> Selector<S, P> for Arc<X>
where
    X: Selector<S, P> + ?Sized,
{
    type Output = X::Output;

    fn select_with(&self, state: &S, props: &P) -> Self::Output {
        (**self).select_with(state, props)
    }
}

/// A type-erased selector shared between several parents.
pub type SharedSelector<S, O, P = ()> = Arc<dyn Selector<S, P, Output = O> + Send + Sync>;

// =============================================================================
// Function selectors
// =============================================================================

/// Selector backed by a plain function of the state.
#[derive(Clone, Copy)]
pub struct FnSelector<F>(F);

/// Wraps a function of the state as a selector.
pub fn selector_fn<S, O, F>(f: F) -> FnSelector<F>
where
    F: Fn(&S) -> O,
{
    FnSelector(f)
}

impl<F> FnSelector<F> {
    /// Applies the function to `state`.
    pub fn select<S, O>(&self, state: &S) -> O
    where
        F: Fn(&S) -> O,
    {
        (self.0)(state)
    }
}

impl<S, P, O, F> Selector<S, P> for FnSelector<F>
where
    F: Fn(&S) -> O,
    O: Clone,
{
    type Output = O;

    fn select_with(&self, state: &S, _props: &P) -> O {
        (self.0)(state)
    }
}

impl<F> fmt::Debug for FnSelector<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnSelector")
    }
}

/// Selector backed by a function of the state and props.
#[derive(Clone, Copy)]
pub struct PropsFnSelector<F>(F);

/// Wraps a function of the state and props as a selector.
pub fn props_fn<S, P, O, F>(f: F) -> PropsFnSelector<F>
where
    F: Fn(&S, &P) -> O,
{
    PropsFnSelector(f)
}

impl<S, P, O, F> Selector<S, P> for PropsFnSelector<F>
where
    F: Fn(&S, &P) -> O,
    O: Clone,
{
    type Output = O;

    fn select_with(&self, state: &S, props: &P) -> O {
        (self.0)(state, props)
    }
}

impl<F> fmt::Debug for PropsFnSelector<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PropsFnSelector")
    }
}

/// Selector returning the props themselves.
pub struct PropsSelector<P>(PhantomData<fn() -> P>);

/// Selects the props, so projectors can depend on them.
#[must_use]
pub fn select_props<P>() -> PropsSelector<P> {
    PropsSelector(PhantomData)
}

impl<S, P: Clone> Selector<S, P> for PropsSelector<P> {
    type Output = P;

    fn select_with(&self, _state: &S, props: &P) -> P {
        props.clone()
    }
}

impl<P> fmt::Debug for PropsSelector<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PropsSelector")
    }
}

// =============================================================================
// Dependencies and projectors
// =============================================================================

/// A tuple of selectors evaluated together.
pub trait Dependencies<S, P> {
    /// Tuple of each selector's output.
    type Output;

    /// Evaluates every selector, in order.
    fn evaluate(&self, state: &S, props: &P) -> Self::Output;
}

/// A function over references to every dependency result.
pub trait Projector<Args, O> {
    /// Computes the output from the dependency results.
    fn project(&self, args: &Args) -> O;
}

macro_rules! dependencies_tuple {
    ($($name:ident : $idx:tt),+) => {
        impl<S, P, $($name),+> Dependencies<S, P> for ($($name,)+)
        where
            $($name: Selector<S, P>,)+
        {
            type Output = ($(<$name as Selector<S, P>>::Output,)+);

            fn evaluate(&self, state: &S, props: &P) -> Self::Output {
                ($(self.$idx.select_with(state, props),)+)
            }
        }

        impl<Func, Out, $($name),+> Projector<($($name,)+), Out> for Func
        where
            Func: Fn($(&$name),+) -> Out,
        {
            fn project(&self, args: &($($name,)+)) -> Out {
                self($(&args.$idx),+)
            }
        }
    };
}

dependencies_tuple!(A: 0);
dependencies_tuple!(A: 0, B: 1);
dependencies_tuple!(A: 0, B: 1, C: 2);
dependencies_tuple!(A: 0, B: 1, C: 2, D: 3);
dependencies_tuple!(A: 0, B: 1, C: 2, D: 3, E: 4);
dependencies_tuple!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5);
dependencies_tuple!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6);
dependencies_tuple!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6, H: 7);

// =============================================================================
// Memoized selector
// =============================================================================

/// A selector that caches its projector's result against the tuple of
/// dependency results.
///
/// Share one instance between call sites through an `Arc`; every holder
/// then observes the same cache.
pub struct MemoizedSelector<S, P, A, O> {
    dependencies: Box<dyn Dependencies<S, P, Output = A> + Send + Sync>,
    projection: MemoizedProjection<A, O>,
}

impl<S, P, A, O: Clone> MemoizedSelector<S, P, A, O> {
    /// Keeps the previous result when a recomputed one is equal under
    /// `result_equal`, so consumers comparing by identity see no change.
    #[must_use]
    pub fn with_result_equality(mut self, result_equal: EqualityCheck<O>) -> Self {
        self.projection = self.projection.with_result_equality(result_equal);
        self
    }

    /// Runs the projector on explicit dependency results, skipping the memo.
    pub fn project(&self, args: &A) -> O {
        self.projection.project(args)
    }

    /// Forgets every cached result.
    pub fn release(&self) {
        self.projection.reset();
    }

    /// Pins the result returned by every call until [`clear_result`](Self::clear_result).
    pub fn set_result(&self, result: O) {
        self.projection.set_result(result);
    }

    /// Removes a pinned result.
    pub fn clear_result(&self) {
        self.projection.clear_result();
    }

    /// Returns how many times the projector has run.
    #[must_use]
    pub fn recomputations(&self) -> usize {
        self.projection.recomputations()
    }

    /// Resets the projector run counter.
    pub fn reset_recomputations(&self) {
        self.projection.reset_recomputations();
    }
}

impl<S, P, A, O: Clone> Selector<S, P> for MemoizedSelector<S, P, A, O> {
    type Output = O;

    fn select_with(&self, state: &S, props: &P) -> O {
        let args = self.dependencies.evaluate(state, props);
        self.projection.invoke(args)
    }
}

impl<S, P, A, O> fmt::Debug for MemoizedSelector<S, P, A, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoizedSelector")
            .field("projection", &self.projection)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Factory
// =============================================================================

/// Builds memoized selectors under one [`SelectorConfig`].
#[derive(Clone, Debug, Default)]
pub struct SelectorFactory {
    config: SelectorConfig,
}

impl SelectorFactory {
    /// Creates a factory with the given configuration.
    #[must_use]
    pub fn new(config: SelectorConfig) -> Self {
        Self { config }
    }

    /// Returns the factory's configuration.
    #[must_use]
    pub fn config(&self) -> &SelectorConfig {
        &self.config
    }

    /// Creates a memoized selector without props.
    pub fn create<S, D, F, O>(&self, dependencies: D, projector: F) -> MemoizedSelector<S, (), D::Output, O>
    where
        D: Dependencies<S, ()> + Send + Sync + 'static,
        D::Output: SameValue + 'static,
        F: Projector<D::Output, O> + Send + Sync + 'static,
        O: Clone,
    {
        self.create_with_props(dependencies, projector)
    }

    /// Creates a memoized selector whose dependencies receive props.
    pub fn create_with_props<S, P, D, F, O>(
        &self,
        dependencies: D,
        projector: F,
    ) -> MemoizedSelector<S, P, D::Output, O>
    where
        D: Dependencies<S, P> + Send + Sync + 'static,
        D::Output: SameValue + 'static,
        F: Projector<D::Output, O> + Send + Sync + 'static,
        O: Clone,
    {
        self.create_with_equality(dependencies, projector, same_value_check())
    }

    /// Creates a memoized selector comparing dependency tuples with
    /// `args_equal` instead of [`SameValue`].
    pub fn create_with_equality<S, P, D, F, O>(
        &self,
        dependencies: D,
        projector: F,
        args_equal: EqualityCheck<D::Output>,
    ) -> MemoizedSelector<S, P, D::Output, O>
    where
        D: Dependencies<S, P> + Send + Sync + 'static,
        F: Projector<D::Output, O> + Send + Sync + 'static,
        O: Clone,
    {
        let projection = MemoizedProjection::new(
            move |args: &D::Output| projector.project(args),
            args_equal,
            &self.config,
        );
        MemoizedSelector {
            dependencies: Box::new(dependencies),
            projection,
        }
    }
}

/// Creates a factory that builds selectors under `config`.
#[must_use]
pub fn create_selector_factory(config: SelectorConfig) -> SelectorFactory {
    SelectorFactory::new(config)
}

/// Creates a memoized selector with the default configuration.
pub fn create_selector<S, D, F, O>(dependencies: D, projector: F) -> MemoizedSelector<S, (), D::Output, O>
where
    D: Dependencies<S, ()> + Send + Sync + 'static,
    D::Output: SameValue + 'static,
    F: Projector<D::Output, O> + Send + Sync + 'static,
    O: Clone,
{
    SelectorFactory::default().create(dependencies, projector)
}

/// Creates a memoized selector with props and the default configuration.
pub fn create_selector_with_props<S, P, D, F, O>(
    dependencies: D,
    projector: F,
) -> MemoizedSelector<S, P, D::Output, O>
where
    D: Dependencies<S, P> + Send + Sync + 'static,
    D::Output: SameValue + 'static,
    F: Projector<D::Output, O> + Send + Sync + 'static,
    O: Clone,
{
    SelectorFactory::default().create_with_props(dependencies, projector)
}
