//! Integration tests for memoized selectors

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use collate_select::{
    MemoizedSelector, Selector, SelectorConfig, create_selector, create_selector_factory,
    default_memoize, result_memoize, selector_fn,
};

#[derive(Clone)]
struct Counter {
    count: u32,
    step: u32,
}

#[test]
fn projector_runs_once_per_distinct_input() {
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&calls);
    let total = create_selector(
        (
            selector_fn(|c: &Counter| c.count),
            selector_fn(|c: &Counter| c.step),
        ),
        move |count: &u32, step: &u32| {
            seen.fetch_add(1, Ordering::SeqCst);
            count + step
        },
    );

    let state = Counter { count: 1, step: 2 };
    assert_eq!(total.select(&state), 3);
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    assert_eq!(total.select(&state), 3);
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    let next = Counter { count: 2, ..state };
    assert_eq!(total.select(&next), 4);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn only_the_last_input_is_remembered() {
    let doubled = create_selector((selector_fn(|c: &Counter| c.count),), |n: &u32| n * 2);
    let one = Counter { count: 1, step: 0 };
    let two = Counter { count: 2, step: 0 };

    doubled.select(&one);
    doubled.select(&two);
    doubled.select(&one);
    assert_eq!(doubled.recomputations(), 3);
}

#[test]
fn disabled_memoization_always_recomputes() {
    let factory = create_selector_factory(SelectorConfig::testing());
    let doubled = factory.create((selector_fn(|c: &Counter| c.count),), |n: &u32| n * 2);
    let state = Counter { count: 4, step: 0 };

    for _ in 0..3 {
        assert_eq!(doubled.select(&state), 8);
    }
    assert_eq!(doubled.recomputations(), 3);
}

#[test]
fn custom_argument_equality() {
    let factory = create_selector_factory(SelectorConfig::default());
    let parity: MemoizedSelector<Counter, (), (u32,), &str> = factory.create_with_equality(
        (selector_fn(|c: &Counter| c.count),),
        |n: &u32| if n % 2 == 0 { "even" } else { "odd" },
        Arc::new(|a: &(u32,), b: &(u32,)| a.0 % 2 == b.0 % 2),
    );

    assert_eq!(parity.select(&Counter { count: 2, step: 0 }), "even");
    assert_eq!(parity.select(&Counter { count: 4, step: 0 }), "even");
    assert_eq!(parity.recomputations(), 1);
}

#[test]
fn result_equality_keeps_previous_output() {
    let evens = create_selector(
        (selector_fn(|c: &Counter| c.count),),
        |n: &u32| Arc::new((0..*n).filter(|i| i % 2 == 0).collect::<Vec<_>>()),
    )
    .with_result_equality(Arc::new(|a: &Arc<Vec<u32>>, b: &Arc<Vec<u32>>| a == b));

    let first = evens.select(&Counter { count: 3, step: 0 });
    let second = evens.select(&Counter { count: 4, step: 0 });
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(evens.recomputations(), 2);
}

#[test]
fn standalone_memoized_functions() {
    let square = default_memoize(|n: &u64| n * n);
    assert_eq!(square.invoke(3), 9);
    assert_eq!(square.invoke(3), 9);
    assert_eq!(square.recomputations(), 1);

    square.set_result(0);
    assert_eq!(square.invoke(5), 0);
    square.clear_result();
    assert_eq!(square.invoke(5), 25);

    let words = result_memoize(
        |s: &String| s.split_whitespace().map(str::to_owned).collect::<Vec<_>>(),
        Arc::new(|a: &Vec<String>, b: &Vec<String>| a == b),
    );
    let a = words.invoke("a b".to_string());
    let b = words.invoke("a  b".to_string());
    assert_eq!(a, b);
    assert_eq!(words.recomputations(), 2);
}

#[test]
fn shared_selector_is_one_cache() {
    let doubled = Arc::new(create_selector(
        (selector_fn(|c: &Counter| c.count),),
        |n: &u32| n * 2,
    ));
    let other_holder = Arc::clone(&doubled);
    let state = Counter { count: 5, step: 0 };

    doubled.select(&state);
    other_holder.select(&state);
    assert_eq!(doubled.recomputations(), 1);
}

#[test]
fn selectors_work_across_threads() {
    let doubled = Arc::new(create_selector(
        (selector_fn(|c: &Counter| c.count),),
        |n: &u32| n * 2,
    ));

    let handles: Vec<_> = (0..4_u32)
        .map(|i| {
            let doubled = Arc::clone(&doubled);
            std::thread::spawn(move || doubled.select(&Counter { count: i, step: 0 }))
        })
        .collect();

    let mut results: Vec<u32> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    results.sort_unstable();
    assert_eq!(results, vec![0, 2, 4, 6]);
}
