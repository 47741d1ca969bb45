//! Tests for eager and lazy `CountingBarrier` sizing.

use crate::coordination::{CoordinationError, CountingBarrier};
use rstest::rstest;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

fn counting_fires(barrier: &CountingBarrier<String>) -> Arc<AtomicUsize> {
    let fires = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&fires);
    barrier.on_complete(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    fires
}

#[rstest]
#[case(1)]
#[case(2)]
#[case(5)]
#[case(17)]
fn fires_exactly_once_after_the_nth_arrival(#[case] expected: usize) {
    let barrier = CountingBarrier::<String>::new();
    let fires = counting_fires(&barrier);
    barrier.set_expected(expected).expect("expected count accepted");

    for _ in 1..expected {
        barrier.arrive().expect("arrival accepted");
        assert_eq!(fires.load(Ordering::SeqCst), 0);
    }
    barrier.arrive().expect("final arrival accepted");

    assert_eq!(fires.load(Ordering::SeqCst), 1);
    assert_eq!(barrier.outcome(), Some(Ok(())));
}

#[rstest]
fn lazy_zero_fires_without_arrivals() {
    let barrier = CountingBarrier::<String>::new();
    let fires = counting_fires(&barrier);
    assert!(!barrier.is_complete());
    assert_eq!(barrier.expected(), None);

    barrier.set_expected(0).expect("zero accepted");

    assert!(barrier.is_complete());
    assert_eq!(fires.load(Ordering::SeqCst), 1);
}

#[rstest]
fn eager_zero_is_complete_on_construction() {
    let barrier = CountingBarrier::<String>::with_expected(0);

    let fires = counting_fires(&barrier);

    assert_eq!(fires.load(Ordering::SeqCst), 1);
    assert_eq!(barrier.expected(), Some(0));
}

#[rstest]
fn arrivals_before_expected_count_are_kept() {
    let barrier = CountingBarrier::<String>::new();
    let fires = counting_fires(&barrier);
    barrier.arrive().expect("early arrival accepted");
    barrier.arrive().expect("early arrival accepted");
    assert_eq!(fires.load(Ordering::SeqCst), 0);

    barrier.set_expected(2).expect("expected count accepted");

    assert_eq!(fires.load(Ordering::SeqCst), 1);
    assert_eq!(barrier.arrived(), 2);
}

#[rstest]
fn expected_count_can_only_be_set_once() {
    let barrier = CountingBarrier::<String>::new();
    barrier.set_expected(3).expect("first call accepted");

    let result = barrier.set_expected(4);

    assert_eq!(
        result,
        Err(CoordinationError::ExpectedAlreadySet { expected: 3 })
    );
}

#[rstest]
fn arrival_beyond_expected_overflows() {
    let barrier = CountingBarrier::<String>::with_expected(1);
    barrier.arrive().expect("arrival accepted");

    let result = barrier.arrive();

    assert_eq!(
        result,
        Err(CoordinationError::Overflow {
            expected: 1,
            arrived: 2
        })
    );
}

#[rstest]
fn expected_below_early_arrivals_overflows() {
    let barrier = CountingBarrier::<String>::new();
    barrier.arrive().expect("arrival accepted");
    barrier.arrive().expect("arrival accepted");

    let result = barrier.set_expected(1);

    assert_eq!(
        result,
        Err(CoordinationError::Overflow {
            expected: 1,
            arrived: 2
        })
    );
}

#[rstest]
fn fail_fires_error_and_ignores_later_arrivals() {
    let barrier = CountingBarrier::<String>::with_expected(2);
    let fires = counting_fires(&barrier);

    assert!(barrier.fail("dialog list rejected".to_owned()));
    barrier.arrive().expect("arrival after failure is ignored");
    barrier.arrive().expect("arrival after failure is ignored");
    barrier.arrive().expect("arrival after failure is ignored");

    assert_eq!(fires.load(Ordering::SeqCst), 1);
    assert_eq!(
        barrier.outcome(),
        Some(Err("dialog list rejected".to_owned()))
    );
}

#[rstest]
fn fail_after_completion_is_a_no_op() {
    let barrier = CountingBarrier::<String>::with_expected(1);
    barrier.arrive().expect("arrival accepted");

    assert!(!barrier.fail("too late".to_owned()));
    assert_eq!(barrier.outcome(), Some(Ok(())));
}

#[rstest]
#[tokio::test]
async fn wait_resolves_when_count_is_reached() {
    let barrier = CountingBarrier::<String>::new();
    let waiter = barrier.wait();
    barrier.arrive().expect("arrival accepted");

    barrier.set_expected(1).expect("expected count accepted");

    assert_eq!(waiter.await, Ok(Ok(())));
}
