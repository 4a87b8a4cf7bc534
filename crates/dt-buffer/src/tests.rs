//! Unit tests for dt-buffer primitives.

use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use crate::buffered::{set_current_phase, Phase};
use crate::{DoubleBuffered, FlexiBarrier, FlipSet};

#[test]
fn get_reflects_initial_value() {
    let field = DoubleBuffered::new(42i32);
    assert_eq!(field.get(), 42);
}

#[test]
fn set_does_not_take_effect_until_flip() {
    set_current_phase(Phase::Tick);
    let field = DoubleBuffered::new(1i32);
    field.set(2);
    assert_eq!(field.get(), 1, "current must not change before flip");
    assert!(field.is_dirty());
    field.flip();
    assert_eq!(field.get(), 2);
    assert!(!field.is_dirty());
}

#[test]
fn flip_without_set_is_a_no_op() {
    let field = DoubleBuffered::new("a");
    field.flip();
    assert_eq!(field.get(), "a");
}

#[test]
fn repeated_set_before_flip_keeps_last_write() {
    set_current_phase(Phase::Tick);
    let field = DoubleBuffered::new(0i32);
    field.set(10);
    field.set(20);
    field.set(30);
    field.flip();
    assert_eq!(field.get(), 30);
}

#[test]
fn flip_set_flips_every_subscribed_field() {
    set_current_phase(Phase::Tick);
    let position = Rc::new(DoubleBuffered::new(0.0f32));
    let speed = Rc::new(DoubleBuffered::new(1.0f32));

    let mut flips = FlipSet::new();
    flips.subscribe(position.clone());
    flips.subscribe(speed.clone());
    assert_eq!(flips.len(), 2);

    position.set(5.0);
    speed.set(2.0);
    flips.flip_all();

    assert_eq!(position.get(), 5.0);
    assert_eq!(speed.get(), 2.0);
}

#[test]
fn flip_set_starts_empty() {
    let flips = FlipSet::new();
    assert!(flips.is_empty());
}

#[test]
fn barrier_releases_after_all_single_contributions() {
    let barrier = Arc::new(FlexiBarrier::new(3));
    let counter = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..3)
        .map(|_| {
            let barrier = barrier.clone();
            let counter = counter.clone();
            thread::spawn(move || {
                counter.fetch_add(1, Ordering::SeqCst);
                barrier.wait();
                // Every thread should observe all three arrivals by now.
                counter.load(Ordering::SeqCst)
            })
        })
        .collect();

    for h in handles {
        assert_eq!(h.join().unwrap(), 3);
    }
}

#[test]
fn barrier_honors_weighted_contributions() {
    // Three workers owning 2, 3, and 5 entities respectively; the round
    // must wait for all 10 contributions, not just 3 arrivals.
    let barrier = Arc::new(FlexiBarrier::new(10));
    let weights = [2usize, 3, 5];

    let handles: Vec<_> = weights
        .iter()
        .map(|&k| {
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.contribute(k);
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }
    assert_eq!(barrier.parties(), 10);
}

#[test]
fn barrier_exactly_one_leader_per_round() {
    let barrier = Arc::new(FlexiBarrier::new(4));
    let leaders = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let barrier = barrier.clone();
            let leaders = leaders.clone();
            thread::spawn(move || {
                let result = barrier.wait();
                if result.is_leader() {
                    leaders.fetch_add(1, Ordering::SeqCst);
                }
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }
    assert_eq!(leaders.load(Ordering::SeqCst), 1);
}

#[test]
fn barrier_supports_multiple_rounds() {
    let barrier = Arc::new(FlexiBarrier::new(2));
    for _ in 0..5 {
        let b1 = barrier.clone();
        let b2 = barrier.clone();
        let h1 = thread::spawn(move || b1.wait());
        let h2 = thread::spawn(move || b2.wait());
        h1.join().unwrap();
        h2.join().unwrap();
    }
}

#[test]
fn barrier_zero_contribution_still_waits_for_round() {
    let barrier = Arc::new(FlexiBarrier::new(2));
    let order = Arc::new(AtomicUsize::new(0));

    let b1 = barrier.clone();
    let o1 = order.clone();
    let idle = thread::spawn(move || {
        // Arrives with nothing to contribute but must not return before
        // the round actually completes.
        b1.contribute(0);
        o1.fetch_add(1, Ordering::SeqCst)
    });

    thread::sleep(std::time::Duration::from_millis(20));
    assert_eq!(order.load(Ordering::SeqCst), 0, "idle waiter returned early");

    let b2 = barrier.clone();
    let completer = thread::spawn(move || b2.contribute(2));
    completer.join().unwrap();
    idle.join().unwrap();
}
