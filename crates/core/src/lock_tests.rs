// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::clock::FakeClock;
use proptest::prelude::*;
use yare::parameterized;

#[parameterized(
    single_store = { 1, 1 },
    two_stores = { 2, 2 },
    three_stores = { 3, 2 },
    four_stores = { 4, 3 },
    five_stores = { 5, 3 },
)]
fn quorum_is_strict_majority(stores: usize, expected: usize) {
    assert_eq!(quorum_size(stores), expected);
}

#[test]
fn drift_margin_is_one_percent_plus_floor() {
    let drift = drift_margin(Duration::from_millis(5000), 0.01);
    assert_eq!(drift, Duration::from_millis(52));
}

#[parameterized(
    negative = { -0.5, 2 },
    nan = { f64::NAN, 2 },
    above_one = { 3.0, 1002 },
)]
fn drift_margin_clamps_factor(factor: f64, expected_ms: u64) {
    let drift = drift_margin(Duration::from_millis(1000), factor);
    assert_eq!(drift, Duration::from_millis(expected_ms));
}

#[test]
fn validity_subtracts_elapsed_and_drift() {
    let validity = remaining_validity(
        Duration::from_millis(5000),
        Duration::from_millis(120),
        Duration::from_millis(52),
    );
    assert_eq!(validity, Some(Duration::from_millis(4828)));
}

#[parameterized(
    elapsed_exceeds_ttl = { 5000, 5001, 0 },
    drift_consumes_rest = { 5000, 4990, 52 },
    exactly_zero = { 100, 50, 50 },
)]
fn validity_exhausted(ttl_ms: u64, elapsed_ms: u64, drift_ms: u64) {
    let validity = remaining_validity(
        Duration::from_millis(ttl_ms),
        Duration::from_millis(elapsed_ms),
        Duration::from_millis(drift_ms),
    );
    assert_eq!(validity, None);
}

#[test]
fn handle_expires_after_validity_not_ttl() {
    let clock = FakeClock::new();
    let handle = LockHandle::new(
        "product:1:lock",
        "token-1",
        Duration::from_secs(5),
        Duration::from_millis(4900),
        clock.now(),
    )
    .with_quorum(2);

    assert!(!handle.is_expired(&clock));
    assert_eq!(handle.quorum(), 2);
    assert_eq!(handle.ttl(), Duration::from_secs(5));

    clock.advance(Duration::from_millis(4899));
    assert!(!handle.is_expired(&clock));
    assert_eq!(handle.remaining(&clock), Duration::from_millis(1));

    clock.advance(Duration::from_millis(1));
    assert!(handle.is_expired(&clock));
    assert_eq!(handle.remaining(&clock), Duration::ZERO);
}

#[test]
fn needs_extension_below_threshold() {
    let clock = FakeClock::new();
    let handle = LockHandle::new(
        "product:1:lock",
        "token-1",
        Duration::from_secs(2),
        Duration::from_secs(2),
        clock.now(),
    );
    let threshold = Duration::from_millis(500);

    clock.advance(Duration::from_millis(1500));
    assert!(!handle.needs_extension(&clock, threshold));

    clock.advance(Duration::from_millis(1));
    assert!(handle.needs_extension(&clock, threshold));
}

proptest! {
    #[test]
    fn two_disjoint_groups_never_both_reach_quorum(stores in 1usize..64) {
        let quorum = quorum_size(stores);
        prop_assert!(quorum <= stores);
        prop_assert!(quorum * 2 > stores);
    }

    #[test]
    fn validity_never_exceeds_ttl(ttl_ms in 1u64..60_000, elapsed_ms in 0u64..60_000) {
        let ttl = Duration::from_millis(ttl_ms);
        let drift = drift_margin(ttl, 0.01);
        if let Some(validity) = remaining_validity(ttl, Duration::from_millis(elapsed_ms), drift) {
            prop_assert!(validity < ttl);
            prop_assert!(validity + drift + Duration::from_millis(elapsed_ms) == ttl);
        }
    }
}
