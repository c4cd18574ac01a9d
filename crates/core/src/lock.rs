// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Quorum lock arithmetic and the handle issued on successful acquisition
//!
//! A lock is held when a strict majority of independent stores accepted the
//! same ownership token and the time spent collecting those answers (plus a
//! clock-drift margin) still leaves part of the ttl unused.

use crate::clock::Clock;
use std::time::{Duration, Instant};

/// Fixed part of the drift margin, covering timer granularity at the stores
const DRIFT_FLOOR: Duration = Duration::from_millis(2);

/// Number of stores that must accept a set for `n` stores
pub fn quorum_size(n: usize) -> usize {
    n / 2 + 1
}

/// Clock-drift allowance subtracted from the lock validity.
///
/// The factor is clamped to `[0, 1]`; NaN counts as zero.
pub fn drift_margin(ttl: Duration, drift_factor: f64) -> Duration {
    let factor = if drift_factor > 0.0 {
        drift_factor.min(1.0)
    } else {
        0.0
    };
    ttl.mul_f64(factor) + DRIFT_FLOOR
}

/// Validity left after spending `elapsed` on acquisition, `None` if exhausted
pub fn remaining_validity(ttl: Duration, elapsed: Duration, drift: Duration) -> Option<Duration> {
    ttl.checked_sub(elapsed)?
        .checked_sub(drift)
        .filter(|validity| !validity.is_zero())
}

/// Ownership of a resource key across a quorum of lock stores
#[derive(Clone, Debug)]
pub struct LockHandle {
    resource: String,
    token: String,
    ttl: Duration,
    validity: Duration,
    valid_until: Instant,
    quorum: usize,
    attempts: u32,
}

impl LockHandle {
    /// Build a handle whose validity window starts at `now`
    pub fn new(
        resource: impl Into<String>,
        token: impl Into<String>,
        ttl: Duration,
        validity: Duration,
        now: Instant,
    ) -> Self {
        Self {
            resource: resource.into(),
            token: token.into(),
            ttl,
            validity,
            valid_until: now + validity,
            quorum: 0,
            attempts: 1,
        }
    }

    /// Record how many stores accepted the set
    pub fn with_quorum(mut self, accepted: usize) -> Self {
        self.quorum = accepted;
        self
    }

    /// Record which attempt succeeded (1-based)
    pub fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts;
        self
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    /// Nominal ttl requested from the stores
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Validity window granted at acquisition (ttl minus elapsed and drift)
    pub fn validity(&self) -> Duration {
        self.validity
    }

    pub fn valid_until(&self) -> Instant {
        self.valid_until
    }

    /// Stores that accepted the conditional set
    pub fn quorum(&self) -> usize {
        self.quorum
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn is_expired(&self, clock: &impl Clock) -> bool {
        clock.now() >= self.valid_until
    }

    pub fn remaining(&self, clock: &impl Clock) -> Duration {
        self.valid_until.saturating_duration_since(clock.now())
    }

    /// True once the remaining validity drops below `threshold`.
    ///
    /// Nothing renews the lock automatically; callers only use this to warn
    /// that the critical section is running close to the ttl.
    pub fn needs_extension(&self, clock: &impl Clock, threshold: Duration) -> bool {
        self.remaining(clock) < threshold
    }
}

#[cfg(test)]
#[path = "lock_tests.rs"]
mod tests;
