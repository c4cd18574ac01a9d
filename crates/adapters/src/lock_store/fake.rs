// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake lock store for testing
//!
//! Wraps a [`MemoryLockStore`] and adds outage simulation, latency, a hook
//! that advances a fake clock on every set, and call recording.
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{LockStore, LockStoreError, MemoryLockStore};
use async_trait::async_trait;
use sg_core::{Clock, FakeClock, SystemClock};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Recorded lock store call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LockStoreCall {
    TrySet {
        key: String,
        token: String,
        ttl: Duration,
    },
    TryDelete {
        key: String,
        token: String,
    },
}

/// Lock store with controllable failures
#[derive(Clone)]
pub struct FakeLockStore<C: Clock = SystemClock> {
    inner: MemoryLockStore<C>,
    reachable: Arc<AtomicBool>,
    latency: Arc<Mutex<Duration>>,
    advance_on_set: Arc<Mutex<Option<(FakeClock, Duration)>>>,
    calls: Arc<Mutex<Vec<LockStoreCall>>>,
}

impl FakeLockStore<SystemClock> {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_clock(name, SystemClock)
    }
}

impl<C: Clock> FakeLockStore<C> {
    pub fn with_clock(name: impl Into<String>, clock: C) -> Self {
        Self {
            inner: MemoryLockStore::with_clock(name, clock),
            reachable: Arc::new(AtomicBool::new(true)),
            latency: Arc::new(Mutex::new(Duration::ZERO)),
            advance_on_set: Arc::new(Mutex::new(None)),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Make every call fail with `Unreachable` (or succeed again)
    pub fn set_reachable(&self, reachable: bool) {
        self.reachable.store(reachable, Ordering::SeqCst);
    }

    /// Delay every call by `latency` (tokio time)
    pub fn set_latency(&self, latency: Duration) {
        *self.latency.lock().unwrap_or_else(|e| e.into_inner()) = latency;
    }

    /// Advance `clock` by `step` on every `try_set`, simulating slow round-trips
    pub fn advance_on_set(&self, clock: FakeClock, step: Duration) {
        *self.advance_on_set.lock().unwrap_or_else(|e| e.into_inner()) = Some((clock, step));
    }

    /// Current unexpired owner of `key`
    pub fn holder(&self, key: &str) -> Option<String> {
        self.inner.holder(key)
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<LockStoreCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Number of recorded `try_delete` calls for `key`
    pub fn delete_count(&self, key: &str) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, LockStoreCall::TryDelete { key: k, .. } if k == key))
            .count()
    }

    fn record(&self, call: LockStoreCall) {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(call);
    }

    async fn simulate_network(&self) -> Result<(), LockStoreError> {
        let latency = *self.latency.lock().unwrap_or_else(|e| e.into_inner());
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        if !self.reachable.load(Ordering::SeqCst) {
            return Err(LockStoreError::Unreachable {
                store: self.inner.name().to_string(),
                reason: "connection refused".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl<C: Clock> LockStore for FakeLockStore<C> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn try_set(
        &self,
        key: &str,
        token: &str,
        ttl: Duration,
    ) -> Result<bool, LockStoreError> {
        self.record(LockStoreCall::TrySet {
            key: key.to_string(),
            token: token.to_string(),
            ttl,
        });
        let advance = self
            .advance_on_set
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone();
        if let Some((clock, step)) = advance {
            clock.advance(step);
        }
        self.simulate_network().await?;
        self.inner.try_set(key, token, ttl).await
    }

    async fn try_delete(&self, key: &str, token: &str) -> Result<bool, LockStoreError> {
        self.record(LockStoreCall::TryDelete {
            key: key.to_string(),
            token: token.to_string(),
        });
        self.simulate_network().await?;
        self.inner.try_delete(key, token).await
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
