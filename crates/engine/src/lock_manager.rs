// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Quorum lock manager
//!
//! Acquires a named lock on a majority of independent lock stores. An
//! attempt sets `key = token` on every store concurrently and succeeds when
//! at least `n/2 + 1` stores accepted and the time spent, plus a drift
//! margin, still leaves part of the ttl. A failed attempt deletes whatever
//! it did set, then retries after `retry_delay` plus random jitter.

use crate::error::LockError;
use futures::future::join_all;
use rand::Rng;
use sg_adapters::{LockStore, LockStoreError};
use sg_core::{
    drift_margin, quorum_size, remaining_validity, Clock, LockConfig, LockHandle, SystemClock,
    TokenGen, UuidTokenGen,
};
use std::time::Duration;
use tracing::Instrument;

fn millis(duration: Duration) -> u64 {
    duration.as_millis() as u64
}

/// Distributed lock over a fixed set of lock stores
pub struct QuorumLockManager<L, C = SystemClock, G = UuidTokenGen> {
    stores: Vec<L>,
    config: LockConfig,
    clock: C,
    tokens: G,
}

impl<L: LockStore> QuorumLockManager<L> {
    pub fn new(stores: Vec<L>, config: LockConfig) -> Self {
        Self::with_deps(stores, config, SystemClock, UuidTokenGen)
    }
}

impl<L, C, G> QuorumLockManager<L, C, G>
where
    L: LockStore,
    C: Clock,
    G: TokenGen,
{
    pub fn with_deps(stores: Vec<L>, config: LockConfig, clock: C, tokens: G) -> Self {
        Self {
            stores,
            config,
            clock,
            tokens,
        }
    }

    pub fn config(&self) -> &LockConfig {
        &self.config
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Number of stores that must accept for an attempt to succeed
    pub fn quorum(&self) -> usize {
        quorum_size(self.stores.len())
    }

    /// Acquire `resource` for `ttl`, retrying up to the configured budget.
    ///
    /// The returned handle carries the validity left after acquisition,
    /// not the nominal ttl.
    pub async fn acquire(&self, resource: &str, ttl: Duration) -> Result<LockHandle, LockError> {
        if self.stores.is_empty() {
            return Err(LockError::NoStores);
        }
        if ttl.is_zero() {
            return Err(LockError::InvalidTtl);
        }
        self.config.validate()?;

        let token = self.tokens.next_token();
        let span = tracing::debug_span!("lock.acquire", resource, ttl_ms = millis(ttl));

        async {
            let max_attempts = self.config.max_attempts();
            for attempt in 1..=max_attempts {
                if let Some(handle) = self.attempt(resource, &token, ttl).await {
                    return Ok(handle.with_attempts(attempt));
                }

                self.delete_everywhere(resource, &token, ttl).await;

                if attempt < max_attempts {
                    tokio::time::sleep(self.backoff()).await;
                }
            }

            tracing::warn!(attempts = max_attempts, "lock acquisition exhausted retries");
            Err(LockError::AcquireFailed {
                resource: resource.to_string(),
                attempts: max_attempts,
            })
        }
        .instrument(span)
        .await
    }

    /// Release `handle` on every store.
    ///
    /// Never fails: a key that already expired or moved to another owner
    /// counts as released, and store errors are only logged. Returns how
    /// many stores actually deleted the key.
    pub async fn release(&self, handle: &LockHandle) -> usize {
        let span = tracing::debug_span!("lock.release", resource = handle.resource());
        self.delete_everywhere(handle.resource(), handle.token(), handle.ttl())
            .instrument(span)
            .await
    }

    /// One round of `try_set` on all stores
    async fn attempt(&self, resource: &str, token: &str, ttl: Duration) -> Option<LockHandle> {
        let start = self.clock.now();
        let timeout = self.config.attempt_timeout(ttl);

        let results = join_all(self.stores.iter().map(|store| async move {
            tokio::time::timeout(timeout, store.try_set(resource, token, ttl))
                .await
                .unwrap_or_else(|_| {
                    Err(LockStoreError::Timeout {
                        store: store.name().to_string(),
                        elapsed_ms: millis(timeout),
                    })
                })
        }))
        .await;

        let mut accepted = 0;
        for (store, result) in self.stores.iter().zip(results) {
            match result {
                Ok(true) => accepted += 1,
                Ok(false) => {}
                Err(e) => tracing::warn!(store = store.name(), error = %e, "lock store error"),
            }
        }

        let now = self.clock.now();
        let elapsed = now.saturating_duration_since(start);
        let drift = drift_margin(ttl, self.config.drift_factor);
        let validity = remaining_validity(ttl, elapsed, drift);
        let quorum = self.quorum();

        tracing::debug!(
            accepted,
            quorum,
            elapsed_ms = millis(elapsed),
            validity_ms = validity.map(millis),
            "attempt"
        );

        if accepted < quorum {
            return None;
        }
        let validity = validity?;
        Some(LockHandle::new(resource, token, ttl, validity, now).with_quorum(accepted))
    }

    async fn delete_everywhere(&self, resource: &str, token: &str, ttl: Duration) -> usize {
        let timeout = self.config.attempt_timeout(ttl);

        let results = join_all(self.stores.iter().map(|store| async move {
            tokio::time::timeout(timeout, store.try_delete(resource, token))
                .await
                .unwrap_or_else(|_| {
                    Err(LockStoreError::Timeout {
                        store: store.name().to_string(),
                        elapsed_ms: millis(timeout),
                    })
                })
        }))
        .await;

        let mut deleted = 0;
        for (store, result) in self.stores.iter().zip(results) {
            match result {
                Ok(true) => deleted += 1,
                Ok(false) => {}
                Err(e) => tracing::warn!(store = store.name(), error = %e, "release failed"),
            }
        }
        deleted
    }

    fn backoff(&self) -> Duration {
        let jitter_ms = millis(self.config.retry_jitter);
        let jitter = if jitter_ms == 0 {
            0
        } else {
            rand::thread_rng().gen_range(0..=jitter_ms)
        };
        self.config.retry_delay + Duration::from_millis(jitter)
    }
}

#[cfg(test)]
#[path = "lock_manager_tests.rs"]
mod tests;
