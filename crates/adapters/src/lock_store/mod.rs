// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Single lock-store instances
//!
//! A lock store is one independent key-value server. It only has to offer
//! two atomic primitives; quorum logic lives in the engine.

mod memory;
#[cfg(feature = "redis")]
mod redis_store;

pub use memory::MemoryLockStore;
#[cfg(feature = "redis")]
pub use redis_store::RedisLockStore;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeLockStore, LockStoreCall};

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Errors from a single lock store.
///
/// The lock manager treats every variant as "this store did not answer yes".
#[derive(Debug, Error)]
pub enum LockStoreError {
    #[error("lock store {store} unreachable: {reason}")]
    Unreachable { store: String, reason: String },
    #[error("lock store {store} timed out after {elapsed_ms}ms")]
    Timeout { store: String, elapsed_ms: u64 },
    #[error("lock store {store} protocol error: {reason}")]
    Protocol { store: String, reason: String },
}

/// One independent lock store
#[async_trait]
pub trait LockStore: Clone + Send + Sync + 'static {
    /// Name used in logs (usually the address)
    fn name(&self) -> &str;

    /// Set `key = token` with expiry `ttl` iff the key is absent or expired.
    ///
    /// Must be a single atomic operation on the store.
    async fn try_set(&self, key: &str, token: &str, ttl: Duration)
        -> Result<bool, LockStoreError>;

    /// Delete `key` iff its current value is `token`.
    ///
    /// Returns false when the key is absent, expired, or owned by another
    /// token. Must be a single atomic operation on the store.
    async fn try_delete(&self, key: &str, token: &str) -> Result<bool, LockStoreError>;
}
