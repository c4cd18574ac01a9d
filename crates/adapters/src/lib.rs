// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Adapters for the lock stores and the counter database

pub mod lock_store;
pub mod stock_store;
pub mod traced;

pub use lock_store::{LockStore, LockStoreError, MemoryLockStore};
pub use stock_store::{
    MemoryStockStore, MemoryTransaction, RowLock, StockStore, StockTransaction, StoreError,
};
pub use traced::{TracedLockStore, TracedStockStore, TracedTransaction};

#[cfg(feature = "postgres")]
pub use stock_store::{PgStockStore, PgTransaction};
#[cfg(feature = "redis")]
pub use lock_store::RedisLockStore;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use lock_store::{FakeLockStore, LockStoreCall};
