// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use crate::lock_store::{LockStore, LockStoreError};
use crate::stock_store::{RowLock, StockStore, StockTransaction, StoreError};
use async_trait::async_trait;
use sg_core::{Counter, CounterId};
use std::time::{Duration, Instant};
use tracing::Instrument;

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}

/// Wrapper that adds tracing to any LockStore
#[derive(Clone)]
pub struct TracedLockStore<L> {
    inner: L,
}

impl<L> TracedLockStore<L> {
    pub fn new(inner: L) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<L: LockStore> LockStore for TracedLockStore<L> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn try_set(
        &self,
        key: &str,
        token: &str,
        ttl: Duration,
    ) -> Result<bool, LockStoreError> {
        let span = tracing::debug_span!(
            "lock_store.try_set",
            store = self.inner.name(),
            key,
            ttl_ms = ttl.as_millis() as u64
        );
        async {
            let start = Instant::now();
            let result = self.inner.try_set(key, token, ttl).await;
            match &result {
                Ok(acquired) => tracing::debug!(acquired, elapsed_ms = elapsed_ms(start), "set"),
                Err(e) => tracing::warn!(elapsed_ms = elapsed_ms(start), error = %e, "set failed"),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn try_delete(&self, key: &str, token: &str) -> Result<bool, LockStoreError> {
        let span = tracing::debug_span!("lock_store.try_delete", store = self.inner.name(), key);
        async {
            let result = self.inner.try_delete(key, token).await;
            // Not deleting is normal when the key already expired
            match &result {
                Ok(deleted) => tracing::debug!(deleted, "delete"),
                Err(e) => tracing::warn!(error = %e, "delete failed"),
            }
            result
        }
        .instrument(span)
        .await
    }
}

/// Wrapper that adds tracing to any StockStore
#[derive(Clone)]
pub struct TracedStockStore<S> {
    inner: S,
}

impl<S> TracedStockStore<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

/// Transaction handed out by [`TracedStockStore`]
pub struct TracedTransaction<T> {
    inner: T,
    started: Instant,
}

#[async_trait]
impl<T: StockTransaction> StockTransaction for TracedTransaction<T> {
    async fn find(&mut self, id: CounterId, lock: RowLock) -> Result<Option<Counter>, StoreError> {
        let span = tracing::debug_span!("stock_store.find", id, lock = ?lock);
        async {
            let start = Instant::now();
            let result = self.inner.find(id, lock).await;
            match &result {
                Ok(row) => tracing::debug!(
                    found = row.is_some(),
                    stock = row.as_ref().map(|c| c.stock),
                    elapsed_ms = elapsed_ms(start),
                    "read"
                ),
                Err(e) => tracing::error!(error = %e, "read failed"),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn save(&mut self, counter: &Counter) -> Result<(), StoreError> {
        let span = tracing::debug_span!("stock_store.save", id = counter.id, stock = counter.stock);
        async {
            let result = self.inner.save(counter).await;
            if let Err(e) = &result {
                tracing::error!(error = %e, "save failed");
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn insert(&mut self, name: &str, stock: i64) -> Result<Counter, StoreError> {
        let result = self.inner.insert(name, stock).await;
        match &result {
            Ok(counter) => tracing::info!(id = counter.id, name, stock, "inserted"),
            Err(e) => tracing::error!(name, error = %e, "insert failed"),
        }
        result
    }

    async fn clear(&mut self) -> Result<(), StoreError> {
        let result = self.inner.clear().await;
        match &result {
            Ok(()) => tracing::info!("cleared"),
            Err(e) => tracing::error!(error = %e, "clear failed"),
        }
        result
    }

    async fn commit(self) -> Result<(), StoreError> {
        let open_ms = elapsed_ms(self.started);
        let result = self.inner.commit().await;
        match &result {
            Ok(()) => tracing::debug!(open_ms, "committed"),
            Err(e) => tracing::error!(open_ms, error = %e, "commit failed"),
        }
        result
    }

    async fn rollback(self) -> Result<(), StoreError> {
        let open_ms = elapsed_ms(self.started);
        let result = self.inner.rollback().await;
        match &result {
            Ok(()) => tracing::debug!(open_ms, "rolled back"),
            Err(e) => tracing::warn!(open_ms, error = %e, "rollback failed"),
        }
        result
    }
}

#[async_trait]
impl<S: StockStore> StockStore for TracedStockStore<S> {
    type Tx = TracedTransaction<S::Tx>;

    async fn begin(&self) -> Result<Self::Tx, StoreError> {
        let result = self.inner.begin().await;
        match result {
            Ok(inner) => {
                tracing::trace!("transaction started");
                Ok(TracedTransaction {
                    inner,
                    started: Instant::now(),
                })
            }
            Err(e) => {
                tracing::error!(error = %e, "begin failed");
                Err(e)
            }
        }
    }

    async fn get(&self, id: CounterId) -> Result<Option<Counter>, StoreError> {
        let result = self.inner.get(id).await;
        tracing::trace!(id, found = ?result.as_ref().ok().map(Option::is_some), "get");
        result
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
