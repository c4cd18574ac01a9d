// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Transactional stock repository
//!
//! [`StockRepository::deduct`] works inside a caller-owned transaction and
//! never commits or rolls back. The admin operations run their own
//! transaction and are not subject to the distributed lock.

use crate::error::StockError;
use sg_adapters::{RowLock, StockStore, StockTransaction};
use sg_core::{Counter, CounterId};

/// Name and stock of the counter created by [`StockRepository::reset_products`]
pub const RESET_PRODUCT: (&str, i64) = ("Test Product", 1000);

#[derive(Clone)]
pub struct StockRepository<S> {
    store: S,
}

impl<S: StockStore> StockRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn begin(&self) -> Result<S::Tx, StockError> {
        Ok(self.store.begin().await?)
    }

    /// Read, validate and decrement one counter inside `tx`.
    ///
    /// Returns the updated row; it is durable only once the caller commits.
    /// A quantity below 1 is rejected before the row is read.
    pub async fn deduct(
        &self,
        tx: &mut S::Tx,
        id: CounterId,
        quantity: i64,
        lock: RowLock,
    ) -> Result<Counter, StockError> {
        if quantity < 1 {
            return Err(StockError::InvalidQuantity(quantity));
        }
        let mut counter = tx.find(id, lock).await?.ok_or(StockError::NotFound(id))?;

        counter.stock = counter
            .stock_after(quantity)
            .ok_or(StockError::InsufficientStock {
                id,
                available: counter.stock,
                requested: quantity,
            })?;

        tx.save(&counter).await?;
        Ok(counter)
    }

    pub async fn create_product(&self, name: &str, stock: i64) -> Result<Counter, StockError> {
        if stock < 0 {
            return Err(StockError::InvalidStock(stock));
        }
        let mut tx = self.begin().await?;
        let result = tx.insert(name, stock).await.map_err(StockError::from);
        finish(tx, result).await
    }

    pub async fn get_product(&self, id: CounterId) -> Result<Counter, StockError> {
        self.store.get(id).await?.ok_or(StockError::NotFound(id))
    }

    /// Delete every counter; clearing an empty table is not an error
    pub async fn clear_products(&self) -> Result<(), StockError> {
        let mut tx = self.begin().await?;
        let result = tx.clear().await.map_err(StockError::from);
        finish(tx, result).await
    }

    /// Replace all counters with the single default product
    pub async fn reset_products(&self) -> Result<Counter, StockError> {
        let (name, stock) = RESET_PRODUCT;
        let mut tx = self.begin().await?;
        let result = match tx.clear().await {
            Ok(()) => tx.insert(name, stock).await.map_err(StockError::from),
            Err(e) => Err(e.into()),
        };
        finish(tx, result).await
    }
}

/// Commit on success, roll back on failure.
///
/// A failed rollback is logged and the original error returned.
pub(crate) async fn finish<T, Tx>(tx: Tx, result: Result<T, StockError>) -> Result<T, StockError>
where
    Tx: StockTransaction,
{
    match result {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(e) => {
            rollback(tx).await;
            Err(e)
        }
    }
}

pub(crate) async fn rollback<Tx: StockTransaction>(tx: Tx) {
    if let Err(e) = tx.rollback().await {
        tracing::warn!(error = %e, "rollback failed");
    }
}

#[cfg(test)]
#[path = "repository_tests.rs"]
mod tests;
