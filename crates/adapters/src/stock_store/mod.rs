// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Counter table backends
//!
//! A store only hands out transactions; nothing is visible to other
//! transactions until [`StockTransaction::commit`]. Commit and rollback are
//! always the caller's decision.

mod memory;
#[cfg(feature = "postgres")]
mod postgres;

pub use memory::{MemoryStockStore, MemoryTransaction};
#[cfg(feature = "postgres")]
pub use postgres::{PgStockStore, PgTransaction};

use async_trait::async_trait;
use sg_core::{Counter, CounterId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[cfg(feature = "postgres")]
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("counter {0} disappeared before commit")]
    RowGone(CounterId),

    #[error("commit rejected: {0}")]
    CommitRejected(String),
}

/// How a row is read inside a transaction
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RowLock {
    /// Plain read of committed state
    #[default]
    None,
    /// `SELECT ... FOR UPDATE`: blocks other lockers until this transaction ends
    Exclusive,
}

/// One open database transaction
#[async_trait]
pub trait StockTransaction: Send + 'static {
    async fn find(&mut self, id: CounterId, lock: RowLock) -> Result<Option<Counter>, StoreError>;

    /// Write back name and stock of an existing row
    async fn save(&mut self, counter: &Counter) -> Result<(), StoreError>;

    async fn insert(&mut self, name: &str, stock: i64) -> Result<Counter, StoreError>;

    /// Delete every row
    async fn clear(&mut self) -> Result<(), StoreError>;

    async fn commit(self) -> Result<(), StoreError>;

    async fn rollback(self) -> Result<(), StoreError>;
}

/// Transactional counter table
#[async_trait]
pub trait StockStore: Clone + Send + Sync + 'static {
    type Tx: StockTransaction;

    async fn begin(&self) -> Result<Self::Tx, StoreError>;

    /// Read committed state outside any transaction
    async fn get(&self, id: CounterId) -> Result<Option<Counter>, StoreError>;
}
