// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for locking and stock deduction

use sg_adapters::StoreError;
use sg_core::{ConfigError, CounterId};
use thiserror::Error;

/// Errors from the quorum lock manager
#[derive(Debug, Error)]
pub enum LockError {
    /// Quorum not reached within the retry budget
    #[error("failed to acquire lock on {resource} after {attempts} attempts")]
    AcquireFailed { resource: String, attempts: u32 },
    #[error("lock ttl must be positive")]
    InvalidTtl,
    #[error("no lock stores configured")]
    NoStores,
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors surfaced by a deduction or an admin operation
#[derive(Debug, Error)]
pub enum StockError {
    #[error("product {0} not found")]
    NotFound(CounterId),
    #[error("insufficient stock for product {id}: {available} available, {requested} requested")]
    InsufficientStock {
        id: CounterId,
        available: i64,
        requested: i64,
    },
    #[error("quantity must be at least 1, got {0}")]
    InvalidQuantity(i64),
    #[error("initial stock must not be negative, got {0}")]
    InvalidStock(i64),
    #[error(transparent)]
    Lock(#[from] LockError),
    #[error("transaction failed: {0}")]
    Transaction(#[from] StoreError),
    #[error("forced rollback for product {0}")]
    ForcedRollback(CounterId),
}

impl StockError {
    /// True for errors caused by the request itself rather than the system
    pub fn is_client_fault(&self) -> bool {
        matches!(
            self,
            StockError::NotFound(_)
                | StockError::InsufficientStock { .. }
                | StockError::InvalidQuantity(_)
                | StockError::InvalidStock(_)
        )
    }
}
