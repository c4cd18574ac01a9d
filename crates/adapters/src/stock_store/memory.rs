// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-process counter table with read-committed transactions
//!
//! Each transaction buffers its writes and applies them on commit, so other
//! transactions keep reading the last committed value in the meantime
//! (last writer wins, exactly like concurrent `UPDATE`s of a stale read).
//! [`RowLock::Exclusive`] takes a per-row async mutex held until the
//! transaction ends.

use super::{RowLock, StockStore, StockTransaction, StoreError};
use async_trait::async_trait;
use sg_core::{Counter, CounterId};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as RowMutex, OwnedMutexGuard};

#[derive(Default)]
struct Table {
    rows: BTreeMap<CounterId, Counter>,
    next_id: CounterId,
    fail_next_commit: Option<String>,
}

#[derive(Default)]
struct Shared {
    table: Mutex<Table>,
    row_locks: Mutex<HashMap<CounterId, Arc<RowMutex<()>>>>,
}

/// Counter table held in process memory
#[derive(Clone, Default)]
pub struct MemoryStockStore {
    shared: Arc<Shared>,
}

impl MemoryStockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all committed rows, ordered by id
    pub fn rows(&self) -> Vec<Counter> {
        self.table().rows.values().cloned().collect()
    }

    /// Make the next commit fail with `reason`
    #[cfg(any(test, feature = "test-support"))]
    pub fn fail_next_commit(&self, reason: impl Into<String>) {
        self.table().fail_next_commit = Some(reason.into());
    }

    fn table(&self) -> std::sync::MutexGuard<'_, Table> {
        self.shared.table.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn row_lock(&self, id: CounterId) -> Arc<RowMutex<()>> {
        self.shared
            .row_locks
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .entry(id)
            .or_default()
            .clone()
    }
}

#[derive(Debug, Clone)]
enum Write {
    Insert(Counter),
    Update(Counter),
}

/// Open transaction on a [`MemoryStockStore`]
///
/// Dropping it without committing discards its writes and row locks.
pub struct MemoryTransaction {
    store: MemoryStockStore,
    writes: BTreeMap<CounterId, Write>,
    cleared: bool,
    locked: HashSet<CounterId>,
    guards: Vec<OwnedMutexGuard<()>>,
}

impl MemoryTransaction {
    fn new(store: MemoryStockStore) -> Self {
        Self {
            store,
            writes: BTreeMap::new(),
            cleared: false,
            locked: HashSet::new(),
            guards: Vec::new(),
        }
    }

    fn visible(&self, id: CounterId) -> Option<Counter> {
        match self.writes.get(&id) {
            Some(Write::Insert(counter)) | Some(Write::Update(counter)) => Some(counter.clone()),
            None if self.cleared => None,
            None => self.store.table().rows.get(&id).cloned(),
        }
    }
}

#[async_trait]
impl StockTransaction for MemoryTransaction {
    async fn find(&mut self, id: CounterId, lock: RowLock) -> Result<Option<Counter>, StoreError> {
        if lock == RowLock::Exclusive && self.locked.insert(id) {
            let guard = self.store.row_lock(id).lock_owned().await;
            self.guards.push(guard);
        }
        Ok(self.visible(id))
    }

    async fn save(&mut self, counter: &Counter) -> Result<(), StoreError> {
        let write = match self.writes.get(&counter.id) {
            Some(Write::Insert(_)) => Write::Insert(counter.clone()),
            _ => Write::Update(counter.clone()),
        };
        self.writes.insert(counter.id, write);
        Ok(())
    }

    async fn insert(&mut self, name: &str, stock: i64) -> Result<Counter, StoreError> {
        let id = {
            let mut table = self.store.table();
            table.next_id += 1;
            table.next_id
        };
        let counter = Counter::new(id, name, stock);
        self.writes.insert(id, Write::Insert(counter.clone()));
        Ok(counter)
    }

    async fn clear(&mut self) -> Result<(), StoreError> {
        self.writes.clear();
        self.cleared = true;
        Ok(())
    }

    async fn commit(mut self) -> Result<(), StoreError> {
        let mut table = self.store.table();

        if let Some(reason) = table.fail_next_commit.take() {
            return Err(StoreError::CommitRejected(reason));
        }

        // Validate before applying so a failed commit leaves nothing behind
        for (id, write) in &self.writes {
            if matches!(write, Write::Update(_)) && (self.cleared || !table.rows.contains_key(id)) {
                return Err(StoreError::RowGone(*id));
            }
        }

        if self.cleared {
            table.rows.clear();
        }
        for (id, write) in std::mem::take(&mut self.writes) {
            let (Write::Insert(counter) | Write::Update(counter)) = write;
            table.rows.insert(id, counter);
        }
        Ok(())
    }

    async fn rollback(self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[async_trait]
impl StockStore for MemoryStockStore {
    type Tx = MemoryTransaction;

    async fn begin(&self) -> Result<MemoryTransaction, StoreError> {
        Ok(MemoryTransaction::new(self.clone()))
    }

    async fn get(&self, id: CounterId) -> Result<Option<Counter>, StoreError> {
        Ok(self.table().rows.get(&id).cloned())
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
