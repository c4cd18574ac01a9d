// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Consistency policy orchestrator
//!
//! Composes the lock manager and the repository in the four orderings of
//! [`Policy`]. Only [`Policy::Safe`] releases the lock strictly after the
//! transaction has ended; the others exist to reproduce what goes wrong
//! when it does not.

use crate::error::StockError;
use crate::lock_manager::QuorumLockManager;
use crate::repository::{finish, rollback, StockRepository};
use sg_adapters::{LockStore, RowLock, StockStore, StockTransaction};
use sg_core::{
    resource_key, Clock, Counter, CounterId, Policy, PolicyConfig, SystemClock, TokenGen,
    UuidTokenGen,
};
use std::time::Duration;
use tracing::Instrument;

/// Runs deductions under a chosen consistency policy
pub struct ConsistencyOrchestrator<L, S, C = SystemClock, G = UuidTokenGen> {
    locks: QuorumLockManager<L, C, G>,
    repository: StockRepository<S>,
    ttl: Duration,
    commit_delay: Duration,
}

impl<L, S, C, G> ConsistencyOrchestrator<L, S, C, G>
where
    L: LockStore,
    S: StockStore,
    C: Clock,
    G: TokenGen,
{
    pub fn new(
        locks: QuorumLockManager<L, C, G>,
        repository: StockRepository<S>,
        policy: &PolicyConfig,
    ) -> Self {
        let ttl = locks.config().ttl;
        Self {
            locks,
            repository,
            ttl,
            commit_delay: policy.commit_delay,
        }
    }

    /// Pause between mutation and commit for the policies that delay commit
    pub fn with_commit_delay(mut self, delay: Duration) -> Self {
        self.commit_delay = delay;
        self
    }

    pub fn locks(&self) -> &QuorumLockManager<L, C, G> {
        &self.locks
    }

    pub fn repository(&self) -> &StockRepository<S> {
        &self.repository
    }

    /// Production entry point (safe policy)
    pub async fn deduct_stock(&self, id: CounterId, quantity: i64) -> Result<Counter, StockError> {
        self.deduct(Policy::Safe, id, quantity).await
    }

    pub async fn deduct(
        &self,
        policy: Policy,
        id: CounterId,
        quantity: i64,
    ) -> Result<Counter, StockError> {
        if quantity < 1 {
            return Err(StockError::InvalidQuantity(quantity));
        }

        let span = tracing::info_span!(
            "stock.deduct",
            %policy,
            id,
            quantity,
            locked = policy.uses_lock()
        );
        async {
            let result = match policy {
                Policy::Safe => self.safe(id, quantity).await,
                Policy::UnsafeEarlyRelease => self.unsafe_early_release(id, quantity).await,
                Policy::ForcedRollback => self.forced_rollback(id, quantity).await,
                Policy::NoLock => self.no_lock(id, quantity).await,
            };
            match &result {
                Ok(counter) => tracing::info!(stock = counter.stock, "deducted"),
                Err(e) if e.is_client_fault() => tracing::info!(error = %e, "rejected"),
                Err(StockError::ForcedRollback(_)) => tracing::info!("rolled back"),
                Err(e) => tracing::warn!(error = %e, "deduction failed"),
            }
            result
        }
        .instrument(span)
        .await
    }

    pub async fn deduct_safe(&self, id: CounterId, quantity: i64) -> Result<Counter, StockError> {
        self.deduct(Policy::Safe, id, quantity).await
    }

    pub async fn deduct_unsafe_early_release(
        &self,
        id: CounterId,
        quantity: i64,
    ) -> Result<Counter, StockError> {
        self.deduct(Policy::UnsafeEarlyRelease, id, quantity).await
    }

    pub async fn deduct_forced_rollback(
        &self,
        id: CounterId,
        quantity: i64,
    ) -> Result<Counter, StockError> {
        self.deduct(Policy::ForcedRollback, id, quantity).await
    }

    pub async fn deduct_no_lock(&self, id: CounterId, quantity: i64) -> Result<Counter, StockError> {
        self.deduct(Policy::NoLock, id, quantity).await
    }

    /// Lock brackets begin, mutate and commit
    async fn safe(&self, id: CounterId, quantity: i64) -> Result<Counter, StockError> {
        let repository = &self.repository;
        self.locks
            .with_lock(&resource_key(id), self.ttl, move || async move {
                let mut tx = repository.begin().await?;
                let result = repository
                    .deduct(&mut tx, id, quantity, row_lock(Policy::Safe))
                    .await;
                finish(tx, result).await
            })
            .await
    }

    /// Lock covers the mutation only; commit happens after release
    async fn unsafe_early_release(
        &self,
        id: CounterId,
        quantity: i64,
    ) -> Result<Counter, StockError> {
        let repository = &self.repository;
        let mut tx = repository.begin().await?;
        let tx_ref = &mut tx;

        let locked = self
            .locks
            .with_lock_manual(&resource_key(id), self.ttl, move || async move {
                repository
                    .deduct(tx_ref, id, quantity, row_lock(Policy::UnsafeEarlyRelease))
                    .await
            })
            .await;

        let (counter, mut releaser) = match locked {
            Ok(locked) => locked,
            Err(e) => {
                rollback(tx).await;
                return Err(e);
            }
        };

        let released = releaser.release().await;
        tracing::debug!(
            resource = releaser.handle().resource(),
            released,
            "lock released before commit"
        );
        self.pause_before_commit(Policy::UnsafeEarlyRelease).await;

        tx.commit().await?;
        Ok(counter)
    }

    /// Mutation under the lock always fails; rollback happens after release
    async fn forced_rollback(&self, id: CounterId, quantity: i64) -> Result<Counter, StockError> {
        let repository = &self.repository;
        let mut tx = repository.begin().await?;
        let tx_ref = &mut tx;

        let result = self
            .locks
            .with_lock(&resource_key(id), self.ttl, move || async move {
                let counter = repository
                    .deduct(tx_ref, id, quantity, row_lock(Policy::ForcedRollback))
                    .await?;
                tracing::debug!(stock = counter.stock, "mutated, forcing rollback");
                Err::<Counter, _>(StockError::ForcedRollback(id))
            })
            .await;

        rollback(tx).await;
        result
    }

    /// Widen the race window for the policies that delay their commit
    async fn pause_before_commit(&self, policy: Policy) {
        if policy.delays_commit() && !self.commit_delay.is_zero() {
            tracing::debug!(delay_ms = self.commit_delay.as_millis() as u64, "delaying commit");
            tokio::time::sleep(self.commit_delay).await;
        }
    }

    /// No coordination at all
    async fn no_lock(&self, id: CounterId, quantity: i64) -> Result<Counter, StockError> {
        let mut tx = self.repository.begin().await?;
        let counter = match self
            .repository
            .deduct(&mut tx, id, quantity, row_lock(Policy::NoLock))
            .await
        {
            Ok(counter) => counter,
            Err(e) => {
                rollback(tx).await;
                return Err(e);
            }
        };

        self.pause_before_commit(Policy::NoLock).await;
        tx.commit().await?;
        Ok(counter)
    }
}

fn row_lock(policy: Policy) -> RowLock {
    if policy.row_locked() {
        RowLock::Exclusive
    } else {
        RowLock::None
    }
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;
