// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Guarded critical sections
//!
//! [`QuorumLockManager::with_lock`] brackets a unit of work with acquire and
//! release. [`QuorumLockManager::with_lock_manual`] hands the release back to
//! the caller as a [`LockReleaser`], so the caller decides whether it happens
//! before or after anything else (such as a commit).

use crate::error::LockError;
use crate::lock_manager::QuorumLockManager;
use futures::FutureExt;
use sg_adapters::LockStore;
use sg_core::{Clock, LockHandle, TokenGen};
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::time::Duration;

impl<L, C, G> QuorumLockManager<L, C, G>
where
    L: LockStore,
    C: Clock,
    G: TokenGen,
{
    /// Run `work` while holding the lock on `resource`.
    ///
    /// The lock is released on every exit path, including a panic inside
    /// `work`, before the outcome is returned (or the panic resumed).
    pub async fn with_lock<T, E, F, Fut>(
        &self,
        resource: &str,
        ttl: Duration,
        work: F,
    ) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: From<LockError>,
    {
        let handle = self.acquire(resource, ttl).await?;

        let outcome = AssertUnwindSafe(async { work().await })
            .catch_unwind()
            .await;

        self.check_validity(&handle);
        self.release(&handle).await;

        match outcome {
            Ok(result) => result,
            Err(panic) => std::panic::resume_unwind(panic),
        }
    }

    /// Acquire `resource` and return the releaser without running anything
    pub async fn acquire_manual(
        &self,
        resource: &str,
        ttl: Duration,
    ) -> Result<LockReleaser<'_, L, C, G>, LockError> {
        let handle = self.acquire(resource, ttl).await?;
        Ok(LockReleaser {
            manager: self,
            handle,
            released: false,
        })
    }

    /// Run `work` under the lock and hand back its result with the releaser.
    ///
    /// The lock stays held after this returns `Ok`; the caller must call
    /// [`LockReleaser::release`]. If `work` fails the lock is released here.
    pub async fn with_lock_manual<T, E, F, Fut>(
        &self,
        resource: &str,
        ttl: Duration,
        work: F,
    ) -> Result<(T, LockReleaser<'_, L, C, G>), E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: From<LockError>,
    {
        let mut releaser = self.acquire_manual(resource, ttl).await?;
        match work().await {
            Ok(value) => Ok((value, releaser)),
            Err(e) => {
                releaser.release().await;
                Err(e)
            }
        }
    }

    fn check_validity(&self, handle: &LockHandle) {
        if handle.is_expired(self.clock()) {
            tracing::warn!(
                resource = handle.resource(),
                validity_ms = handle.validity().as_millis() as u64,
                "critical section outlived lock validity"
            );
        } else if handle.needs_extension(self.clock(), self.config().extension_threshold) {
            // No renewal: ttl is a hard bound on the critical section
            tracing::info!(
                resource = handle.resource(),
                remaining_ms = handle.remaining(self.clock()).as_millis() as u64,
                "lock close to expiry"
            );
        }
    }
}

/// Capability to release a lock taken in manual mode.
///
/// The first [`release`](Self::release) issues the deletes; later calls do
/// nothing. Dropping an unreleased releaser leaves the lock to expire.
pub struct LockReleaser<'a, L, C, G>
where
    L: LockStore,
    C: Clock,
    G: TokenGen,
{
    manager: &'a QuorumLockManager<L, C, G>,
    handle: LockHandle,
    released: bool,
}

impl<L, C, G> LockReleaser<'_, L, C, G>
where
    L: LockStore,
    C: Clock,
    G: TokenGen,
{
    pub fn handle(&self) -> &LockHandle {
        &self.handle
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Release the lock.
    ///
    /// Returns true only if a quorum of stores deleted our token. A lock that
    /// already expired, or a second call, yields false.
    pub async fn release(&mut self) -> bool {
        if self.released {
            tracing::debug!(resource = self.handle.resource(), "already released");
            return false;
        }
        self.released = true;
        self.manager.check_validity(&self.handle);
        let deleted = self.manager.release(&self.handle).await;
        deleted >= self.manager.quorum()
    }
}

impl<L, C, G> Drop for LockReleaser<'_, L, C, G>
where
    L: LockStore,
    C: Clock,
    G: TokenGen,
{
    fn drop(&mut self) {
        if !self.released {
            tracing::warn!(
                resource = self.handle.resource(),
                ttl_ms = self.handle.ttl().as_millis() as u64,
                "lock dropped without release, held until ttl expiry"
            );
        }
    }
}

#[cfg(test)]
#[path = "guard_tests.rs"]
mod tests;
