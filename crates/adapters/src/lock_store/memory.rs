// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-process lock store
//!
//! Behaves like one Redis instance: a key map with per-key expiry, where
//! both primitives run under a single mutex so they are atomic.

use super::{LockStore, LockStoreError};
use async_trait::async_trait;
use sg_core::{Clock, SystemClock};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct Entry {
    token: String,
    expires_at: Instant,
}

/// Lock store held in process memory
#[derive(Clone)]
pub struct MemoryLockStore<C: Clock = SystemClock> {
    name: String,
    clock: C,
    keys: Arc<Mutex<HashMap<String, Entry>>>,
}

impl MemoryLockStore<SystemClock> {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_clock(name, SystemClock)
    }
}

impl<C: Clock> MemoryLockStore<C> {
    pub fn with_clock(name: impl Into<String>, clock: C) -> Self {
        Self {
            name: name.into(),
            clock,
            keys: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Current unexpired owner of `key`
    pub fn holder(&self, key: &str) -> Option<String> {
        let now = self.clock.now();
        self.keys
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .filter(|entry| entry.expires_at > now)
            .map(|entry| entry.token.clone())
    }

    /// Remaining time before `key` expires, if held
    pub fn pttl(&self, key: &str) -> Option<Duration> {
        let now = self.clock.now();
        self.keys
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .and_then(|entry| entry.expires_at.checked_duration_since(now))
            .filter(|left| !left.is_zero())
    }
}

#[async_trait]
impl<C: Clock> LockStore for MemoryLockStore<C> {
    fn name(&self) -> &str {
        &self.name
    }

    async fn try_set(
        &self,
        key: &str,
        token: &str,
        ttl: Duration,
    ) -> Result<bool, LockStoreError> {
        let now = self.clock.now();
        let mut keys = self.keys.lock().unwrap_or_else(|e| e.into_inner());

        if let Some(entry) = keys.get(key) {
            if entry.expires_at > now {
                return Ok(false);
            }
        }

        keys.insert(
            key.to_string(),
            Entry {
                token: token.to_string(),
                expires_at: now + ttl,
            },
        );
        Ok(true)
    }

    async fn try_delete(&self, key: &str, token: &str) -> Result<bool, LockStoreError> {
        let now = self.clock.now();
        let mut keys = self.keys.lock().unwrap_or_else(|e| e.into_inner());

        match keys.get(key) {
            Some(entry) if entry.expires_at <= now => {
                // Expired keys are gone as far as callers can tell
                keys.remove(key);
                Ok(false)
            }
            Some(entry) if entry.token == token => {
                keys.remove(key);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
