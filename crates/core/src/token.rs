// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Ownership token generation
//!
//! Every lock acquisition attempt gets a fresh token. A store only deletes a
//! key whose value still equals the caller's token, so a holder whose lock
//! expired and was re-acquired elsewhere cannot release the new holder's lock.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Generates ownership tokens
pub trait TokenGen: Clone + Send + Sync + 'static {
    fn next_token(&self) -> String;
}

/// Random v4 UUID tokens
#[derive(Clone, Copy, Debug, Default)]
pub struct UuidTokenGen;

impl TokenGen for UuidTokenGen {
    fn next_token(&self) -> String {
        uuid::Uuid::new_v4().simple().to_string()
    }
}

/// Predictable tokens (`{prefix}-1`, `{prefix}-2`, ...) for tests
#[derive(Clone, Debug)]
pub struct SequentialTokenGen {
    prefix: String,
    counter: Arc<AtomicU64>,
}

impl SequentialTokenGen {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: Arc::new(AtomicU64::new(1)),
        }
    }
}

impl Default for SequentialTokenGen {
    fn default() -> Self {
        Self::new("token")
    }
}

impl TokenGen for SequentialTokenGen {
    fn next_token(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        format!("{}-{}", self.prefix, n)
    }
}
