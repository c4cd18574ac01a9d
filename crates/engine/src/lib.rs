// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Quorum locking and consistency policies for stock deduction

mod error;
mod guard;
mod load;
mod lock_manager;
mod orchestrator;
mod repository;

pub use error::{LockError, StockError};
pub use guard::LockReleaser;
pub use load::{run_load, LoadReport};
pub use lock_manager::QuorumLockManager;
pub use orchestrator::ConsistencyOrchestrator;
pub use repository::{StockRepository, RESET_PRODUCT};
