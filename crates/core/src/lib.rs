// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! sg-core: domain types for the stockguard deduction service
//!
//! This crate provides:
//! - The stock counter record and its resource-key convention
//! - Lock handles and the quorum/validity arithmetic behind them
//! - Consistency policies
//! - Clock and ownership-token abstractions for deterministic tests
//! - TOML/env configuration

pub mod clock;
pub mod config;
pub mod counter;
pub mod lock;
pub mod policy;
pub mod token;

pub use clock::{Clock, FakeClock, SystemClock};
pub use config::{ConfigError, DatabaseConfig, LockConfig, PolicyConfig, StockguardConfig};
pub use counter::{resource_key, Counter, CounterId};
pub use lock::{drift_margin, quorum_size, remaining_validity, LockHandle};
pub use policy::{ParsePolicyError, Policy};
pub use token::{SequentialTokenGen, TokenGen, UuidTokenGen};
