// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Consistency policies
//!
//! Each policy is a different ordering of lock acquisition, mutation,
//! commit and lock release around the same deduction. Only [`Policy::Safe`]
//! is correct under concurrency; the others exist to reproduce faults.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Policy {
    /// Lock brackets begin..commit; released only after commit or rollback
    #[default]
    Safe,
    /// Lock released after the mutation, commit happens later outside it
    UnsafeEarlyRelease,
    /// Mutation always rolled back after the guarded work fails on purpose
    ForcedRollback,
    /// No distributed lock at all
    NoLock,
}

impl Policy {
    pub const ALL: [Policy; 4] = [
        Policy::Safe,
        Policy::UnsafeEarlyRelease,
        Policy::ForcedRollback,
        Policy::NoLock,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Policy::Safe => "safe",
            Policy::UnsafeEarlyRelease => "unsafe-early-release",
            Policy::ForcedRollback => "forced-rollback",
            Policy::NoLock => "no-lock",
        }
    }

    pub fn uses_lock(&self) -> bool {
        !matches!(self, Policy::NoLock)
    }

    /// Whether the row is read with an exclusive row lock
    pub fn row_locked(&self) -> bool {
        matches!(self, Policy::Safe | Policy::ForcedRollback)
    }

    /// Whether an artificial delay sits between mutation and commit
    pub fn delays_commit(&self) -> bool {
        matches!(self, Policy::UnsafeEarlyRelease | Policy::NoLock)
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error)]
#[error("unknown policy '{0}' (expected one of: safe, unsafe-early-release, forced-rollback, no-lock)")]
pub struct ParsePolicyError(String);

impl FromStr for Policy {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Policy::ALL
            .into_iter()
            .find(|policy| policy.name() == s)
            .ok_or_else(|| ParsePolicyError(s.to_string()))
    }
}
