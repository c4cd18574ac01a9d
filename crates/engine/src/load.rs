// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Concurrent load driver
//!
//! Fires `requests` deductions of quantity 1 at one counter, all at once,
//! and tallies the outcomes.

use crate::error::{LockError, StockError};
use crate::orchestrator::ConsistencyOrchestrator;
use serde::Serialize;
use sg_adapters::{LockStore, StockStore};
use sg_core::{Clock, CounterId, Policy, TokenGen};
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

/// Outcome counts of one load run
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub policy: Policy,
    pub counter: CounterId,
    pub requests: usize,
    pub initial_stock: i64,
    pub succeeded: usize,
    pub insufficient: usize,
    pub lock_failures: usize,
    pub rolled_back: usize,
    pub other_errors: usize,
    pub final_stock: i64,
    pub elapsed_ms: u64,
}

impl LoadReport {
    /// Units that vanished or appeared relative to the successful deductions
    pub fn lost_updates(&self) -> i64 {
        self.final_stock - (self.initial_stock - self.succeeded as i64)
    }

    fn record(&mut self, result: &Result<(), StockError>) {
        match result {
            Ok(()) => self.succeeded += 1,
            Err(StockError::InsufficientStock { .. }) => self.insufficient += 1,
            Err(StockError::Lock(LockError::AcquireFailed { .. })) => self.lock_failures += 1,
            Err(StockError::ForcedRollback(_)) => self.rolled_back += 1,
            Err(_) => self.other_errors += 1,
        }
    }
}

impl fmt::Display for LoadReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "policy: {}", self.policy)?;
        writeln!(f, "requests: {}", self.requests)?;
        writeln!(f, "succeeded: {}", self.succeeded)?;
        writeln!(f, "insufficient: {}", self.insufficient)?;
        writeln!(f, "lock failures: {}", self.lock_failures)?;
        writeln!(f, "rolled back: {}", self.rolled_back)?;
        writeln!(f, "other errors: {}", self.other_errors)?;
        writeln!(f, "stock: {} -> {}", self.initial_stock, self.final_stock)?;
        writeln!(f, "lost updates: {}", self.lost_updates())?;
        write!(f, "elapsed: {}ms", self.elapsed_ms)
    }
}

/// Run `requests` concurrent deductions against `counter` under `policy`
pub async fn run_load<L, S, C, G>(
    orchestrator: Arc<ConsistencyOrchestrator<L, S, C, G>>,
    policy: Policy,
    counter: CounterId,
    requests: usize,
) -> Result<LoadReport, StockError>
where
    L: LockStore,
    S: StockStore,
    C: Clock,
    G: TokenGen,
{
    let initial = orchestrator.repository().get_product(counter).await?;
    let start = Instant::now();

    let tasks: Vec<_> = (0..requests)
        .map(|_| {
            let orchestrator = Arc::clone(&orchestrator);
            tokio::spawn(async move {
                orchestrator
                    .deduct(policy, counter, 1)
                    .await
                    .map(|_| ())
            })
        })
        .collect();

    let mut report = LoadReport {
        policy,
        counter,
        requests,
        initial_stock: initial.stock,
        ..LoadReport::default()
    };

    for task in tasks {
        match task.await {
            Ok(result) => report.record(&result),
            Err(e) => {
                tracing::error!(error = %e, "deduction task failed");
                report.other_errors += 1;
            }
        }
    }

    report.elapsed_ms = start.elapsed().as_millis() as u64;
    report.final_stock = orchestrator.repository().get_product(counter).await?.stock;

    tracing::info!(
        %policy,
        succeeded = report.succeeded,
        insufficient = report.insufficient,
        final_stock = report.final_stock,
        "load finished"
    );
    Ok(report)
}

#[cfg(test)]
#[path = "load_tests.rs"]
mod tests;
