// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::lock_manager::QuorumLockManager;
use crate::repository::StockRepository;
use sg_adapters::{MemoryLockStore, MemoryStockStore};
use sg_core::{LockConfig, PolicyConfig};
use std::time::Duration;
use yare::parameterized;

async fn orchestrator(
    stock: i64,
) -> (Arc<ConsistencyOrchestrator<MemoryLockStore, MemoryStockStore>>, CounterId) {
    let stores = (0..3)
        .map(|i| MemoryLockStore::new(format!("mem-{i}")))
        .collect();
    let config = LockConfig::default().with_retry(
        5_000,
        Duration::from_millis(1),
        Duration::from_millis(2),
    );
    let repository = StockRepository::new(MemoryStockStore::new());
    let id = repository.create_product("load", stock).await.unwrap().id;
    let orchestrator = ConsistencyOrchestrator::new(
        QuorumLockManager::new(stores, config),
        repository,
        &PolicyConfig::default(),
    )
    .with_commit_delay(Duration::from_millis(20));
    (Arc::new(orchestrator), id)
}

#[parameterized(
    exact = { 10, 4, 6, 0 },
    lost_two = { 10, 4, 8, 2 },
    none_succeeded = { 5, 0, 5, 0 },
)]
fn lost_updates_compares_final_stock_with_successes(
    initial: i64,
    succeeded: usize,
    final_stock: i64,
    lost: i64,
) {
    let report = LoadReport {
        initial_stock: initial,
        succeeded,
        final_stock,
        ..LoadReport::default()
    };
    assert_eq!(report.lost_updates(), lost);
}

#[test]
fn record_classifies_outcomes() {
    let mut report = LoadReport::default();
    report.record(&Ok(()));
    report.record(&Err(StockError::InsufficientStock {
        id: 1,
        available: 0,
        requested: 1,
    }));
    report.record(&Err(StockError::Lock(LockError::AcquireFailed {
        resource: "product:1:lock".to_string(),
        attempts: 3,
    })));
    report.record(&Err(StockError::ForcedRollback(1)));
    report.record(&Err(StockError::NotFound(1)));

    assert_eq!(
        (
            report.succeeded,
            report.insufficient,
            report.lock_failures,
            report.rolled_back,
            report.other_errors
        ),
        (1, 1, 1, 1, 1)
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn safe_load_over_memory_stores_balances() {
    let (orchestrator, id) = orchestrator(20).await;

    let report = run_load(orchestrator, Policy::Safe, id, 25).await.unwrap();

    assert_eq!(report.requests, 25);
    assert_eq!(report.initial_stock, 20);
    assert_eq!(report.succeeded, 20);
    assert_eq!(report.insufficient, 5);
    assert_eq!(report.final_stock, 0);
    assert_eq!(report.lost_updates(), 0);
}

#[tokio::test]
async fn load_against_missing_counter_fails_up_front() {
    let (orchestrator, _) = orchestrator(1).await;

    let err = run_load(orchestrator, Policy::NoLock, 404, 3).await.unwrap_err();
    assert!(matches!(err, StockError::NotFound(404)));
}

#[test]
fn report_serializes_policy_in_kebab_case() {
    let report = LoadReport {
        policy: Policy::UnsafeEarlyRelease,
        ..LoadReport::default()
    };
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["policy"], "unsafe-early-release");
}

#[test]
fn report_text_lists_counts_and_stock_change() {
    let report = LoadReport {
        policy: Policy::NoLock,
        requests: 3,
        initial_stock: 3,
        succeeded: 3,
        final_stock: 2,
        ..LoadReport::default()
    };
    let text = report.to_string();
    assert!(text.contains("policy: no-lock"));
    assert!(text.contains("succeeded: 3"));
    assert!(text.contains("stock: 3 -> 2"));
    assert!(text.contains("lost updates: 2"));
}
