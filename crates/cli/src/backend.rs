// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Orchestrator factory for CLI commands

use anyhow::{Context, Result};
use clap::ValueEnum;
use sg_adapters::{
    MemoryLockStore, MemoryStockStore, PgStockStore, RedisLockStore, TracedLockStore,
    TracedStockStore,
};
use sg_core::StockguardConfig;
use sg_engine::{ConsistencyOrchestrator, QuorumLockManager, StockRepository};

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum Backend {
    /// In-process lock stores and counter table
    #[default]
    Memory,
    /// Redis lock stores and Postgres
    Live,
}

pub type MemoryOrchestrator = ConsistencyOrchestrator<
    TracedLockStore<MemoryLockStore>,
    TracedStockStore<MemoryStockStore>,
>;

pub type LiveOrchestrator =
    ConsistencyOrchestrator<TracedLockStore<RedisLockStore>, TracedStockStore<PgStockStore>>;

/// Build an orchestrator over `stores` fresh in-process lock stores
pub fn memory(config: &StockguardConfig, stores: usize) -> MemoryOrchestrator {
    let stores = (0..stores)
        .map(|i| TracedLockStore::new(MemoryLockStore::new(format!("memory-{}", i))))
        .collect();
    let locks = QuorumLockManager::new(stores, config.lock.clone());
    let repository = StockRepository::new(TracedStockStore::new(MemoryStockStore::new()));
    ConsistencyOrchestrator::new(locks, repository, &config.policy)
}

/// Build an orchestrator over the configured Redis instances and database
pub async fn live(config: &StockguardConfig) -> Result<LiveOrchestrator> {
    let stores = config
        .lock
        .stores
        .iter()
        .map(|url| {
            RedisLockStore::open(url)
                .map(TracedLockStore::new)
                .with_context(|| format!("invalid lock store url {}", url))
        })
        .collect::<Result<Vec<_>>>()?;

    let db = PgStockStore::connect(&config.database)
        .await
        .context("failed to connect to the database")?;

    tracing::info!(stores = stores.len(), "connected live backend");

    let locks = QuorumLockManager::new(stores, config.lock.clone());
    let repository = StockRepository::new(TracedStockStore::new(db));
    Ok(ConsistencyOrchestrator::new(locks, repository, &config.policy))
}
