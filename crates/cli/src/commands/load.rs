// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Concurrent load against a fresh counter

use crate::output::{self, OutputFormat};
use clap::Args;
use sg_adapters::{LockStore, StockStore};
use sg_core::{Clock, Policy, TokenGen};
use sg_engine::{run_load, ConsistencyOrchestrator};
use std::sync::Arc;

pub const DEFAULT_MEMORY_STORES: usize = 3;

#[derive(Args)]
pub struct LoadArgs {
    /// Consistency policy
    #[arg(long, short, default_value_t = Policy::Safe)]
    pub policy: Policy,

    /// Initial stock of the counter
    #[arg(long, default_value_t = 100)]
    pub stock: i64,

    /// Number of concurrent deductions of quantity 1
    #[arg(long, short = 'n', default_value_t = 102)]
    pub requests: usize,

    /// Number of in-process lock stores (memory backend only)
    #[arg(long)]
    pub stores: Option<usize>,
}

pub async fn handle<L, S, C, G>(
    args: LoadArgs,
    orchestrator: Arc<ConsistencyOrchestrator<L, S, C, G>>,
    format: OutputFormat,
) -> anyhow::Result<()>
where
    L: LockStore,
    S: StockStore,
    C: Clock,
    G: TokenGen,
{
    let counter = orchestrator
        .repository()
        .create_product("Load Test Product", args.stock)
        .await?;

    let report = run_load(orchestrator, args.policy, counter.id, args.requests).await?;
    output::print(&report, format);
    Ok(())
}
