// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Single deduction under a chosen policy

use crate::output::{self, OutputFormat};
use clap::Args;
use sg_adapters::{LockStore, StockStore};
use sg_core::{Clock, CounterId, Policy, TokenGen};
use sg_engine::ConsistencyOrchestrator;

#[derive(Args)]
pub struct DeductArgs {
    /// Product id
    pub id: CounterId,

    /// Units to take
    #[arg(long, short, default_value_t = 1, allow_negative_numbers = true)]
    pub quantity: i64,

    /// Consistency policy
    #[arg(long, short, default_value_t = Policy::Safe)]
    pub policy: Policy,
}

pub async fn handle<L, S, C, G>(
    args: DeductArgs,
    orchestrator: &ConsistencyOrchestrator<L, S, C, G>,
    format: OutputFormat,
) -> anyhow::Result<()>
where
    L: LockStore,
    S: StockStore,
    C: Clock,
    G: TokenGen,
{
    let counter = orchestrator
        .deduct(args.policy, args.id, args.quantity)
        .await?;
    output::print(&counter, format);
    Ok(())
}
