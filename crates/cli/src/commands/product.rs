// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Product administration commands

use crate::output::{self, OutputFormat};
use clap::{Args, Subcommand};
use serde::Serialize;
use sg_adapters::{LockStore, StockStore};
use sg_core::{Clock, CounterId, TokenGen};
use sg_engine::ConsistencyOrchestrator;
use std::fmt;

#[derive(Args)]
pub struct ProductArgs {
    #[command(subcommand)]
    pub command: ProductCommand,
}

#[derive(Subcommand)]
pub enum ProductCommand {
    /// Create a product with an initial stock
    Create {
        name: String,
        #[arg(allow_negative_numbers = true)]
        stock: i64,
    },
    /// Show one product
    Get { id: CounterId },
    /// Delete all products
    Clear,
    /// Replace all products with the default test product
    Reset,
}

#[derive(Serialize)]
struct Cleared {
    cleared: bool,
}

impl fmt::Display for Cleared {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "All products cleared")
    }
}

pub async fn handle<L, S, C, G>(
    command: ProductCommand,
    orchestrator: &ConsistencyOrchestrator<L, S, C, G>,
    format: OutputFormat,
) -> anyhow::Result<()>
where
    L: LockStore,
    S: StockStore,
    C: Clock,
    G: TokenGen,
{
    let repository = orchestrator.repository();
    match command {
        ProductCommand::Create { name, stock } => {
            let counter = repository.create_product(&name, stock).await?;
            output::print(&counter, format);
        }
        ProductCommand::Get { id } => {
            let counter = repository.get_product(id).await?;
            output::print(&counter, format);
        }
        ProductCommand::Clear => {
            repository.clear_products().await?;
            output::print(&Cleared { cleared: true }, format);
        }
        ProductCommand::Reset => {
            let counter = repository.reset_products().await?;
            output::print(&counter, format);
        }
    }
    Ok(())
}
