// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! sg - stock deduction under distributed locking

mod backend;
mod commands;
mod output;

use anyhow::Result;
use backend::Backend;
use clap::{Parser, Subcommand};
use commands::{deduct, load, product};
use output::OutputFormat;
use sg_adapters::{LockStore, StockStore};
use sg_core::{Clock, StockguardConfig, TokenGen};
use sg_engine::ConsistencyOrchestrator;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Parser)]
#[command(
    name = "sg",
    version,
    about = "Stockguard - stock deduction under a quorum lock"
)]
struct Cli {
    /// Config file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Where the lock stores and the counter table live
    #[arg(long, global = true, value_enum, default_value_t = Backend::Memory)]
    backend: Backend,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Product administration
    Product(product::ProductArgs),
    /// Deduct stock from one product
    Deduct(deduct::DeductArgs),
    /// Run concurrent deductions against a fresh product
    Load(load::LoadArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    setup_logging();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn setup_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    // stdout carries command output only
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_config(path: Option<&Path>) -> Result<StockguardConfig> {
    let config = match path {
        Some(path) => StockguardConfig::load(path)?,
        None => StockguardConfig::default(),
    };
    Ok(config.with_env()?)
}

async fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;

    match cli.backend {
        Backend::Memory => {
            let stores = match &cli.command {
                Commands::Load(args) => args.stores.unwrap_or(load::DEFAULT_MEMORY_STORES),
                _ => config.lock.stores.len(),
            };
            if stores == 0 {
                anyhow::bail!("at least one lock store is required");
            }
            let orchestrator = backend::memory(&config, stores);
            execute(cli.command, Arc::new(orchestrator), cli.format).await
        }
        Backend::Live => {
            if let Commands::Load(load::LoadArgs {
                stores: Some(_), ..
            }) = &cli.command
            {
                tracing::warn!("--stores only applies to the memory backend");
            }
            let orchestrator = backend::live(&config).await?;
            execute(cli.command, Arc::new(orchestrator), cli.format).await
        }
    }
}

async fn execute<L, S, C, G>(
    command: Commands,
    orchestrator: Arc<ConsistencyOrchestrator<L, S, C, G>>,
    format: OutputFormat,
) -> Result<()>
where
    L: LockStore,
    S: StockStore,
    C: Clock,
    G: TokenGen,
{
    match command {
        Commands::Product(args) => product::handle(args.command, &*orchestrator, format).await,
        Commands::Deduct(args) => deduct::handle(args, &*orchestrator, format).await,
        Commands::Load(args) => load::handle(args, orchestrator, format).await,
    }
}
