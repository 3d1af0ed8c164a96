//! tabvault CLI - table backup and restore
//!
//! Usage:
//!   tabvault backup               Back up all tables now
//!   tabvault list                 List available backups
//!   tabvault restore 1            Restore the newest backup
//!   tabvault watch                Run the periodic scheduler

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;
use tabvault_core::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let config = Config::load_or_default(&cli.config)?;

    match cli.command {
        Commands::Tables => commands::cmd_tables(&config).await,
        Commands::Query { table, filter } => {
            commands::cmd_query(&config, &table, filter.as_deref()).await
        }
        Commands::Insert { table, row } => commands::cmd_insert(&config, &table, &row).await,
        Commands::Update {
            table,
            filter,
            patch,
        } => commands::cmd_update(&config, &table, &filter, &patch).await,
        Commands::Remove { table, filter } => {
            commands::cmd_remove(&config, &table, filter.as_deref()).await
        }
        Commands::Drop { table, all } => commands::cmd_drop(&config, table.as_deref(), all).await,
        Commands::Backup { tables } => commands::cmd_backup(&config, &tables).await,
        Commands::List => commands::cmd_list(&config).await,
        Commands::Restore { index, tables } => {
            commands::cmd_restore(&config, index, &tables).await
        }
        Commands::Prune { keep } => commands::cmd_prune(&config, keep).await,
        Commands::Watch => commands::cmd_watch(&config).await,
    }
}
