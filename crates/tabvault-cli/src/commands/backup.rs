//! Backup management commands

use std::sync::Arc;

use anyhow::{Context, Result};
use tabvault_core::backup::names;
use tabvault_core::{BackupReport, BackupScheduler, Config};
use tracing::{info, warn};

use super::open_manager;

/// Run a backup now
pub async fn cmd_backup(config: &Config, tables: &[String]) -> Result<()> {
    let manager = open_manager(config)?;
    let subset = (!tables.is_empty()).then_some(tables);

    let report = manager.backup(subset).await.context("Backup failed")?;
    if let BackupReport::Written { failed, .. } = &report {
        if !failed.is_empty() {
            warn!("Backup completed with failures: {}", failed.join(", "));
        }
    }
    println!("{report}");

    if config.keep_backups > 0 {
        let pruned = manager
            .cleanup(config.keep_backups)
            .await
            .context("Retention sweep failed")?;
        if pruned.deleted_artifacts > 0 {
            println!(
                "Pruned {} old backup(s), keeping {}",
                pruned.deleted_artifacts, pruned.retained
            );
        }
    }

    Ok(())
}

/// List available backups, newest first
pub async fn cmd_list(config: &Config) -> Result<()> {
    let manager = open_manager(config)?;
    let catalog = manager.list_backups().await.context("Failed to list backups")?;

    if catalog.is_empty() {
        println!("No backups found");
        println!("Directory: {}", manager.dir().display());
        return Ok(());
    }

    println!("Available backups ({}):", manager.dir().display());
    println!();
    println!("{:>4}  {:<12} {:<10} TABLES", "#", "DATE", "TIME");
    println!("{}", "-".repeat(50));

    for (position, entry) in catalog.iter().enumerate() {
        let (date, time) = names::split_timestamp(&entry.timestamp)
            .unwrap_or_else(|| (entry.timestamp.clone(), String::new()));
        let tables = match &entry.tables {
            Some(tables) => tables.join(", "),
            None => "(all-in-one)".to_string(),
        };
        println!("{:>4}  {:<12} {:<10} {}", position + 1, date, time, tables);
    }

    Ok(())
}

/// Restore a backup by 1-based index
pub async fn cmd_restore(config: &Config, index: usize, tables: &[String]) -> Result<()> {
    let manager = open_manager(config)?;
    let subset = (!tables.is_empty()).then_some(tables);

    let (timestamp, restored) = manager
        .restore_by_index(index, subset)
        .await
        .context("Restore failed")?;

    if restored.is_empty() {
        println!("Nothing restored from {timestamp}");
    } else {
        println!(
            "Restored {} table(s) from {}: {}",
            restored.len(),
            timestamp,
            restored.join(", ")
        );
    }

    Ok(())
}

/// Delete old backups beyond the retention count
pub async fn cmd_prune(config: &Config, keep: Option<usize>) -> Result<()> {
    let keep = keep.unwrap_or(config.keep_backups);
    if keep == 0 {
        println!("Retention disabled (keep = 0), nothing to prune");
        return Ok(());
    }

    let manager = open_manager(config)?;
    let report = manager.cleanup(keep).await.context("Prune failed")?;

    if report.deleted_artifacts == 0 {
        println!("Nothing to prune, {} backup(s) retained", report.retained);
    } else {
        println!(
            "Pruned {} backup(s) ({} file(s)), {} retained",
            report.deleted_artifacts,
            report.deleted_files.len(),
            report.retained
        );
    }

    Ok(())
}

/// Run the periodic scheduler in the foreground until Ctrl-C
pub async fn cmd_watch(config: &Config) -> Result<()> {
    if !config.auto_backup {
        println!("auto_backup is disabled in the config; nothing to schedule");
        return Ok(());
    }
    if config.interval_hours == 0 {
        println!("interval_hours is 0; nothing to schedule");
        return Ok(());
    }

    let manager = Arc::new(open_manager(config)?);
    let mut scheduler = BackupScheduler::new(manager, config.interval_hours, config.keep_backups);
    scheduler.start();

    println!(
        "Backup scheduler running (every {} hour(s)). Press Ctrl-C to stop.",
        config.interval_hours
    );
    tokio::signal::ctrl_c().await.context("Signal handling failed")?;

    info!("Received Ctrl-C, stopping scheduler");
    scheduler.dispose();
    println!("Stopped");
    Ok(())
}
