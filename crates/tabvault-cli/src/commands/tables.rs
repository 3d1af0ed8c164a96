//! Datastore management commands

use anyhow::{bail, Context, Result};
use tabvault_core::{Config, Datastore, Filter};

use super::{open_store, parse_object};

/// Show per-table row counts
pub async fn cmd_tables(config: &Config) -> Result<()> {
    let store = open_store(config)?;
    let stats = store.stats().await.context("Failed to read table stats")?;

    if stats.is_empty() {
        println!("No tables");
        println!("Data directory: {}", config.data_dir.display());
        return Ok(());
    }

    println!("{:<30} {:>8}", "TABLE", "ROWS");
    println!("{}", "-".repeat(39));
    for (table, count) in &stats {
        println!("{:<30} {:>8}", table, count);
    }

    Ok(())
}

/// Print rows matching an optional filter
pub async fn cmd_query(config: &Config, table: &str, filter: Option<&str>) -> Result<()> {
    let store = open_store(config)?;
    let filter = match filter {
        Some(text) => parse_object("filter", text)?,
        None => Filter::new(),
    };

    let rows = store
        .get(table, &filter)
        .await
        .with_context(|| format!("Failed to query table {table}"))?;

    println!("{}", serde_json::to_string_pretty(&rows)?);
    println!("{} row(s)", rows.len());
    Ok(())
}

/// Insert one row
pub async fn cmd_insert(config: &Config, table: &str, row: &str) -> Result<()> {
    let store = open_store(config)?;
    let row = parse_object("row", row)?;

    store
        .create(table, row)
        .await
        .with_context(|| format!("Failed to insert into {table}"))?;

    println!("Inserted 1 row into {table}");
    Ok(())
}

/// Merge a patch into every matching row
pub async fn cmd_update(config: &Config, table: &str, filter: &str, patch: &str) -> Result<()> {
    let store = open_store(config)?;
    let filter = parse_object("filter", filter)?;
    let patch = parse_object("patch", patch)?;

    let updated = store
        .set(table, &filter, &patch)
        .await
        .with_context(|| format!("Failed to update {table}"))?;

    println!("Updated {updated} row(s) in {table}");
    Ok(())
}

/// Remove matching rows
pub async fn cmd_remove(config: &Config, table: &str, filter: Option<&str>) -> Result<()> {
    let store = open_store(config)?;
    let filter = match filter {
        Some(text) => parse_object("filter", text)?,
        None => Filter::new(),
    };

    let removed = store
        .remove(table, &filter)
        .await
        .with_context(|| format!("Failed to remove from {table}"))?;

    println!("Removed {removed} row(s) from {table}");
    Ok(())
}

/// Drop one table, or every table
pub async fn cmd_drop(config: &Config, table: Option<&str>, all: bool) -> Result<()> {
    let store = open_store(config)?;

    match (table, all) {
        (Some(table), false) => {
            store
                .drop_table(table)
                .await
                .with_context(|| format!("Failed to drop {table}"))?;
            println!("Dropped table {table}");
        }
        (None, true) => {
            store.drop_all().await.context("Failed to drop tables")?;
            println!("Dropped all tables");
        }
        (Some(_), true) => bail!("Pass either a table name or --all, not both"),
        (None, false) => bail!("Pass a table name, or --all to drop everything"),
    }

    Ok(())
}
