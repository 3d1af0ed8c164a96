//! CLI command implementations

use std::sync::Arc;

use anyhow::{Context, Result};
use tabvault_core::{BackupManager, Config, JsonFileStore, Row};

mod backup;
mod tables;

pub use backup::{cmd_backup, cmd_list, cmd_prune, cmd_restore, cmd_watch};
pub use tables::{cmd_drop, cmd_insert, cmd_query, cmd_remove, cmd_tables, cmd_update};

/// Open the JSON-file datastore the config points at.
fn open_store(config: &Config) -> Result<Arc<JsonFileStore>> {
    let store = JsonFileStore::new(&config.data_dir).with_context(|| {
        format!(
            "Failed to open data directory: {}",
            config.data_dir.display()
        )
    })?;
    Ok(Arc::new(store))
}

/// Build the backup manager over the configured store.
fn open_manager(config: &Config) -> Result<BackupManager> {
    Ok(BackupManager::new(open_store(config)?, config))
}

/// Parse a JSON-object argument (row, filter, patch) into a `Row`.
fn parse_object(what: &str, text: &str) -> Result<Row> {
    serde_json::from_str(text).with_context(|| format!("Invalid {what}, expected a JSON object"))
}
