//! Restore reader
//!
//! Loads an artifact's rows (dates revived during JSON parsing, see
//! [`crate::value`]) and applies them to the datastore with idempotent
//! upsert, so repeated or partial restores never duplicate rows and need no
//! prior deletion.

use std::io::ErrorKind;
use std::path::Path;

use indexmap::IndexMap;
use tokio::fs;
use tracing::{info, warn};

use super::names::{self, ArtifactFile};
use super::{BackupManager, BackupMode};
use crate::error::{Error, Result};
use crate::value::Row;

impl BackupManager {
    /// Restore the artifact at 1-based `index` into the newest-first
    /// catalog. An out-of-range index fails without side effects.
    pub async fn restore_by_index(
        &self,
        index: usize,
        tables: Option<&[String]>,
    ) -> Result<(String, Vec<String>)> {
        let catalog = self.list_backups().await?;
        if index == 0 || index > catalog.len() {
            return Err(Error::InvalidInput(format!(
                "invalid backup index {index}: expected 1..={}",
                catalog.len()
            )));
        }
        let timestamp = catalog[index - 1].timestamp.clone();
        let restored = self.restore(&timestamp, tables).await?;
        Ok((timestamp, restored))
    }

    /// Restore one artifact, optionally limited to a table subset.
    ///
    /// Returns the table names actually restored. Empty means "nothing
    /// restored" (tables absent, or all empty), distinct from a hard
    /// failure. A timestamp with no artifact on disk fails with
    /// [`Error::NotFound`] in both layouts. Per-table failures are logged
    /// and skipped.
    pub async fn restore(&self, timestamp: &str, tables: Option<&[String]>) -> Result<Vec<String>> {
        let restored = match self.mode {
            BackupMode::SingleFile => self.restore_single(timestamp, tables).await?,
            BackupMode::MultiFile => self.restore_multi(timestamp, tables).await?,
        };
        if restored.is_empty() {
            info!("Nothing restored from {}", timestamp);
        } else {
            info!("Restored {} table(s) from {}", restored.len(), timestamp);
        }
        Ok(restored)
    }

    async fn restore_single(
        &self,
        timestamp: &str,
        tables: Option<&[String]>,
    ) -> Result<Vec<String>> {
        let path = self.dir.join(names::single_file_name(timestamp));
        let data = fs::read(&path).await.map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                Error::NotFound(format!("backup {timestamp}"))
            } else {
                e.into()
            }
        })?;
        let bundle: IndexMap<String, Vec<Row>> = serde_json::from_slice(&data)?;

        let mut restored = Vec::new();
        for (table, rows) in bundle {
            if let Some(subset) = tables {
                if !subset.iter().any(|t| t == &table) {
                    continue;
                }
            }
            if self.apply(&table, rows).await {
                restored.push(table);
            }
        }
        Ok(restored)
    }

    async fn restore_multi(
        &self,
        timestamp: &str,
        tables: Option<&[String]>,
    ) -> Result<Vec<String>> {
        // explicit subset: exact filenames; otherwise scan for members
        let members: Vec<String> = match tables {
            Some(subset) => subset.to_vec(),
            None => {
                let mut entries = match fs::read_dir(&self.dir).await {
                    Ok(entries) => entries,
                    Err(e) if e.kind() == ErrorKind::NotFound => {
                        return Err(Error::NotFound(format!("backup {timestamp}")))
                    }
                    Err(e) => return Err(e.into()),
                };
                let mut found = Vec::new();
                while let Some(entry) = entries.next_entry().await? {
                    let name = entry.file_name();
                    let Some(name) = name.to_str() else { continue };
                    if let Some(ArtifactFile::Member { timestamp: ts, table }) =
                        names::classify(name)
                    {
                        if ts == timestamp {
                            found.push(table);
                        }
                    }
                }
                // zero member files means the artifact does not exist;
                // report it the same way the single-file path does
                if found.is_empty() {
                    return Err(Error::NotFound(format!("backup {timestamp}")));
                }
                found.sort();
                found
            }
        };

        let mut restored = Vec::new();
        for table in members {
            let path = self.dir.join(names::table_file_name(timestamp, &table));
            match self.restore_member(&table, &path).await {
                Ok(true) => restored.push(table),
                Ok(false) => {}
                Err(e) => warn!("Skipping {}: {}", path.display(), e),
            }
        }
        Ok(restored)
    }

    async fn restore_member(&self, table: &str, path: &Path) -> Result<bool> {
        let data = fs::read(path).await?;
        let rows: Vec<Row> = serde_json::from_slice(&data)?;
        Ok(self.apply(table, rows).await)
    }

    /// Upsert one table's rows; empty row sets are skipped, not errors.
    async fn apply(&self, table: &str, rows: Vec<Row>) -> bool {
        if rows.is_empty() {
            return false;
        }
        match self.store.upsert(table, rows, &self.primary_keys).await {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to restore table {}: {}", table, e);
                false
            }
        }
    }
}
