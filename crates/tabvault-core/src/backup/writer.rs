//! Backup writer

use indexmap::IndexMap;
use tokio::fs;
use tracing::{info, warn};

use super::{names, resolver, BackupManager, BackupMode, BackupReport};
use crate::error::Result;
use crate::store::Filter;
use crate::value::Row;

impl BackupManager {
    /// Snapshot tables to a fresh artifact.
    ///
    /// `tables` restricts the run to an explicit subset (names that match
    /// no live table are skipped with a warning); otherwise live tables are
    /// unioned with the configured special tables. A per-table fetch or
    /// write failure is logged and reported, it never aborts the run.
    pub async fn backup(&self, tables: Option<&[String]>) -> Result<BackupReport> {
        let live = self.store.stats().await?;
        let resolution = resolver::resolve_tables(&live, tables, &self.special_tables);
        for name in &resolution.skipped {
            warn!("No such table, skipping: {}", name);
        }
        if resolution.tables.is_empty() {
            return Ok(BackupReport::Nothing);
        }

        fs::create_dir_all(&self.dir).await?;

        let timestamp = names::timestamp_now();
        let mut succeeded = Vec::new();
        let mut failed = Vec::new();

        match self.mode {
            BackupMode::SingleFile => {
                let mut bundle: IndexMap<String, Vec<Row>> = IndexMap::new();
                for table in &resolution.tables {
                    match self.store.get(table, &Filter::new()).await {
                        Ok(rows) => {
                            bundle.insert(table.clone(), rows);
                            succeeded.push(table.clone());
                        }
                        Err(e) => {
                            warn!("Failed to fetch table {}: {}", table, e);
                            failed.push(table.clone());
                        }
                    }
                }
                if !bundle.is_empty() {
                    let path = self.dir.join(names::single_file_name(&timestamp));
                    fs::write(&path, serde_json::to_vec_pretty(&bundle)?).await?;
                    info!("Wrote backup: {}", path.display());
                }
            }
            BackupMode::MultiFile => {
                for table in &resolution.tables {
                    let rows = match self.store.get(table, &Filter::new()).await {
                        Ok(rows) => rows,
                        Err(e) => {
                            warn!("Failed to fetch table {}: {}", table, e);
                            failed.push(table.clone());
                            continue;
                        }
                    };
                    let path = self.dir.join(names::table_file_name(&timestamp, table));
                    let data = serde_json::to_vec_pretty(&rows)?;
                    match fs::write(&path, data).await {
                        Ok(()) => succeeded.push(table.clone()),
                        Err(e) => {
                            warn!("Failed to write {}: {}", path.display(), e);
                            failed.push(table.clone());
                        }
                    }
                }
                if !succeeded.is_empty() {
                    info!(
                        "Wrote backup {} ({} table file(s))",
                        timestamp,
                        succeeded.len()
                    );
                }
            }
        }

        Ok(BackupReport::Written {
            timestamp,
            succeeded,
            failed,
        })
    }
}
