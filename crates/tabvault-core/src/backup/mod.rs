//! Backup subsystem
//!
//! Snapshots datastore tables to timestamped JSON artifacts, lists them,
//! restores them via idempotent upsert, and prunes old ones.
//!
//! # Artifact format
//!
//! An artifact is one backup run, identified by a `YYYYMMDD_HHMMSS` local
//! timestamp. Two mutually exclusive on-disk layouts:
//!
//! - **SingleFile**: `backup_<timestamp>.json`, a JSON object mapping table
//!   name → array of row objects.
//! - **MultiFile**: `backup_<timestamp>_<table>.json` per table, a JSON
//!   array of that table's row objects.
//!
//! There is no manifest; the file set is self-describing through the
//! filename patterns in [`names`]. Artifacts are never mutated in place;
//! each run writes fresh files under a fresh timestamp, and only the
//! retention sweep (or the operator) deletes them.
//!
//! Runs have partial-failure semantics: a table that cannot be fetched or
//! written is logged and reported, the rest of the run continues.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

mod catalog;
pub mod names;
mod resolver;
mod restore;
mod retention;
mod writer;

pub use catalog::CatalogEntry;
pub use resolver::{resolve_tables, Resolution};
pub use retention::PruneReport;

use crate::config::Config;
use crate::store::Datastore;

/// On-disk artifact layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackupMode {
    /// One file per run holding every table.
    SingleFile,
    /// One file per table per run.
    MultiFile,
}

/// Outcome of one backup run.
#[derive(Debug, Clone)]
pub enum BackupReport {
    /// Zero source tables resolved; no artifact was created.
    Nothing,
    /// An artifact was attempted under `timestamp`.
    Written {
        timestamp: String,
        /// Tables captured in the artifact.
        succeeded: Vec<String>,
        /// Tables that failed to fetch or write.
        failed: Vec<String>,
    },
}

impl fmt::Display for BackupReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackupReport::Nothing => write!(f, "no tables to back up"),
            BackupReport::Written {
                timestamp,
                succeeded,
                failed,
            } => {
                let attempted = succeeded.len() + failed.len();
                write!(
                    f,
                    "backed up {}/{} table(s) as {}",
                    succeeded.len(),
                    attempted,
                    timestamp
                )?;
                if !failed.is_empty() {
                    write!(f, " (failed: {})", failed.join(", "))?;
                }
                Ok(())
            }
        }
    }
}

/// Orchestrates backup, catalog, restore, and retention against one
/// datastore and one backup directory.
pub struct BackupManager {
    store: Arc<dyn Datastore>,
    dir: PathBuf,
    mode: BackupMode,
    special_tables: Vec<String>,
    primary_keys: Vec<String>,
}

impl BackupManager {
    pub fn new(store: Arc<dyn Datastore>, config: &Config) -> Self {
        Self {
            store,
            dir: config.dir.clone(),
            mode: config.mode(),
            special_tables: config.tables.clone(),
            primary_keys: config.primary_keys.clone(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn mode(&self) -> BackupMode {
        self.mode
    }
}
