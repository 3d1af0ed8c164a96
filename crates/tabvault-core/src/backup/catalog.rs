//! Backup catalog
//!
//! Enumerates artifacts by scanning the backup directory; never mutates it.

use std::collections::BTreeMap;
use std::io::ErrorKind;

use tokio::fs;

use super::names::{self, ArtifactFile};
use super::{BackupManager, BackupMode};
use crate::error::Result;

/// One artifact as seen in the backup directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub timestamp: String,
    /// Member table names (multi-file mode only; `None` for all-in-one).
    pub tables: Option<Vec<String>>,
}

impl BackupManager {
    /// List available artifacts, newest first.
    ///
    /// Filenames not matching the artifact patterns are ignored silently.
    /// A missing directory is simply "no backups"; other I/O errors
    /// propagate for the caller to report.
    pub async fn list_backups(&self) -> Result<Vec<CatalogEntry>> {
        let mut entries = match fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut singles = Vec::new();
        let mut groups: BTreeMap<String, Vec<String>> = BTreeMap::new();
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            match (self.mode, names::classify(name)) {
                (BackupMode::SingleFile, Some(ArtifactFile::Single { timestamp })) => {
                    singles.push(timestamp);
                }
                (BackupMode::MultiFile, Some(ArtifactFile::Member { timestamp, table })) => {
                    groups.entry(timestamp).or_default().push(table);
                }
                _ => {}
            }
        }

        let mut catalog: Vec<CatalogEntry> = match self.mode {
            BackupMode::SingleFile => singles
                .into_iter()
                .map(|timestamp| CatalogEntry {
                    timestamp,
                    tables: None,
                })
                .collect(),
            BackupMode::MultiFile => groups
                .into_iter()
                .map(|(timestamp, mut tables)| {
                    tables.sort();
                    CatalogEntry {
                        timestamp,
                        tables: Some(tables),
                    }
                })
                .collect(),
        };

        // fixed-width timestamps: string order is chronological order
        catalog.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tempfile::TempDir;

    use super::*;
    use crate::config::Config;
    use crate::store::MemoryStore;

    fn manager(dir: &TempDir, single_file: bool) -> BackupManager {
        let config = Config {
            dir: dir.path().to_path_buf(),
            single_file,
            ..Config::default()
        };
        BackupManager::new(Arc::new(MemoryStore::new()), &config)
    }

    fn touch(dir: &TempDir, name: &str) {
        std::fs::write(dir.path().join(name), b"[]").unwrap();
    }

    #[tokio::test]
    async fn test_single_file_catalog_newest_first() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "backup_20240101_000000.json");
        touch(&dir, "backup_20240301_000000.json");
        touch(&dir, "backup_20240201_000000.json");
        touch(&dir, "unrelated.txt");
        // member files are invisible in single-file mode
        touch(&dir, "backup_20240401_000000_user.json");

        let catalog = manager(&dir, true).list_backups().await.unwrap();
        let timestamps: Vec<&str> = catalog.iter().map(|e| e.timestamp.as_str()).collect();
        assert_eq!(
            timestamps,
            ["20240301_000000", "20240201_000000", "20240101_000000"]
        );
        assert!(catalog.iter().all(|e| e.tables.is_none()));
    }

    #[tokio::test]
    async fn test_multi_file_catalog_groups_by_timestamp() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "backup_20240101_000000_user.json");
        touch(&dir, "backup_20240101_000000_channel.json");
        touch(&dir, "backup_20240201_000000_user.json");
        // single files are invisible in multi-file mode
        touch(&dir, "backup_20240301_000000.json");

        let catalog = manager(&dir, false).list_backups().await.unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog[0].timestamp, "20240201_000000");
        assert_eq!(catalog[0].tables.as_deref(), Some(&["user".to_string()][..]));
        assert_eq!(catalog[1].timestamp, "20240101_000000");
        assert_eq!(
            catalog[1].tables.as_deref(),
            Some(&["channel".to_string(), "user".to_string()][..])
        );
    }

    #[tokio::test]
    async fn test_missing_directory_is_empty_catalog() {
        let dir = TempDir::new().unwrap();
        let config = Config {
            dir: dir.path().join("never-created"),
            single_file: true,
            ..Config::default()
        };
        let manager = BackupManager::new(Arc::new(MemoryStore::new()), &config);
        assert!(manager.list_backups().await.unwrap().is_empty());
    }
}
