//! Configuration
//!
//! Loaded from a TOML file by the CLI; every field has a sensible default so
//! an absent file means "manual backups, multi-file layout, no retention".

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::backup::BackupMode;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Enable the periodic backup scheduler.
    pub auto_backup: bool,
    /// Hours between automatic runs (ignored unless `auto_backup`).
    pub interval_hours: u64,
    /// Backup root directory, created if missing.
    pub dir: PathBuf,
    /// Retention count; 0 = unlimited (no deletion).
    pub keep_backups: usize,
    /// One file per run (true) vs one file per table per run (false).
    pub single_file: bool,
    /// Special table names always included in a backup, resolved
    /// case-insensitively against the live table set.
    pub tables: Vec<String>,
    /// Key fields handed to the datastore's upsert on restore.
    pub primary_keys: Vec<String>,
    /// Root directory of the JSON-file datastore (CLI only).
    pub data_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            auto_backup: false,
            interval_hours: 24,
            dir: PathBuf::from("./data/backups"),
            keep_backups: 0,
            single_file: false,
            tables: Vec::new(),
            primary_keys: vec!["id".to_string()],
            data_dir: PathBuf::from("./data/store"),
        }
    }
}

impl Config {
    /// Parse a TOML config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        toml::from_str(&text).map_err(|e| Error::Config(format!("{}: {e}", path.display())))
    }

    /// Parse the config file if present, defaults otherwise.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn mode(&self) -> BackupMode {
        if self.single_file {
            BackupMode::SingleFile
        } else {
            BackupMode::MultiFile
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(!config.auto_backup);
        assert_eq!(config.interval_hours, 24);
        assert_eq!(config.dir, PathBuf::from("./data/backups"));
        assert_eq!(config.keep_backups, 0);
        assert_eq!(config.mode(), BackupMode::MultiFile);
        assert_eq!(config.primary_keys, ["id"]);
    }

    #[test]
    fn test_parse_toml() {
        let config: Config = toml::from_str(
            r#"
            auto_backup = true
            interval_hours = 6
            dir = "/var/backups/tabvault"
            keep_backups = 5
            single_file = true
            tables = ["user", "channel"]
            "#,
        )
        .unwrap();

        assert!(config.auto_backup);
        assert_eq!(config.interval_hours, 6);
        assert_eq!(config.keep_backups, 5);
        assert_eq!(config.mode(), BackupMode::SingleFile);
        assert_eq!(config.tables, ["user", "channel"]);
        // untouched fields keep their defaults
        assert_eq!(config.primary_keys, ["id"]);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: std::result::Result<Config, _> = toml::from_str("keep_backup = 3");
        assert!(result.is_err());
    }
}
