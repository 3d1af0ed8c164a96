//! JSON-file datastore
//!
//! One `<table>.json` file per table under a data directory, each holding a
//! JSON array of row objects. Small and human-inspectable; backs the CLI.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::info;

use super::{matches_filter, merge_row, same_key, Datastore, Filter};
use crate::error::{Error, Result};
use crate::value::Row;

/// Datastore persisting each table as a JSON file.
pub struct JsonFileStore {
    data_dir: PathBuf,
}

impl JsonFileStore {
    /// Create a new store rooted at `data_dir`, creating the directory if
    /// it doesn't exist.
    pub fn new(data_dir: impl Into<PathBuf>) -> Result<Self> {
        let data_dir = data_dir.into();
        if !data_dir.exists() {
            std::fs::create_dir_all(&data_dir)?;
            info!("Created data directory: {}", data_dir.display());
        }
        Ok(Self { data_dir })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn table_path(&self, table: &str) -> PathBuf {
        self.data_dir.join(format!("{table}.json"))
    }

    async fn load(&self, table: &str) -> Result<Vec<Row>> {
        match fs::read(self.table_path(table)).await {
            Ok(data) => Ok(serde_json::from_slice(&data)?),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(Error::UnknownTable(table.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn load_or_empty(&self, table: &str) -> Result<Vec<Row>> {
        match self.load(table).await {
            Ok(rows) => Ok(rows),
            Err(Error::UnknownTable(_)) => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    async fn save(&self, table: &str, rows: &[Row]) -> Result<()> {
        let data = serde_json::to_vec_pretty(&rows)?;
        fs::write(self.table_path(table), data).await?;
        Ok(())
    }
}

#[async_trait]
impl Datastore for JsonFileStore {
    async fn get(&self, table: &str, filter: &Filter) -> Result<Vec<Row>> {
        let rows = self.load(table).await?;
        Ok(rows
            .into_iter()
            .filter(|row| matches_filter(row, filter))
            .collect())
    }

    async fn set(&self, table: &str, filter: &Filter, patch: &Row) -> Result<u64> {
        let mut rows = self.load(table).await?;
        let mut updated = 0;
        for row in rows.iter_mut() {
            if matches_filter(row, filter) {
                merge_row(row, patch);
                updated += 1;
            }
        }
        if updated > 0 {
            self.save(table, &rows).await?;
        }
        Ok(updated)
    }

    async fn create(&self, table: &str, row: Row) -> Result<()> {
        let mut rows = self.load_or_empty(table).await?;
        rows.push(row);
        self.save(table, &rows).await
    }

    async fn upsert(&self, table: &str, incoming: Vec<Row>, keys: &[String]) -> Result<()> {
        let mut rows = self.load_or_empty(table).await?;
        for row in incoming {
            match rows.iter_mut().find(|existing| same_key(existing, &row, keys)) {
                Some(existing) => *existing = row,
                None => rows.push(row),
            }
        }
        self.save(table, &rows).await
    }

    async fn remove(&self, table: &str, filter: &Filter) -> Result<u64> {
        let mut rows = self.load(table).await?;
        let before = rows.len();
        rows.retain(|row| !matches_filter(row, filter));
        let removed = (before - rows.len()) as u64;
        if removed > 0 {
            self.save(table, &rows).await?;
        }
        Ok(removed)
    }

    async fn drop_table(&self, table: &str) -> Result<()> {
        match fs::remove_file(self.table_path(table)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(Error::UnknownTable(table.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn drop_all(&self) -> Result<()> {
        let mut entries = fs::read_dir(&self.data_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some("json") {
                fs::remove_file(&path).await?;
            }
        }
        Ok(())
    }

    async fn stats(&self) -> Result<BTreeMap<String, u64>> {
        let mut counts = BTreeMap::new();
        let mut entries = fs::read_dir(&self.data_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let table = match path.file_stem().and_then(|s| s.to_str()) {
                Some(stem) => stem.to_string(),
                None => continue,
            };
            let rows = self.load(&table).await?;
            counts.insert(table, rows.len() as u64);
        }
        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::value::Value;

    fn row(id: i64, name: &str) -> Row {
        let mut row = Row::new();
        row.insert("id".to_string(), Value::from(id));
        row.insert("name".to_string(), Value::from(name));
        row
    }

    #[tokio::test]
    async fn test_new_creates_directory() {
        let dir = TempDir::new().unwrap();
        let data_dir = dir.path().join("store");
        assert!(!data_dir.exists());

        let _store = JsonFileStore::new(&data_dir).unwrap();
        assert!(data_dir.exists());
    }

    #[tokio::test]
    async fn test_rows_persist_across_instances() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path()).unwrap();
        store.create("user", row(1, "alice")).await.unwrap();

        let reopened = JsonFileStore::new(dir.path()).unwrap();
        let all = reopened.get("user", &Filter::new()).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0]["name"].as_str(), Some("alice"));
    }

    #[tokio::test]
    async fn test_upsert_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path()).unwrap();
        let keys = vec!["id".to_string()];

        store
            .upsert("user", vec![row(1, "alice")], &keys)
            .await
            .unwrap();
        store
            .upsert("user", vec![row(1, "alice")], &keys)
            .await
            .unwrap();

        let all = store.get("user", &Filter::new()).await.unwrap();
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn test_stats_counts_tables() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path()).unwrap();
        store.create("user", row(1, "alice")).await.unwrap();
        store.create("user", row(2, "bob")).await.unwrap();
        store.create("channel", row(1, "general")).await.unwrap();

        let stats = store.stats().await.unwrap();
        assert_eq!(stats["user"], 2);
        assert_eq!(stats["channel"], 1);
    }

    #[tokio::test]
    async fn test_drop_table_removes_file() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path()).unwrap();
        store.create("user", row(1, "alice")).await.unwrap();

        store.drop_table("user").await.unwrap();
        assert!(!dir.path().join("user.json").exists());
        assert!(store.drop_table("user").await.is_err());
    }

    #[tokio::test]
    async fn test_drop_all_clears_every_table() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path()).unwrap();
        store.create("user", row(1, "alice")).await.unwrap();
        store.create("channel", row(1, "general")).await.unwrap();

        store.drop_all().await.unwrap();
        assert!(store.stats().await.unwrap().is_empty());
    }
}
