//! In-memory datastore

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{matches_filter, merge_row, same_key, Datastore, Filter};
use crate::error::{Error, Result};
use crate::value::Row;

/// In-memory datastore. Used as the test double throughout the library and
/// available to embedders that keep their tables in process.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<BTreeMap<String, Vec<Row>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Datastore for MemoryStore {
    async fn get(&self, table: &str, filter: &Filter) -> Result<Vec<Row>> {
        let tables = self.tables.read().await;
        let rows = tables
            .get(table)
            .ok_or_else(|| Error::UnknownTable(table.to_string()))?;
        Ok(rows
            .iter()
            .filter(|row| matches_filter(row, filter))
            .cloned()
            .collect())
    }

    async fn set(&self, table: &str, filter: &Filter, patch: &Row) -> Result<u64> {
        let mut tables = self.tables.write().await;
        let rows = tables
            .get_mut(table)
            .ok_or_else(|| Error::UnknownTable(table.to_string()))?;
        let mut updated = 0;
        for row in rows.iter_mut() {
            if matches_filter(row, filter) {
                merge_row(row, patch);
                updated += 1;
            }
        }
        Ok(updated)
    }

    async fn create(&self, table: &str, row: Row) -> Result<()> {
        let mut tables = self.tables.write().await;
        tables.entry(table.to_string()).or_default().push(row);
        Ok(())
    }

    async fn upsert(&self, table: &str, rows: Vec<Row>, keys: &[String]) -> Result<()> {
        let mut tables = self.tables.write().await;
        let existing = tables.entry(table.to_string()).or_default();
        for incoming in rows {
            match existing.iter_mut().find(|row| same_key(row, &incoming, keys)) {
                Some(row) => *row = incoming,
                None => existing.push(incoming),
            }
        }
        Ok(())
    }

    async fn remove(&self, table: &str, filter: &Filter) -> Result<u64> {
        let mut tables = self.tables.write().await;
        let rows = tables
            .get_mut(table)
            .ok_or_else(|| Error::UnknownTable(table.to_string()))?;
        let before = rows.len();
        rows.retain(|row| !matches_filter(row, filter));
        Ok((before - rows.len()) as u64)
    }

    async fn drop_table(&self, table: &str) -> Result<()> {
        let mut tables = self.tables.write().await;
        tables
            .remove(table)
            .ok_or_else(|| Error::UnknownTable(table.to_string()))?;
        Ok(())
    }

    async fn drop_all(&self) -> Result<()> {
        self.tables.write().await.clear();
        Ok(())
    }

    async fn stats(&self) -> Result<BTreeMap<String, u64>> {
        let tables = self.tables.read().await;
        Ok(tables
            .iter()
            .map(|(name, rows)| (name.clone(), rows.len() as u64))
            .collect())
    }
}
