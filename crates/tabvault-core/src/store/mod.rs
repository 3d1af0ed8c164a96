//! Datastore abstraction
//!
//! The datastore is an external collaborator: this library only depends on
//! the narrow tabular surface below. Two reference implementations are
//! provided: an in-memory store (tests, embedders) and a JSON-file store
//! (backs the CLI).

use std::collections::BTreeMap;

use async_trait::async_trait;
use indexmap::IndexMap;

use crate::error::Result;
use crate::value::{Row, Value};

mod jsonfile;
mod memory;

pub use jsonfile::JsonFileStore;
pub use memory::MemoryStore;

/// Field-equality filter; an empty filter matches every row.
pub type Filter = IndexMap<String, Value>;

/// Generic tabular datastore surface.
#[async_trait]
pub trait Datastore: Send + Sync {
    /// Fetch all rows of `table` matching `filter`.
    ///
    /// Fails with [`crate::Error::UnknownTable`] when the table does not
    /// exist. Callers doing best-effort work (the backup writer) catch this
    /// per table rather than aborting the run.
    async fn get(&self, table: &str, filter: &Filter) -> Result<Vec<Row>>;

    /// Merge `patch` into every row matching `filter`; returns the number
    /// of rows updated.
    async fn set(&self, table: &str, filter: &Filter, patch: &Row) -> Result<u64>;

    /// Append one row, creating the table if needed.
    async fn create(&self, table: &str, row: Row) -> Result<()>;

    /// Insert-or-update by the named key fields. Idempotent: applying the
    /// same rows twice leaves the table in the same state. This is the
    /// compatibility contract the restore path relies on.
    async fn upsert(&self, table: &str, rows: Vec<Row>, keys: &[String]) -> Result<()>;

    /// Delete rows matching `filter`; returns the number removed.
    async fn remove(&self, table: &str, filter: &Filter) -> Result<u64>;

    /// Drop one table.
    async fn drop_table(&self, table: &str) -> Result<()>;

    /// Drop every table.
    async fn drop_all(&self) -> Result<()>;

    /// Per-table row counts for all live tables.
    async fn stats(&self) -> Result<BTreeMap<String, u64>>;
}

/// True when every filter field is present and equal in `row`.
pub(crate) fn matches_filter(row: &Row, filter: &Filter) -> bool {
    filter.iter().all(|(key, value)| row.get(key) == Some(value))
}

/// True when `a` and `b` agree on every key field. Rows missing a key field
/// never match, so keyless rows always append on upsert.
pub(crate) fn same_key(a: &Row, b: &Row, keys: &[String]) -> bool {
    !keys.is_empty()
        && keys.iter().all(|key| match (a.get(key), b.get(key)) {
            (Some(left), Some(right)) => left == right,
            _ => false,
        })
}

/// Merge `patch` fields into `row`, overwriting existing values.
pub(crate) fn merge_row(row: &mut Row, patch: &Row) {
    for (key, value) in patch {
        row.insert(key.clone(), value.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, i64)]) -> Row {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), Value::from(*v)))
            .collect()
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        assert!(matches_filter(&row(&[("id", 1)]), &Filter::new()));
        assert!(matches_filter(&Row::new(), &Filter::new()));
    }

    #[test]
    fn test_filter_requires_all_fields_equal() {
        let r = row(&[("id", 1), ("n", 2)]);
        assert!(matches_filter(&r, &row(&[("id", 1)])));
        assert!(!matches_filter(&r, &row(&[("id", 2)])));
        assert!(!matches_filter(&r, &row(&[("missing", 1)])));
    }

    #[test]
    fn test_same_key_needs_both_sides() {
        let keys = vec!["id".to_string()];
        assert!(same_key(&row(&[("id", 1)]), &row(&[("id", 1), ("n", 9)]), &keys));
        assert!(!same_key(&row(&[("id", 1)]), &row(&[("id", 2)]), &keys));
        assert!(!same_key(&row(&[("n", 1)]), &row(&[("id", 1)]), &keys));
        assert!(!same_key(&row(&[("id", 1)]), &row(&[("id", 1)]), &[]));
    }
}
