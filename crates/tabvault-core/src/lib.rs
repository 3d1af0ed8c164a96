//! tabvault Core Library
//!
//! Backup and restore for a generic tabular key/value datastore:
//! - Datastore trait plus in-memory and JSON-file reference stores
//! - Row value model with a strict date round-trip contract
//! - Backup writer (single-file and multi-file artifact layouts)
//! - Backup catalog and restore via idempotent upsert
//! - Retention sweeper and periodic scheduler

pub mod backup;
pub mod config;
pub mod error;
pub mod scheduler;
pub mod store;
pub mod value;

pub use backup::{
    BackupManager, BackupMode, BackupReport, CatalogEntry, PruneReport, Resolution,
};
pub use config::Config;
pub use error::{Error, Result};
pub use scheduler::BackupScheduler;
pub use store::{Datastore, Filter, JsonFileStore, MemoryStore};
pub use value::{Row, Value};
