//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI
//! arguments. The actual command implementations are in the `commands`
//! module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// tabvault - back up and restore a tabular key/value datastore
#[derive(Parser)]
#[command(name = "tabvault")]
#[command(about = "Table backup and restore for a JSON-file datastore", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Configuration file path
    #[arg(long, default_value = "tabvault.toml", global = true)]
    pub config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show per-table row counts
    Tables,

    /// Query rows from a table
    Query {
        /// Table name
        table: String,

        /// Field-equality filter as a JSON object, e.g. '{"id": 1}'
        #[arg(short, long)]
        filter: Option<String>,
    },

    /// Insert a row into a table
    Insert {
        /// Table name
        table: String,

        /// Row as a JSON object
        row: String,
    },

    /// Merge a JSON patch into every row matching a filter
    Update {
        /// Table name
        table: String,

        /// Field-equality filter as a JSON object
        #[arg(short, long)]
        filter: String,

        /// Patch as a JSON object
        patch: String,
    },

    /// Remove rows matching a filter (all rows if no filter given)
    Remove {
        /// Table name
        table: String,

        /// Field-equality filter as a JSON object
        #[arg(short, long)]
        filter: Option<String>,
    },

    /// Drop one table, or every table with --all
    Drop {
        /// Table name
        table: Option<String>,

        /// Drop every table
        #[arg(long)]
        all: bool,
    },

    /// Run a backup now
    Backup {
        /// Restrict the run to these tables
        #[arg(short, long)]
        tables: Vec<String>,
    },

    /// List available backups, newest first
    List,

    /// Restore a backup by 1-based index into the listing (newest = 1)
    Restore {
        /// Backup index, as shown by `tabvault list`
        #[arg(default_value_t = 1)]
        index: usize,

        /// Restore only these tables
        #[arg(short, long)]
        tables: Vec<String>,
    },

    /// Delete old backups beyond the retention count
    Prune {
        /// Backups to keep (defaults to keep_backups from the config)
        #[arg(short, long)]
        keep: Option<usize>,
    },

    /// Run the periodic backup scheduler in the foreground
    Watch,
}
