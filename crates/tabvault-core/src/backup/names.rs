//! Timestamp and filename codec for backup artifacts
//!
//! Artifact timestamps are local time formatted `YYYYMMDD_HHMMSS`: fixed
//! width and zero padded, so lexicographic order is chronological order at
//! second resolution. Filenames follow two patterns:
//!
//! - single-file artifact:        `backup_<timestamp>.json`
//! - multi-file artifact member:  `backup_<timestamp>_<table>.json`
//!
//! Table names go into filenames verbatim. A table whose name embeds an
//! underscore-digit run shaped like a timestamp could produce ambiguous
//! names; classification resolves the ambiguity by trying the single-file
//! pattern first.

use std::sync::OnceLock;

use chrono::Local;
use regex::Regex;

/// Current local time as an artifact timestamp.
pub fn timestamp_now() -> String {
    Local::now().format("%Y%m%d_%H%M%S").to_string()
}

/// Split a timestamp into human-readable `(date, time)` strings.
/// Returns `None` for anything that isn't an exact artifact timestamp.
pub fn split_timestamp(timestamp: &str) -> Option<(String, String)> {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let re = PATTERN.get_or_init(|| {
        Regex::new(r"^(\d{4})(\d{2})(\d{2})_(\d{2})(\d{2})(\d{2})$").expect("valid regex")
    });
    let caps = re.captures(timestamp)?;
    Some((
        format!("{}-{}-{}", &caps[1], &caps[2], &caps[3]),
        format!("{}:{}:{}", &caps[4], &caps[5], &caps[6]),
    ))
}

/// Filename of a single-file artifact.
pub fn single_file_name(timestamp: &str) -> String {
    format!("backup_{timestamp}.json")
}

/// Filename of one multi-file artifact member.
pub fn table_file_name(timestamp: &str, table: &str) -> String {
    format!("backup_{timestamp}_{table}.json")
}

/// A backup-directory filename recognized by the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactFile {
    /// `backup_<timestamp>.json`
    Single { timestamp: String },
    /// `backup_<timestamp>_<table>.json`
    Member { timestamp: String, table: String },
}

/// Classify a filename against the artifact patterns. Anything else
/// (manifests, editor droppings, foreign files) returns `None` and is
/// ignored by the catalog and the retention sweep.
pub fn classify(name: &str) -> Option<ArtifactFile> {
    static SINGLE: OnceLock<Regex> = OnceLock::new();
    static MEMBER: OnceLock<Regex> = OnceLock::new();
    let single = SINGLE
        .get_or_init(|| Regex::new(r"^backup_(\d{8}_\d{6})\.json$").expect("valid regex"));
    let member = MEMBER
        .get_or_init(|| Regex::new(r"^backup_(\d{8}_\d{6})_(.+)\.json$").expect("valid regex"));

    if let Some(caps) = single.captures(name) {
        return Some(ArtifactFile::Single {
            timestamp: caps[1].to_string(),
        });
    }
    if let Some(caps) = member.captures(name) {
        return Some(ArtifactFile::Member {
            timestamp: caps[1].to_string(),
            table: caps[2].to_string(),
        });
    }
    None
}
