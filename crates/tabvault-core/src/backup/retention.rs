//! Retention sweeper
//!
//! Deletes the oldest artifacts beyond the configured retention count.
//! Retention counts whole artifacts, not raw files: member files are
//! grouped by timestamp first, so a multi-file artifact is kept or deleted
//! as a unit even when table sets differ between runs.

use std::collections::BTreeMap;
use std::io::ErrorKind;

use tokio::fs;
use tracing::{info, warn};

use super::names::{self, ArtifactFile};
use super::BackupManager;
use crate::error::Result;

/// Outcome of one retention sweep.
#[derive(Debug, Clone, Default)]
pub struct PruneReport {
    /// Artifacts fully deleted.
    pub deleted_artifacts: usize,
    /// Every file removed, across all deleted artifacts.
    pub deleted_files: Vec<String>,
    /// Artifacts remaining after the sweep.
    pub retained: usize,
}

impl BackupManager {
    /// Delete artifacts beyond the `keep` most recent. `keep == 0` means
    /// unlimited retention and is a no-op. Per-file delete failures are
    /// logged and do not abort the sweep.
    pub async fn cleanup(&self, keep: usize) -> Result<PruneReport> {
        if keep == 0 {
            return Ok(PruneReport::default());
        }

        let mut groups: BTreeMap<String, Vec<String>> = BTreeMap::new();
        let mut entries = match fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(PruneReport::default()),
            Err(e) => return Err(e.into()),
        };
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            let timestamp = match names::classify(name) {
                Some(ArtifactFile::Single { timestamp }) => timestamp,
                Some(ArtifactFile::Member { timestamp, .. }) => timestamp,
                None => continue,
            };
            groups.entry(timestamp).or_default().push(name.to_string());
        }

        let total = groups.len();
        if total <= keep {
            return Ok(PruneReport {
                retained: total,
                ..PruneReport::default()
            });
        }

        // BTreeMap iterates oldest-first; everything before the newest
        // `keep` groups goes
        let mut deleted_artifacts = 0;
        let mut deleted_files = Vec::new();
        for (timestamp, files) in groups.iter().take(total - keep) {
            let mut intact = true;
            for file in files {
                match fs::remove_file(self.dir.join(file)).await {
                    Ok(()) => deleted_files.push(file.clone()),
                    Err(e) => {
                        warn!("Failed to delete {}: {}", file, e);
                        intact = false;
                    }
                }
            }
            if intact {
                deleted_artifacts += 1;
                info!("Pruned backup {}", timestamp);
            }
        }

        Ok(PruneReport {
            deleted_artifacts,
            deleted_files,
            retained: total - deleted_artifacts,
        })
    }
}
