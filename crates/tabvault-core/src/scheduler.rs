//! Periodic backup scheduler
//!
//! Wraps a [`BackupManager`] in a tokio interval task: every tick runs a
//! backup then a retention sweep and logs the outcome. Errors inside a tick
//! are caught and logged, never propagated; the timer must keep running.
//! The scheduler owns its timer handle explicitly; there is no global
//! state, and `dispose` is idempotent.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::interval;
use tracing::{error, info, warn};

use crate::backup::BackupManager;

pub struct BackupScheduler {
    manager: Arc<BackupManager>,
    interval_hours: u64,
    keep: usize,
    handle: Option<JoinHandle<()>>,
}

impl BackupScheduler {
    pub fn new(manager: Arc<BackupManager>, interval_hours: u64, keep: usize) -> Self {
        Self {
            manager,
            interval_hours,
            keep,
            handle: None,
        }
    }

    /// Start the periodic timer. Does nothing if the interval is zero or a
    /// timer is already running.
    pub fn start(&mut self) {
        if self.handle.is_some() || self.interval_hours == 0 {
            return;
        }
        info!(
            "Starting backup scheduler: every {} hour(s), keeping {}",
            self.interval_hours,
            if self.keep == 0 {
                "all backups".to_string()
            } else {
                format!("{} backup(s)", self.keep)
            }
        );

        let manager = self.manager.clone();
        let keep = self.keep;
        let period = Duration::from_secs(self.interval_hours * 3600);
        self.handle = Some(tokio::spawn(async move {
            let mut ticker = interval(period);
            // skip the immediate first tick; no backup on startup
            ticker.tick().await;
            loop {
                ticker.tick().await;
                info!("Running scheduled backup...");
                let outcome = run_cycle(&manager, keep).await;
                info!("Scheduled backup: {}", outcome);
            }
        }));
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Manual trigger; same code path as the timer. Returns the formatted
    /// outcome instead of failing.
    pub async fn run_once(&self) -> String {
        run_cycle(&self.manager, self.keep).await
    }

    /// Cancel the timer. Safe to call any number of times.
    pub fn dispose(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            info!("Backup scheduler stopped");
        }
    }
}

impl Drop for BackupScheduler {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// One backup-then-sweep cycle. Never fails; errors become the returned
/// message so the timer survives them.
async fn run_cycle(manager: &BackupManager, keep: usize) -> String {
    let message = match manager.backup(None).await {
        Ok(report) => report.to_string(),
        Err(e) => {
            error!("Backup failed: {}", e);
            format!("backup failed: {e}")
        }
    };

    if keep > 0 {
        match manager.cleanup(keep).await {
            Ok(report) if report.deleted_artifacts > 0 => {
                info!(
                    "Pruned {} old backup(s) ({} file(s))",
                    report.deleted_artifacts,
                    report.deleted_files.len()
                );
            }
            Ok(_) => {}
            Err(e) => warn!("Failed to prune old backups: {}", e),
        }
    }

    message
}
