use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::{sync::Mutex, task::JoinHandle};
use tracing::{error, info, instrument, warn};

use crate::{
    app_error::{AppError, AppResult},
    domain::entities::backup::{BackupReport, BackupTrigger, backup_file_name, is_backup_file},
};

/// Produces one snapshot of the datastore at `dest`.
#[async_trait]
pub trait SnapshotWriter: Send + Sync {
    /// File extension of the snapshots this writer produces, without the dot.
    fn extension(&self) -> &'static str;

    async fn write_snapshot(&self, dest: &Path) -> AppResult<()>;
}

pub struct BackupUseCases {
    writer: Arc<dyn SnapshotWriter>,
    backup_dir: PathBuf,
    retain: usize,
    // Serializes runs so concurrent triggers cannot race on rotation.
    running: Mutex<()>,
}

impl BackupUseCases {
    pub fn new(writer: Arc<dyn SnapshotWriter>, backup_dir: PathBuf, retain: usize) -> Self {
        Self {
            writer,
            backup_dir,
            retain: retain.max(1),
            running: Mutex::new(()),
        }
    }

    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    /// Write a new snapshot and rotate old ones.
    #[instrument(skip(self), fields(dir = %self.backup_dir.display()))]
    pub async fn run(&self, trigger: BackupTrigger) -> AppResult<BackupReport> {
        let _guard = self.running.lock().await;

        tokio::fs::create_dir_all(&self.backup_dir)
            .await
            .map_err(|e| {
                AppError::Backup(format!(
                    "cannot create backup directory {}: {e}",
                    self.backup_dir.display()
                ))
            })?;

        let (file, path) = self.next_destination().await;

        if let Err(err) = self.writer.write_snapshot(&path).await {
            // Never leave a half-written snapshot behind to be counted by rotation.
            if let Err(rm_err) = tokio::fs::remove_file(&path).await
                && rm_err.kind() != std::io::ErrorKind::NotFound
            {
                warn!(file = %path.display(), error = %rm_err, "Failed to remove partial backup");
            }
            return Err(err);
        }

        let pruned = prune_backups(&self.backup_dir, self.retain).await?;

        info!(
            trigger = %trigger,
            file = %file,
            pruned = pruned.len(),
            "Backup created"
        );

        Ok(BackupReport {
            trigger,
            path,
            file,
            pruned,
        })
    }

    /// Like [`run`](Self::run) but failures are logged, never returned.
    pub async fn run_logged(&self, trigger: BackupTrigger) -> Option<BackupReport> {
        match self.run(trigger).await {
            Ok(report) => Some(report),
            Err(err) => {
                error!(trigger = %trigger, error = %err, "Backup failed");
                None
            }
        }
    }

    /// Run a backup in the background.
    pub fn spawn(self: &Arc<Self>, trigger: BackupTrigger) -> JoinHandle<Option<BackupReport>> {
        let backups = Arc::clone(self);
        tokio::spawn(async move { backups.run_logged(trigger).await })
    }

    async fn next_destination(&self) -> (String, PathBuf) {
        loop {
            let file = backup_file_name(Utc::now(), self.writer.extension());
            let path = self.backup_dir.join(&file);
            if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
                return (file, path);
            }
            // Same millisecond as the previous run.
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    }
}

/// Keep the `retain` newest backup files in `dir` (by file name) and delete
/// the rest. Returns the deleted names, oldest first.
pub async fn prune_backups(dir: &Path, retain: usize) -> AppResult<Vec<String>> {
    let mut names = Vec::new();
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .map_err(|e| AppError::Backup(format!("cannot list {}: {e}", dir.display())))?;

    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| AppError::Backup(format!("cannot list {}: {e}", dir.display())))?
    {
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };
        let is_file = entry.file_type().await.map(|t| t.is_file()).unwrap_or(false);
        if is_file && is_backup_file(&name) {
            names.push(name);
        }
    }

    names.sort();
    let excess = names.len().saturating_sub(retain);

    let mut pruned = Vec::with_capacity(excess);
    for name in names.into_iter().take(excess) {
        match tokio::fs::remove_file(dir.join(&name)).await {
            Ok(()) => {
                info!(file = %name, "Deleted old backup");
                pruned.push(name);
            }
            Err(e) => warn!(file = %name, error = %e, "Failed to delete old backup"),
        }
    }

    Ok(pruned)
}
