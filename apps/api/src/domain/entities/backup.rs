use std::path::PathBuf;

use chrono::{DateTime, Utc};

pub const BACKUP_FILE_PREFIX: &str = "waitlist-backup-";

/// What caused a backup run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum BackupTrigger {
    Scheduled,
    Manual,
    /// Every Nth successful signup.
    Milestone,
    BeforeClear,
    Shutdown,
}

#[derive(Debug, Clone)]
pub struct BackupReport {
    pub trigger: BackupTrigger,
    pub path: PathBuf,
    /// File name inside the backup directory.
    pub file: String,
    /// Snapshots deleted by rotation, oldest first.
    pub pruned: Vec<String>,
}

/// `waitlist-backup-2024-05-01T12-30-00.123Z.sqlite`
///
/// Colons are replaced so the name is valid on every filesystem; lexical
/// order of these names is chronological order.
pub fn backup_file_name(at: DateTime<Utc>, extension: &str) -> String {
    format!(
        "{BACKUP_FILE_PREFIX}{}.{extension}",
        at.format("%Y-%m-%dT%H-%M-%S%.3fZ")
    )
}

pub fn is_backup_file(name: &str) -> bool {
    name.starts_with(BACKUP_FILE_PREFIX)
}
