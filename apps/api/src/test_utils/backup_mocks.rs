//! Snapshot writer doubles.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::{
    app_error::{AppError, AppResult},
    use_cases::backup::SnapshotWriter,
};

/// Writes a fixed payload and counts how often it was called.
#[derive(Default)]
pub struct MemorySnapshotWriter {
    pub calls: AtomicUsize,
}

impl MemorySnapshotWriter {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SnapshotWriter for MemorySnapshotWriter {
    fn extension(&self) -> &'static str {
        "snap"
    }

    async fn write_snapshot(&self, dest: &Path) -> AppResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::fs::write(dest, b"snapshot")
            .await
            .map_err(|e| AppError::Backup(e.to_string()))
    }
}

/// Leaves a partial file behind and then fails, like a dump that dies midway.
pub struct FailingSnapshotWriter;

#[async_trait]
impl SnapshotWriter for FailingSnapshotWriter {
    fn extension(&self) -> &'static str {
        "snap"
    }

    async fn write_snapshot(&self, dest: &Path) -> AppResult<()> {
        tokio::fs::write(dest, b"parti")
            .await
            .map_err(|e| AppError::Backup(e.to_string()))?;
        Err(AppError::Backup("disk full".into()))
    }
}
