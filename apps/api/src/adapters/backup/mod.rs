//! Snapshot writers used by the backup use cases.
//!
//! `SqliteSnapshotWriter` copies the live database with `VACUUM INTO`.
//! `ExternalDumpWriter` runs an operator-supplied dump command (for example
//! `sqlite3 waitlist.db .dump`) and stores its stdout.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::SqlitePool;
use tokio::process::Command;
use tracing::debug;

use crate::{
    app_error::{AppError, AppResult},
    use_cases::backup::SnapshotWriter,
};

const MAX_STDERR_IN_ERROR: usize = 500;

#[derive(Clone)]
pub struct SqliteSnapshotWriter {
    pool: SqlitePool,
}

impl SqliteSnapshotWriter {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SnapshotWriter for SqliteSnapshotWriter {
    fn extension(&self) -> &'static str {
        "sqlite"
    }

    async fn write_snapshot(&self, dest: &Path) -> AppResult<()> {
        let dest_str = dest
            .to_str()
            .ok_or_else(|| AppError::Backup(format!("non UTF-8 path {}", dest.display())))?;

        sqlx::query("VACUUM INTO ?")
            .bind(dest_str)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Backup(format!("VACUUM INTO failed: {e}")))?;

        // An in-memory database accepts VACUUM INTO without writing anything.
        let written = tokio::fs::try_exists(dest)
            .await
            .map_err(|e| AppError::Backup(format!("cannot stat {}: {e}", dest.display())))?;
        if !written {
            return Err(AppError::Backup(format!(
                "VACUUM INTO did not create {}",
                dest.display()
            )));
        }
        Ok(())
    }
}

/// Runs an external dump program with a hard timeout. The child is killed
/// if it outlives the timeout.
#[derive(Debug, Clone)]
pub struct ExternalDumpWriter {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl ExternalDumpWriter {
    pub fn new(program: impl Into<String>, args: Vec<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args,
            timeout,
        }
    }

    /// Build from a whitespace separated command line such as
    /// `sqlite3 /var/lib/waitlist/waitlist.db .dump`.
    pub fn from_command_line(command_line: &str, timeout: Duration) -> Option<Self> {
        let mut parts = command_line.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self::new(program, parts.collect(), timeout))
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

#[async_trait]
impl SnapshotWriter for ExternalDumpWriter {
    fn extension(&self) -> &'static str {
        "sql"
    }

    async fn write_snapshot(&self, dest: &Path) -> AppResult<()> {
        let file = tokio::fs::File::create(dest)
            .await
            .map_err(|e| AppError::Backup(format!("cannot create {}: {e}", dest.display())))?
            .into_std()
            .await;

        debug!(program = %self.program, args = ?self.args, "Running dump command");

        let child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::from(file))
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| AppError::Backup(format!("failed to start `{}`: {e}", self.program)))?;

        // Dropping the future on timeout drops the child, which kills it.
        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| {
                AppError::Backup(format!(
                    "`{}` timed out after {}s",
                    self.program,
                    self.timeout.as_secs_f64()
                ))
            })?
            .map_err(|e| AppError::Backup(format!("`{}` failed: {e}", self.program)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stderr: String = stderr.trim().chars().take(MAX_STDERR_IN_ERROR).collect();
            return Err(AppError::Backup(format!(
                "`{}` exited with {}: {stderr}",
                self.program, output.status
            )));
        }

        Ok(())
    }
}
