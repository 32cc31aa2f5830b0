//! File-backed [`WaitlistStore`] used while the API is unreachable.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use waitlist_types::{NewWaitlistEntry, WaitlistEntry, WaitlistSubmission, render_csv};

use crate::{
    error::ClientError,
    store::{SubmitOutcome, WaitlistStore},
};

/// Entries kept in a JSON array on disk. Ids are assigned as `max(id) + 1`
/// and emails are unique ignoring case, like the server.
pub struct LocalCache {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl LocalCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All cached entries in insertion order.
    pub async fn entries(&self) -> Result<Vec<WaitlistEntry>, ClientError> {
        let _guard = self.lock.lock().await;
        self.load().await
    }

    /// Cached entries as CSV, in the same format as the server export.
    pub async fn export_csv(&self) -> Result<String, ClientError> {
        Ok(render_csv(&self.entries().await?))
    }

    /// Drop the given ids, typically after they reached the server.
    pub async fn remove(&self, ids: &[i64]) -> Result<usize, ClientError> {
        let _guard = self.lock.lock().await;
        let mut entries = self.load().await?;
        let before = entries.len();
        entries.retain(|e| !ids.contains(&e.id));
        let removed = before - entries.len();
        if removed > 0 {
            self.save(&entries).await?;
        }
        Ok(removed)
    }

    async fn load(&self) -> Result<Vec<WaitlistEntry>, ClientError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(Vec::new()),
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                ClientError::Cache(format!("cannot parse {}: {e}", self.path.display()))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(ClientError::Cache(format!(
                "cannot read {}: {e}",
                self.path.display()
            ))),
        }
    }

    /// Write to a sibling temp file and rename, so a crash never leaves half a file.
    async fn save(&self, entries: &[WaitlistEntry]) -> Result<(), ClientError> {
        let json =
            serde_json::to_vec_pretty(entries).map_err(|e| ClientError::Cache(e.to_string()))?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ClientError::Cache(format!("cannot create {}: {e}", parent.display())))?;
        }

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        tokio::fs::write(&tmp, json)
            .await
            .map_err(|e| ClientError::Cache(format!("cannot write {}: {e}", tmp.display())))?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(|e| {
            ClientError::Cache(format!("cannot replace {}: {e}", self.path.display()))
        })
    }
}

#[async_trait]
impl WaitlistStore for LocalCache {
    async fn submit(&self, submission: &WaitlistSubmission) -> Result<SubmitOutcome, ClientError> {
        let new_entry = NewWaitlistEntry::parse(submission.clone())?;

        let _guard = self.lock.lock().await;
        let mut entries = self.load().await?;

        if entries
            .iter()
            .any(|e| e.email.eq_ignore_ascii_case(new_entry.email()))
        {
            return Err(ClientError::Duplicate);
        }

        let id = entries.iter().map(|e| e.id).max().unwrap_or(0) + 1;
        entries.push(new_entry.into_entry(id, Utc::now()));
        self.save(&entries).await?;

        Ok(SubmitOutcome {
            id,
            message: "Successfully joined the waitlist! (Saved locally until server is available)"
                .to_string(),
            saved_locally: true,
        })
    }
}
