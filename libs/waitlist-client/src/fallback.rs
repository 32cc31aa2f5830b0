//! Primary store with a local cache behind it.

use async_trait::async_trait;
use waitlist_types::WaitlistSubmission;

use crate::{
    error::ClientError,
    local::LocalCache,
    store::{SubmitOutcome, WaitlistStore},
};

/// Submits to `primary` and only writes to the local cache when the primary
/// is unavailable. Validation and duplicate errors are returned as-is.
pub struct FallbackStore<P> {
    primary: P,
    local: LocalCache,
}

/// What [`FallbackStore::sync`] did with the cached entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub uploaded: usize,
    /// Already on the server; dropped from the cache.
    pub duplicates: usize,
    /// Still cached, either rejected or not attempted.
    pub remaining: usize,
}

impl<P: WaitlistStore> FallbackStore<P> {
    pub fn new(primary: P, local: LocalCache) -> Self {
        Self { primary, local }
    }

    pub fn primary(&self) -> &P {
        &self.primary
    }

    pub fn local(&self) -> &LocalCache {
        &self.local
    }

    /// Push cached entries to the primary. Stops at the first unavailability.
    pub async fn sync(&self) -> Result<SyncReport, ClientError> {
        let entries = self.local.entries().await?;
        let mut report = SyncReport::default();
        let mut done = Vec::new();

        for entry in &entries {
            let mut submission = WaitlistSubmission::new(entry.name.clone(), entry.email.clone());
            submission.phone = entry.phone.clone();
            submission.interest = entry.interest.clone();

            match self.primary.submit(&submission).await {
                Ok(_) => {
                    report.uploaded += 1;
                    done.push(entry.id);
                }
                Err(ClientError::Duplicate) => {
                    report.duplicates += 1;
                    done.push(entry.id);
                }
                Err(err) if err.is_unavailable() => break,
                Err(_) => {}
            }
        }

        self.local.remove(&done).await?;
        report.remaining = entries.len() - done.len();
        Ok(report)
    }
}

#[async_trait]
impl<P: WaitlistStore> WaitlistStore for FallbackStore<P> {
    async fn submit(&self, submission: &WaitlistSubmission) -> Result<SubmitOutcome, ClientError> {
        match self.primary.submit(submission).await {
            Err(err) if err.is_unavailable() => self.local.submit(submission).await,
            result => result,
        }
    }
}
