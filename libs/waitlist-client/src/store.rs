use async_trait::async_trait;
use waitlist_types::WaitlistSubmission;

use crate::error::ClientError;

/// Result of a successful signup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub id: i64,
    pub message: String,
    /// The entry only exists in the local cache for now.
    pub saved_locally: bool,
}

/// Somewhere a signup can be stored.
#[async_trait]
pub trait WaitlistStore: Send + Sync {
    async fn submit(&self, submission: &WaitlistSubmission) -> Result<SubmitOutcome, ClientError>;
}
