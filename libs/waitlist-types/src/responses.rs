use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{entry::WaitlistEntry, errors::ErrorCode};

/// Body of a successful `POST /api/waitlist`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub success: bool,
    pub message: String,
    pub id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntriesResponse {
    pub success: bool,
    pub data: Vec<WaitlistEntry>,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountResponse {
    pub success: bool,
    pub count: i64,
}

/// Signup counters shown on the admin dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitlistStats {
    pub total: i64,
    /// Entries submitted since midnight UTC.
    pub today: i64,
    /// Entries submitted during the last seven days.
    pub this_week: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsResponse {
    pub success: bool,
    pub stats: WaitlistStats,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClearResponse {
    pub success: bool,
    pub message: String,
    pub cleared_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupResponse {
    pub success: bool,
    pub message: String,
    /// File name of the snapshot inside the backup directory.
    pub file: String,
    /// Older snapshots removed by rotation.
    pub pruned: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub database: String,
    pub maintenance: bool,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaintenanceStatus {
    pub maintenance_mode: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaintenanceToggleResponse {
    pub success: bool,
    pub message: String,
    pub maintenance_mode: bool,
}

/// Error body shared by every endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub code: ErrorCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub duplicate: bool,
}

impl ErrorResponse {
    pub fn new(code: ErrorCode, message: Option<String>) -> Self {
        Self {
            success: false,
            duplicate: code == ErrorCode::DuplicateEmail,
            code,
            message,
        }
    }
}
