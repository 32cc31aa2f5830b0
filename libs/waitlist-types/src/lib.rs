//! Shared types for the waitlist service.
//!
//! This crate provides:
//! - The stored entry and the raw signup form
//! - Submission validation and normalization (`NewWaitlistEntry::parse`)
//! - CSV rendering used by the export endpoint and the local cache
//! - JSON response bodies and error codes

mod csv;
mod entry;
mod errors;
mod responses;

pub use csv::{CSV_HEADER, escape_field, render_csv};
pub use entry::{NewWaitlistEntry, WaitlistEntry, WaitlistSubmission, is_valid_email};
pub use errors::{ErrorCode, ValidationError};
pub use responses::{
    BackupResponse, ClearResponse, CountResponse, EntriesResponse, ErrorResponse, HealthResponse,
    MaintenanceStatus, MaintenanceToggleResponse, MessageResponse, StatsResponse,
    SubmitResponse, WaitlistStats,
};
