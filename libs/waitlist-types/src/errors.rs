use serde::{Deserialize, Serialize};
use thiserror::Error;

/// API error codes returned by the waitlist endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    InvalidInput,
    DuplicateEmail,
    InvalidCredentials,
    NotFound,
    DatabaseError,
    BackupFailed,
    InternalError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidInput => "INVALID_INPUT",
            Self::DuplicateEmail => "DUPLICATE_EMAIL",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::NotFound => "NOT_FOUND",
            Self::DatabaseError => "DATABASE_ERROR",
            Self::BackupFailed => "BACKUP_FAILED",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Reasons a submission is rejected before it reaches storage.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Name and email are required")]
    MissingRequired,

    #[error("Name must be at least {min} characters long")]
    NameTooShort { min: usize },

    #[error("{field} must be at most {max} characters long")]
    TooLong { field: &'static str, max: usize },

    #[error("Please enter a valid email address")]
    InvalidEmail,
}
