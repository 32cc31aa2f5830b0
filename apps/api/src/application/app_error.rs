use thiserror::Error;
use waitlist_types::ValidationError;

pub use waitlist_types::ErrorCode;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("This email is already registered on our waitlist.")]
    DuplicateEmail,

    #[error("Not found")]
    NotFound,

    #[error("Backup failed: {0}")]
    Backup(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Database(_) => ErrorCode::DatabaseError,
            AppError::InvalidCredentials => ErrorCode::InvalidCredentials,
            AppError::InvalidInput(_) => ErrorCode::InvalidInput,
            AppError::DuplicateEmail => ErrorCode::DuplicateEmail,
            AppError::NotFound => ErrorCode::NotFound,
            AppError::Backup(_) => ErrorCode::BackupFailed,
            AppError::Internal(_) => ErrorCode::InternalError,
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::InvalidInput(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;
