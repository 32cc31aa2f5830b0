use thiserror::Error;
use waitlist_types::{ErrorCode, ValidationError};

/// Client-side errors.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The submission failed local validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The email is already on the waitlist.
    #[error("This email is already registered on our waitlist.")]
    Duplicate,

    /// API returned an error
    #[error("API error ({status}): {code} - {message}")]
    Api {
        status: u16,
        code: ErrorCode,
        message: String,
    },

    /// The API could not be reached or did not answer with JSON.
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    /// Reading or writing the local cache failed.
    #[error("Local cache error: {0}")]
    Cache(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// Only this kind of failure justifies falling back to the local cache.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, ClientError::Unavailable(_))
    }
}
