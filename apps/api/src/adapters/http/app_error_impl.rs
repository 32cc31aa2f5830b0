use axum::Json;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use waitlist_types::ErrorResponse;

use crate::app_error::AppError;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code = self.code();

        let (status, message): (StatusCode, String) = match &self {
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::DuplicateEmail => (StatusCode::CONFLICT, self.to_string()),
            AppError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "Invalid credentials".into())
            }
            AppError::NotFound => (StatusCode::NOT_FOUND, "Not found".into()),
            // Internal details stay in the logs.
            AppError::Database(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Database error occurred".into(),
            ),
            AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".into(),
            ),
            AppError::Backup(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Backup failed".into()),
        };

        // Log the error before it gets converted into a status response.
        if status.is_server_error() {
            tracing::error!(error = ?self, "Request failed");
        } else {
            tracing::warn!(error = %self, "Request rejected");
        }

        (status, Json(ErrorResponse::new(code, Some(message)))).into_response()
    }
}
