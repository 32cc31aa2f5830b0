use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use secrecy::ExposeSecret;

use crate::{adapters::http::app_state::AppState, app_error::AppError};

/// Require `Authorization: Bearer <ADMIN_TOKEN>` when a token is configured.
pub async fn require_admin(
    State(app_state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if let Some(expected) = app_state.config.admin_token.as_ref() {
        let authorized = bearer_token(&request)
            .is_some_and(|token| constant_time_compare(token, expected.expose_secret()));

        if !authorized {
            tracing::warn!(
                method = %request.method(),
                uri = %request.uri(),
                "Rejected admin request"
            );
            return Err(AppError::InvalidCredentials);
        }
    }

    Ok(next.run(request).await)
}

fn bearer_token(req: &Request) -> Option<&str> {
    let value = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut result = 0u8;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }
    result == 0
}
