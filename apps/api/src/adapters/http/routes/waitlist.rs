//! Public signup and the guarded clear-all endpoint.

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    middleware::from_fn_with_state,
    response::IntoResponse,
    routing::{delete, post},
};
use waitlist_types::{ClearResponse, SubmitResponse, WaitlistSubmission};

use crate::{
    adapters::http::{app_state::AppState, middleware::require_admin},
    app_error::{AppError, AppResult},
};

/// POST /api/waitlist
async fn submit(
    State(app_state): State<AppState>,
    payload: Result<Json<WaitlistSubmission>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(submission) = payload.map_err(|e| AppError::InvalidInput(e.body_text()))?;

    let id = app_state.waitlist_use_cases.submit(submission).await?;

    Ok((
        StatusCode::CREATED,
        Json(SubmitResponse {
            success: true,
            message: "Successfully added to waitlist!".to_string(),
            id,
        }),
    ))
}

/// DELETE /api/waitlist
async fn clear_all(State(app_state): State<AppState>) -> AppResult<impl IntoResponse> {
    let cleared_count = app_state.waitlist_use_cases.clear_all().await?;

    Ok(Json(ClearResponse {
        success: true,
        message: format!("Successfully cleared {cleared_count} entries"),
        cleared_count,
    }))
}

pub fn router(app_state: &AppState) -> Router<AppState> {
    Router::new().route(
        "/waitlist",
        post(submit).merge(
            delete(clear_all)
                .route_layer(from_fn_with_state(app_state.clone(), require_admin)),
        ),
    )
}
