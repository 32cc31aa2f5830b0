//! Maintenance flag endpoints.
//!
//! The toggles live at operator-chosen paths outside `/api` and carry no
//! authentication of their own.

use axum::{Json, Router, extract::State, response::IntoResponse, routing::get, routing::post};
use waitlist_types::{MaintenanceStatus, MaintenanceToggleResponse};

use crate::{
    adapters::http::app_state::AppState, app_error::AppResult, infra::config::AppConfig,
};

/// GET /api/maintenance-status
async fn status(State(app_state): State<AppState>) -> AppResult<impl IntoResponse> {
    let maintenance_mode = app_state.maintenance_use_cases.is_enabled().await?;
    Ok(Json(MaintenanceStatus { maintenance_mode }))
}

async fn enable(State(app_state): State<AppState>) -> AppResult<impl IntoResponse> {
    toggle(&app_state, true).await
}

async fn disable(State(app_state): State<AppState>) -> AppResult<impl IntoResponse> {
    toggle(&app_state, false).await
}

async fn toggle(app_state: &AppState, enabled: bool) -> AppResult<Json<MaintenanceToggleResponse>> {
    let maintenance_mode = app_state.maintenance_use_cases.set_enabled(enabled).await?;
    let message = if maintenance_mode {
        "Maintenance mode enabled"
    } else {
        "Maintenance mode disabled"
    };

    Ok(Json(MaintenanceToggleResponse {
        success: true,
        message: message.to_string(),
        maintenance_mode,
    }))
}

pub fn status_router() -> Router<AppState> {
    Router::new().route("/maintenance-status", get(status))
}

/// POST `<MAINTENANCE_ENABLE_PATH>` and POST `<MAINTENANCE_DISABLE_PATH>`.
pub fn toggle_router(config: &AppConfig) -> Router<AppState> {
    Router::new()
        .route(&config.maintenance_enable_path, post(enable))
        .route(&config.maintenance_disable_path, post(disable))
}
