use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::get};
use chrono::Utc;
use waitlist_types::HealthResponse;

use crate::adapters::http::app_state::AppState;

/// GET /api/health
///
/// 503 when the database does not answer. A failing maintenance lookup is
/// reported as "not in maintenance" so health stays about the database.
async fn health(State(app_state): State<AppState>) -> impl IntoResponse {
    let database_ok = app_state.waitlist_use_cases.database_healthy().await;
    let maintenance = app_state
        .maintenance_use_cases
        .is_enabled()
        .await
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Maintenance flag lookup failed");
            false
        });

    let (status, body) = if database_ok {
        (
            StatusCode::OK,
            HealthResponse {
                status: "healthy".to_string(),
                database: "connected".to_string(),
                maintenance,
                timestamp: Utc::now(),
            },
        )
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            HealthResponse {
                status: "unhealthy".to_string(),
                database: "disconnected".to_string(),
                maintenance,
                timestamp: Utc::now(),
            },
        )
    };

    (status, Json(body))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
