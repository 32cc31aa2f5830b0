//! Admin endpoints, mounted under `/api/admin` behind `require_admin`.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    routing::{delete, get, post},
};
use chrono::Utc;
use waitlist_types::{
    BackupResponse, CountResponse, EntriesResponse, MessageResponse, StatsResponse,
};

use crate::{
    adapters::http::app_state::AppState,
    app_error::{AppError, AppResult},
    domain::entities::backup::BackupTrigger,
};

/// GET /api/admin/waitlist
async fn list_entries(State(app_state): State<AppState>) -> AppResult<impl IntoResponse> {
    let data = app_state.waitlist_use_cases.list().await?;
    Ok(Json(EntriesResponse {
        success: true,
        total: data.len(),
        data,
    }))
}

/// GET /api/admin/waitlist/count
async fn count_entries(State(app_state): State<AppState>) -> AppResult<impl IntoResponse> {
    let count = app_state.waitlist_use_cases.count().await?;
    Ok(Json(CountResponse {
        success: true,
        count,
    }))
}

/// GET /api/admin/stats
async fn stats(State(app_state): State<AppState>) -> AppResult<impl IntoResponse> {
    let stats = app_state.waitlist_use_cases.stats().await?;
    Ok(Json(StatsResponse {
        success: true,
        stats,
    }))
}

/// GET /api/admin/waitlist/export, GET /api/admin/export
async fn export_csv(State(app_state): State<AppState>) -> AppResult<impl IntoResponse> {
    let csv = app_state.waitlist_use_cases.export_csv().await?;
    let disposition = format!(
        "attachment; filename=\"waitlist-{}.csv\"",
        Utc::now().format("%Y-%m-%d")
    );

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    ))
}

/// DELETE /api/admin/waitlist/{id}
async fn delete_entry(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let id: i64 = id
        .parse()
        .map_err(|_| AppError::InvalidInput("Entry id must be a number".into()))?;

    app_state.waitlist_use_cases.delete(id).await?;

    Ok(Json(MessageResponse {
        success: true,
        message: "Entry deleted successfully".to_string(),
    }))
}

/// POST /api/admin/backup
async fn trigger_backup(State(app_state): State<AppState>) -> AppResult<impl IntoResponse> {
    let report = app_state
        .backup_use_cases
        .run(BackupTrigger::Manual)
        .await?;

    Ok(Json(BackupResponse {
        success: true,
        message: "Backup created successfully".to_string(),
        file: report.file,
        pruned: report.pruned,
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/waitlist", get(list_entries))
        .route("/waitlist/count", get(count_entries))
        .route("/waitlist/export", get(export_csv))
        .route("/waitlist/{id}", delete(delete_entry))
        .route("/export", get(export_csv))
        .route("/stats", get(stats))
        .route("/backup", post(trigger_backup))
}
