pub mod admin;
pub mod health;
pub mod maintenance;
pub mod waitlist;

use axum::{Router, middleware::from_fn_with_state};

use crate::adapters::http::{app_state::AppState, middleware::require_admin};

/// Everything mounted under `/api`. The admin guard needs the state up front
/// because it is attached per route.
pub fn router(app_state: &AppState) -> Router<AppState> {
    Router::new()
        .merge(waitlist::router(app_state))
        .merge(health::router())
        .merge(maintenance::status_router())
        .nest(
            "/admin",
            admin::router().route_layer(from_fn_with_state(app_state.clone(), require_admin)),
        )
}
