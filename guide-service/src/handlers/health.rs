use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::startup::AppState;

/// Liveness plus relay configuration status.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    match state.relay.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "service": state.config.service_name,
                "version": env!("CARGO_PKG_VERSION"),
                "provider": state.relay.provider(),
            })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "unhealthy",
                "service": state.config.service_name,
                "provider": state.relay.provider(),
                "error": e.to_string(),
            })),
        ),
    }
}

/// Readiness probe; no body.
pub async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    match state.relay.health_check().await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}
