use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use service_core::error::AppError;
use validator::Validate;

use crate::dtos::GenerateRequest;
use crate::services::metrics;
use crate::startup::AppState;

/// `POST /api/gemini/generate`
///
/// Composes the location prompt, relays it and returns the answer as plain
/// text. Relay failures come back as their descriptive text with the status
/// chosen by the configured `ErrorStatusPolicy`.
pub async fn generate(
    State(state): State<AppState>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(request) =
        payload.map_err(|rejection| AppError::BadRequest(anyhow::anyhow!(rejection.body_text())))?;

    let query = request.into_query()?;
    query.validate()?;

    let prompt = query.compose_prompt();
    tracing::info!(prompt = %prompt, "Relaying composed prompt");

    let provider = state.relay.provider();
    match state.relay.relay(&prompt).await {
        Ok(answer) => {
            metrics::record_relay_outcome(provider, "answer");
            tracing::info!(answer = %answer, "Relay returned answer");
            Ok((StatusCode::OK, answer).into_response())
        }
        Err(err) => {
            metrics::record_relay_outcome(provider, err.kind());
            tracing::warn!(error = %err, kind = err.kind(), "Relay failed");
            let status = state.config.gemini.error_status.failure_status();
            Ok((status, err.to_string()).into_response())
        }
    }
}
