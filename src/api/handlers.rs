//! HTTP request handlers

use super::types::{ErrorResponse, HealthResponse, VersionResponse};
use super::AppState;
use crate::skill::{RequestEnvelope, ResponseEnvelope};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Voice-platform webhook
        .route("/skill", post(handle_skill))
        .route("/health", get(health))
        .route("/version", get(get_version))
        .with_state(state)
}

// ============================================================
// Skill webhook
// ============================================================

async fn handle_skill(
    State(state): State<AppState>,
    payload: Result<Json<RequestEnvelope>, JsonRejection>,
) -> Result<Json<ResponseEnvelope>, AppError> {
    let Json(envelope) = payload.map_err(|rejection| {
        tracing::warn!(error = %rejection.body_text(), "Rejected skill request");
        AppError::BadRequest(rejection.body_text())
    })?;

    Ok(Json(state.skill.handle_envelope(envelope).await))
}

// ============================================================
// Service info
// ============================================================

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let config = state.skill.config();
    Json(HealthResponse {
        ok: true,
        skill_name: config.skill_name.clone(),
        devices: config.devices.len(),
    })
}

async fn get_version() -> Json<VersionResponse> {
    Json(VersionResponse {
        version: env!("CARGO_PKG_VERSION"),
    })
}

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug)]
enum AppError {
    BadRequest(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}
