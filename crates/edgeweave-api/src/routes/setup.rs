//! Editor setup persistence.
//!
//! The editor saves its whole state as one JSON document. It is stored
//! byte for byte, so whatever the editor wrote is what it reads back.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use tracing::{error, info, warn};

use crate::types::{ApiResponse, ApiState, ErrorResponse};

/// GET /api/setup-handling - Return the saved setup.
pub async fn load_handler(State(state): State<Arc<ApiState>>) -> impl IntoResponse {
    match tokio::fs::read(&state.save_file).await {
        Ok(contents) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            contents,
        )
            .into_response(),
        Err(e) => {
            warn!(path = %state.save_file.display(), "Failed to read setup: {}", e);
            (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::new(ErrorResponse::new(
                    "SETUP_NOT_FOUND",
                    format!("No saved setup: {}", e),
                ))),
            )
                .into_response()
        }
    }
}

/// POST /api/setup-handling - Replace the saved setup.
pub async fn save_handler(State(state): State<Arc<ApiState>>, body: Bytes) -> impl IntoResponse {
    if let Err(e) = serde_json::from_slice::<serde_json::Value>(&body) {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::new(ErrorResponse::new(
                "INVALID_JSON",
                e.to_string(),
            ))),
        )
            .into_response();
    }

    match tokio::fs::write(&state.save_file, &body).await {
        Ok(()) => {
            info!(path = %state.save_file.display(), bytes = body.len(), "Setup saved");
            (StatusCode::OK, "Setup saved successfully!").into_response()
        }
        Err(e) => {
            error!(path = %state.save_file.display(), "Failed to save setup: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::new(ErrorResponse::new(
                    "SAVE_ERROR",
                    e.to_string(),
                ))),
            )
                .into_response()
        }
    }
}
