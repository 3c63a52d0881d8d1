//! Health check endpoint.

use axum::Json;

use crate::types::{ApiResponse, HealthResponse};

/// Handler for GET /api/health
pub async fn health_handler() -> Json<ApiResponse<HealthResponse>> {
    Json(ApiResponse::new(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }))
}
