//! One-shot bundling endpoint.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use edgeweave_core::BundleEvent;
use tracing::{info, warn};

use crate::types::{ApiResponse, ApiState, BundleRequest, BundleResponse, ErrorResponse};

/// POST /api/bundle - Bundle a graph and return the final curves.
pub async fn bundle_handler(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<BundleRequest>,
) -> impl IntoResponse {
    info!(
        nodes = request.graph.nodes.len(),
        links = request.graph.links.len(),
        "Bundle request"
    );

    let bundler = state.bundler_for(request.config);
    let mut ticks = 0;
    let result = bundler
        .bundle_with(&request.graph, |event| {
            if let BundleEvent::Complete { ticks: total, .. } = event {
                ticks = *total;
            }
        })
        .await;

    match result {
        Ok(edges) => (
            StatusCode::OK,
            Json(ApiResponse::new(BundleResponse { edges, ticks })),
        )
            .into_response(),
        Err(e) => {
            warn!("Bundle request rejected: {}", e);
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ApiResponse::new(ErrorResponse::new(
                    "BUNDLE_ERROR",
                    e.to_string(),
                ))),
            )
                .into_response()
        }
    }
}
