//! REST + WebSocket API service for EdgeWeave.
//!
//! Serves the chart editor: it persists the editor's setup file and runs edge
//! bundling on request, either in one shot or streamed tick by tick.
//!
//! ## Endpoints
//!
//! - `GET /api/health` - Health check with service version
//! - `GET /api/setup-handling` - Saved editor setup, verbatim
//! - `POST /api/setup-handling` - Replace the saved editor setup
//! - `POST /api/bundle` - Bundle a graph and return the final curves
//! - `GET /api/ws` - WebSocket streaming every simulation tick
//!
//! ## Usage
//!
//! ```rust,no_run
//! use edgeweave_api::{create_api_router, create_api_state};
//! use edgeweave_core::BundleConfig;
//!
//! let state = create_api_state("savefile.json", BundleConfig::default());
//! let app = axum::Router::new().nest("/api", create_api_router(state));
//! ```

mod routes;
mod types;
mod ws;

pub use routes::create_api_router;
pub use types::{
    ApiResponse, ApiState, BundleRequest, BundleResponse, ErrorResponse, HealthResponse,
    WsClientMessage, WsServerMessage,
};

use std::path::PathBuf;
use std::sync::Arc;

use edgeweave_core::{BundleConfig, EdgeBundler};

/// Create a new API state persisting to `save_file` and bundling with `config`.
pub fn create_api_state(save_file: impl Into<PathBuf>, config: BundleConfig) -> Arc<ApiState> {
    Arc::new(ApiState {
        save_file: save_file.into(),
        bundler: EdgeBundler::new(config),
    })
}
