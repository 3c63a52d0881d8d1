//! API types and DTOs.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use edgeweave_core::{BundleConfig, BundleEvent, BundledEdge, EdgeBundler, GraphInput};

/// Shared application state for the API.
pub struct ApiState {
    /// File the editor setup is persisted to.
    pub save_file: PathBuf,
    /// Bundler used when a request carries no configuration of its own.
    pub bundler: EdgeBundler,
}

impl ApiState {
    /// The bundler for a request, honouring a per-request configuration.
    pub fn bundler_for(&self, config: Option<BundleConfig>) -> EdgeBundler {
        match config {
            Some(config) => EdgeBundler::new(config),
            None => self.bundler.clone(),
        }
    }
}

/// Response wrapper with timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Response data.
    pub data: T,
    /// Unix timestamp in milliseconds.
    pub timestamp: u64,
}

impl<T> ApiResponse<T> {
    /// Create a new API response with current timestamp.
    pub fn new(data: T) -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        Self { data, timestamp }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Crate version of the service.
    pub version: String,
}

/// Error payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code.
    pub code: String,
    /// Error message.
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
        }
    }
}

/// A graph to bundle, optionally with its own configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BundleRequest {
    #[serde(flatten)]
    pub graph: GraphInput,
    #[serde(default)]
    pub config: Option<BundleConfig>,
}

/// Result of a one-shot bundling run.
#[derive(Debug, Clone, Serialize)]
pub struct BundleResponse {
    /// One curve per input link, in input order.
    pub edges: Vec<BundledEdge>,
    /// Simulation ticks run.
    pub ticks: u32,
}

/// WebSocket message sent from server to client.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WsServerMessage {
    /// Curves after one simulation tick.
    Tick {
        tick: u32,
        alpha: f64,
        edges: Vec<BundledEdge>,
    },
    /// The run finished.
    Complete {
        ticks: u32,
        edges: Vec<BundledEdge>,
    },
    /// Error occurred.
    Error {
        /// Error code.
        code: String,
        /// Error message.
        message: String,
    },
    /// Pong response to client ping.
    Pong,
}

impl From<BundleEvent> for WsServerMessage {
    fn from(event: BundleEvent) -> Self {
        match event {
            BundleEvent::Tick { tick, alpha, edges } => Self::Tick { tick, alpha, edges },
            BundleEvent::Complete { ticks, edges } => Self::Complete { ticks, edges },
        }
    }
}

/// WebSocket message sent from client to server.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WsClientMessage {
    /// Start a bundling run; replaces any run still streaming.
    Bundle(BundleRequest),
    /// Ping to keep connection alive.
    Ping,
}
