//! Integration tests for the EdgeWeave REST + WebSocket API.
//!
//! Run with: `cargo test --package edgeweave-api --test api_integration`

use std::path::Path;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use edgeweave_api::{create_api_router, create_api_state};
use edgeweave_core::BundleConfig;
use futures_util::{SinkExt, StreamExt};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tempfile::TempDir;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tower::ServiceExt;

/// Create a test router saving into `save_file`, mounted under `/api`.
fn create_test_router(save_file: &Path) -> Router {
    let state = create_api_state(save_file, BundleConfig::default());
    Router::new().nest("/api", create_api_router(state))
}

/// Helper to make a GET request, returning the raw body.
async fn get_raw(router: &Router, uri: &str) -> (StatusCode, Option<String>, Vec<u8>) {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, content_type, body.to_vec())
}

/// Helper to make a GET request.
async fn get(router: &Router, uri: &str) -> (StatusCode, Value) {
    let (status, _, body) = get_raw(router, uri).await;
    (status, serde_json::from_slice(&body).unwrap_or(json!(null)))
}

/// Helper to make a POST request with a raw body.
async fn post_raw(router: &Router, uri: &str, body: &str) -> (StatusCode, Vec<u8>) {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();

    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, body.to_vec())
}

/// Helper to make a POST request with JSON body.
async fn post(router: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let (status, body) = post_raw(router, uri, &body.to_string()).await;
    (status, serde_json::from_slice(&body).unwrap_or(json!(null)))
}

fn fan_graph() -> Value {
    json!({
        "nodes": [
            {"id": "hub", "x": 0, "y": 0},
            {"x": 100, "y": -6},
            {"x": 100, "y": 0},
            {"x": 100, "y": 6}
        ],
        "links": [
            {"source": 0, "target": 1},
            {"source": 0, "target": 2},
            {"source": 0, "target": 3}
        ],
        "diagonal_length": 141
    })
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health() {
    let temp = TempDir::new().unwrap();
    let router = create_test_router(&temp.path().join("savefile.json"));

    let (status, json) = get(&router, "/api/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["status"], "ok");
    assert_eq!(json["data"]["version"], env!("CARGO_PKG_VERSION"));
    assert!(json["timestamp"].as_u64().unwrap() > 0);
}

// =============================================================================
// Setup persistence
// =============================================================================

#[tokio::test]
async fn test_setup_round_trip_is_verbatim() {
    let temp = TempDir::new().unwrap();
    let save_file = temp.path().join("savefile.json");
    let router = create_test_router(&save_file);

    // Whitespace and key order must survive untouched
    let setup = "{ \"charts\": [ {\"title\": \"Chart\"} ],\n  \"zoom\": 1.5 }";
    let (status, body) = post_raw(&router, "/api/setup-handling", setup).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(String::from_utf8(body).unwrap(), "Setup saved successfully!");
    assert_eq!(std::fs::read_to_string(&save_file).unwrap(), setup);

    let (status, content_type, body) = get_raw(&router, "/api/setup-handling").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("application/json"));
    assert_eq!(String::from_utf8(body).unwrap(), setup);
}

#[tokio::test]
async fn test_setup_save_overwrites() {
    let temp = TempDir::new().unwrap();
    let save_file = temp.path().join("savefile.json");
    let router = create_test_router(&save_file);

    post(&router, "/api/setup-handling", json!({"version": 1})).await;
    post(&router, "/api/setup-handling", json!({"version": 2})).await;

    let (status, json) = get(&router, "/api/setup-handling").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({"version": 2}));
}

#[tokio::test]
async fn test_setup_missing_file_is_not_found() {
    let temp = TempDir::new().unwrap();
    let router = create_test_router(&temp.path().join("missing.json"));

    let (status, json) = get(&router, "/api/setup-handling").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["data"]["code"], "SETUP_NOT_FOUND");
}

#[tokio::test]
async fn test_setup_rejects_invalid_json() {
    let temp = TempDir::new().unwrap();
    let save_file = temp.path().join("savefile.json");
    let router = create_test_router(&save_file);

    let (status, body) = post_raw(&router, "/api/setup-handling", "{not json").await;
    let json: Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["data"]["code"], "INVALID_JSON");
    assert!(!save_file.exists());
}

#[tokio::test]
async fn test_setup_write_failure_is_reported() {
    let temp = TempDir::new().unwrap();
    // Parent directory does not exist
    let router = create_test_router(&temp.path().join("no-such-dir").join("savefile.json"));

    let (status, json) = post(&router, "/api/setup-handling", json!({})).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["data"]["code"], "SAVE_ERROR");
}

// =============================================================================
// Bundling
// =============================================================================

#[tokio::test]
async fn test_bundle_returns_one_curve_per_link() {
    let temp = TempDir::new().unwrap();
    let router = create_test_router(&temp.path().join("savefile.json"));

    let (status, json) = post(&router, "/api/bundle", fan_graph()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["ticks"], 31);
    let edges = json["data"]["edges"].as_array().unwrap();
    assert_eq!(edges.len(), 3);
    for (i, edge) in edges.iter().enumerate() {
        assert_eq!(edge["link"], i);
        assert_eq!(edge["source_index"], 0);
        assert_eq!(edge["target_index"], i + 1);
        assert!(edge["path"].as_str().unwrap().starts_with("M0,0"));
    }
}

#[tokio::test]
async fn test_bundle_without_links() {
    let temp = TempDir::new().unwrap();
    let router = create_test_router(&temp.path().join("savefile.json"));

    let body = json!({"nodes": [{"x": 1, "y": 1}], "diagonal_length": 10});
    let (status, json) = post(&router, "/api/bundle", body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["ticks"], 0);
    assert_eq!(json["data"]["edges"], json!([]));
}

#[tokio::test]
async fn test_bundle_honours_request_config() {
    let temp = TempDir::new().unwrap();
    let router = create_test_router(&temp.path().join("savefile.json"));

    let mut body = fan_graph();
    body["config"] = json!({"alpha_decay": 0.5});
    let (status, json) = post(&router, "/api/bundle", body).await;

    assert_eq!(status, StatusCode::OK);
    // 0.5^10 < 0.001 < 0.5^9
    assert_eq!(json["data"]["ticks"], 10);
}

#[tokio::test]
async fn test_bundle_rejects_dangling_link() {
    let temp = TempDir::new().unwrap();
    let router = create_test_router(&temp.path().join("savefile.json"));

    let mut body = fan_graph();
    body["links"] = json!([{"source": 0, "target": 7}]);
    let (status, json) = post(&router, "/api/bundle", body).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["data"]["code"], "BUNDLE_ERROR");
}

#[tokio::test]
async fn test_bundle_rejects_unbounded_config() {
    let temp = TempDir::new().unwrap();
    let router = create_test_router(&temp.path().join("savefile.json"));

    let configs = [
        json!({"max_tree_depth": 1_000_000}),
        json!({"max_segments": u64::MAX}),
        json!({"link_iterations": 1_000_000}),
    ];
    for config in configs {
        // Parallel links put coincident control points in one quadtree cell
        let body = json!({
            "nodes": [{"x": 0, "y": 0}, {"x": 100, "y": 0}],
            "links": [{"source": 0, "target": 1}, {"source": 0, "target": 1}],
            "diagonal_length": 100,
            "config": config
        });
        let (status, json) = post(&router, "/api/bundle", body).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "config {config}");
        assert_eq!(json["data"]["code"], "BUNDLE_ERROR");
    }
}

#[tokio::test]
async fn test_bundle_rejects_zero_diagonal() {
    let temp = TempDir::new().unwrap();
    let router = create_test_router(&temp.path().join("savefile.json"));

    let mut body = fan_graph();
    body["diagonal_length"] = json!(0);
    let (status, json) = post(&router, "/api/bundle", body).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["data"]["code"], "BUNDLE_ERROR");
}

// =============================================================================
// WebSocket
// =============================================================================

#[tokio::test]
async fn test_ws_streams_ticks_then_complete() {
    let temp = TempDir::new().unwrap();
    let router = create_test_router(&temp.path().join("savefile.json"));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    let (mut ws, _) = connect_async(format!("ws://{addr}/api/ws")).await.unwrap();

    ws.send(Message::text(r#"{"type":"ping"}"#)).await.unwrap();
    let pong: Value = next_json(&mut ws).await;
    assert_eq!(pong["type"], "pong");

    let mut request = fan_graph();
    request["type"] = json!("bundle");
    ws.send(Message::text(request.to_string())).await.unwrap();

    let mut ticks = 0;
    loop {
        let msg = next_json(&mut ws).await;
        match msg["type"].as_str().unwrap() {
            "tick" => {
                ticks += 1;
                assert_eq!(msg["tick"], ticks);
                assert_eq!(msg["edges"].as_array().unwrap().len(), 3);
            }
            "complete" => {
                assert_eq!(msg["ticks"], 31);
                assert_eq!(msg["edges"].as_array().unwrap().len(), 3);
                break;
            }
            other => panic!("unexpected message type {other}"),
        }
    }
    assert_eq!(ticks, 31);

    // Invalid input is answered on the socket
    let mut bad = fan_graph();
    bad["type"] = json!("bundle");
    bad["diagonal_length"] = json!(-1);
    ws.send(Message::text(bad.to_string())).await.unwrap();
    let error = next_json(&mut ws).await;
    assert_eq!(error["type"], "error");
    assert_eq!(error["code"], "BUNDLE_ERROR");
}

async fn next_json<S>(ws: &mut S) -> Value
where
    S: StreamExt<Item = Result<Message, tokio_tungstenite::tungstenite::Error>> + Unpin,
{
    loop {
        let msg = ws.next().await.unwrap().unwrap();
        if let Message::Text(text) = msg {
            return serde_json::from_str(text.as_str()).unwrap();
        }
    }
}
