//! WebSocket handler streaming bundling runs tick by tick.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
};
use edgeweave_core::BundleEvent;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, error, info, warn};

use crate::types::{ApiState, WsClientMessage, WsServerMessage};

/// Handler for WebSocket upgrade at GET /api/ws
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<ApiState>>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// What woke the connection loop.
enum Next {
    Client(Option<Result<Message, axum::Error>>),
    Event(Option<BundleEvent>),
}

/// Handle an individual WebSocket connection.
async fn handle_socket(mut socket: WebSocket, state: Arc<ApiState>) {
    debug!("WebSocket client connected");

    // The run currently streaming to this client, if any
    let mut run: Option<UnboundedReceiver<BundleEvent>> = None;

    loop {
        let next = tokio::select! {
            msg = socket.recv() => Next::Client(msg),
            event = next_event(&mut run) => Next::Event(event),
        };

        match next {
            Next::Client(Some(Ok(Message::Text(text)))) => {
                match handle_client_message(&text, &state, &mut socket).await {
                    Ok(Some(rx)) => run = Some(rx),
                    Ok(None) => {}
                    Err(e) => warn!("Error handling client message: {}", e),
                }
            }
            Next::Client(Some(Ok(Message::Close(_)))) => {
                debug!("WebSocket client disconnected");
                break;
            }
            Next::Client(Some(Ok(_))) => {
                // Ignore binary, ping, pong frames
            }
            Next::Client(Some(Err(e))) => {
                error!("WebSocket error: {}", e);
                break;
            }
            Next::Client(None) => {
                debug!("WebSocket stream ended");
                break;
            }
            Next::Event(Some(event)) => {
                if let Err(e) = send_server_message(&mut socket, &event.into()).await {
                    error!("Failed to send WebSocket message: {}", e);
                    break;
                }
            }
            Next::Event(None) => run = None,
        }
    }
}

/// Next event of the active run; pends forever when there is none.
async fn next_event(run: &mut Option<UnboundedReceiver<BundleEvent>>) -> Option<BundleEvent> {
    match run {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}

/// Handle a message from the client, returning a newly started run.
async fn handle_client_message(
    text: &str,
    state: &ApiState,
    socket: &mut WebSocket,
) -> Result<Option<UnboundedReceiver<BundleEvent>>, Box<dyn std::error::Error + Send + Sync>> {
    let msg: WsClientMessage = match serde_json::from_str(text) {
        Ok(msg) => msg,
        Err(e) => {
            let reply = error_message("INVALID_MESSAGE", e.to_string());
            send_server_message(socket, &reply).await?;
            return Ok(None);
        }
    };

    match msg {
        WsClientMessage::Ping => {
            send_server_message(socket, &WsServerMessage::Pong).await?;
            Ok(None)
        }
        WsClientMessage::Bundle(request) => {
            info!(
                nodes = request.graph.nodes.len(),
                links = request.graph.links.len(),
                "Streaming bundle request"
            );
            match state.bundler_for(request.config).stream(&request.graph) {
                Ok(rx) => Ok(Some(rx)),
                Err(e) => {
                    send_server_message(socket, &error_message("BUNDLE_ERROR", e.to_string()))
                        .await?;
                    Ok(None)
                }
            }
        }
    }
}

fn error_message(code: &str, message: String) -> WsServerMessage {
    WsServerMessage::Error {
        code: code.to_string(),
        message,
    }
}

/// Send a server message to the client.
async fn send_server_message(
    socket: &mut WebSocket,
    msg: &WsServerMessage,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let json = serde_json::to_string(msg)?;
    socket.send(Message::Text(json.into())).await?;
    Ok(())
}
