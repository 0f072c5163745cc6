//! Web endpoints for Moodring.
//!
//! `/stream` is the frame-streaming WebSocket; the rest are read-only status
//! endpoints for operational visibility.

use crate::dispatch::DetectionDispatcher;
use crate::sessions::SessionRegistry;
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use futures::stream::SplitSink;
use futures::{SinkExt, StreamExt};
use moodproto::{ClientMessage, Emotion, ServerMessage};
use std::sync::Arc;
use std::time::Instant;

/// Shared state for web handlers
#[derive(Clone)]
pub struct WebState {
    pub registry: Arc<SessionRegistry>,
    pub dispatcher: Arc<DetectionDispatcher>,
}

pub fn router(state: WebState) -> Router {
    Router::new()
        .route("/", get(serve_root))
        .route("/stream", get(stream_ws))
        .route("/api/health", get(health))
        .route("/api/stats", get(stats))
        .route("/api/moods", get(moods))
        .with_state(state)
}

/// Serve root discovery endpoint
async fn serve_root() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "running",
        "service": "Moodring",
        "version": env!("CARGO_PKG_VERSION"),
        "links": {
            "stream": "/stream",
            "health": "/api/health",
            "stats": "/api/stats",
            "moods": "/api/moods",
        }
    }))
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "message": "Moodring is running"
    }))
}

/// Server statistics: detection counter, active model, registry size.
#[tracing::instrument(name = "http.stats", skip(state))]
async fn stats(State(state): State<WebState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "total_detections": state.dispatcher.total_detections(),
        "model_type": state.dispatcher.model_type(),
        "active_sessions": state.registry.len(),
    }))
}

/// The closed set of detectable moods.
async fn moods() -> impl IntoResponse {
    Json(serde_json::json!({
        "moods": Emotion::ALL.iter().map(|e| e.as_str()).collect::<Vec<_>>(),
    }))
}

/// WebSocket handler for the frame stream
async fn stream_ws(State(state): State<WebState>, ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_stream(socket, state))
}

/// One session's loop: register, handshake, then process inbound units until
/// the peer goes away.
///
/// Processing is strictly serialized: the loop suspends only awaiting the
/// next inbound unit and awaiting the detector inside `process`. Frames
/// arriving mid-inference are held at the transport layer. Teardown is
/// immediate; a detection in flight when the connection drops is abandoned
/// along with the loop.
async fn handle_stream(socket: WebSocket, state: WebState) {
    let (mut sender, mut receiver) = socket.split();

    let session_id = state.registry.connect();

    let hello = ServerMessage::Connected {
        client_id: session_id.to_string(),
        message: "WebSocket connection established".to_string(),
    };
    if send_message(&mut sender, &hello).await.is_err() {
        state.registry.disconnect(&session_id);
        return;
    }
    state.registry.open(&session_id);

    'session: while let Some(Ok(message)) = receiver.next().await {
        match message {
            Message::Binary(payload) => {
                let replies = state
                    .dispatcher
                    .process(&state.registry, &session_id, &payload, Instant::now())
                    .await;
                for reply in replies {
                    if send_message(&mut sender, &reply).await.is_err() {
                        break 'session;
                    }
                }
            }
            Message::Text(text) => {
                // Only ping is recognized; anything else is silently ignored.
                if let Ok(ClientMessage::Ping) = serde_json::from_str::<ClientMessage>(&text) {
                    if send_message(&mut sender, &ServerMessage::Pong).await.is_err() {
                        break 'session;
                    }
                }
            }
            Message::Close(_) => break 'session,
            Message::Ping(_) | Message::Pong(_) => {}
        }
    }

    state.registry.disconnect(&session_id);
    tracing::debug!(session = %session_id, "session loop finished");
}

async fn send_message(
    sender: &mut SplitSink<WebSocket, Message>,
    message: &ServerMessage,
) -> Result<(), axum::Error> {
    let text = serde_json::to_string(message).map_err(axum::Error::new)?;
    sender.send(Message::Text(text.into())).await
}
