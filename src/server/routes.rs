//! HTTP routes and shared handler state
//!
//! Three routes: a static landing page at `/`, a liveness endpoint at
//! `/health`, and the WebSocket upgrade at `/ws`.

use std::sync::Arc;

use axum::extract::ws::WebSocketUpgrade;
use axum::extract::State;
use axum::response::{Html, IntoResponse};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::hub::BroadcastHub;
use crate::registry::ConnectionRegistry;
use crate::store::StateStore;

use super::connection;

/// Shared state passed to route handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<StateStore>,
    pub registry: Arc<ConnectionRegistry>,
    pub hub: Arc<BroadcastHub>,
}

impl AppState {
    /// Assemble handler state from the shared components
    pub fn new(
        store: Arc<StateStore>,
        registry: Arc<ConnectionRegistry>,
        hub: Arc<BroadcastHub>,
    ) -> Self {
        Self {
            store,
            registry,
            hub,
        }
    }
}

/// Build the router with all bridge routes
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/ws", get(ws_handler))
        .with_state(state)
}

/// Liveness payload for `/health`
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always `"ok"` while the process serves requests
    pub status: &'static str,
    /// Number of currently registered WebSocket connections
    pub connections: usize,
    /// `"connected"` when the ExtState file is writable
    pub reaper: &'static str,
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html>
<head><title>REAPER Bridge</title></head>
<body style="font-family: sans-serif; max-width: 800px; margin: 50px auto; background: #1a1a1a; color: #fff; padding: 20px;">
    <h1>REAPER Bridge</h1>
    <p><strong>Status:</strong> <span style="color: #4ade80;">Running</span></p>
    <p><strong>WebSocket:</strong> <code>ws://localhost:8765/ws</code></p>
    <h2>Quick Start</h2>
    <ol>
        <li>Start the web UI</li>
        <li>Add the bridge JSFX in REAPER</li>
        <li>Control parameters from the browser</li>
    </ol>
</body>
</html>
"#;

async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let connections = state.registry.count().await;
    let reaper = if state.store.connected().await {
        "connected"
    } else {
        "disconnected"
    };

    Json(HealthResponse {
        status: "ok",
        connections,
        reaper,
    })
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| connection::handle_socket(socket, state))
}
