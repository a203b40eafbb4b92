//! Per-connection protocol loop
//!
//! One task per connection. The receive on the socket is the loop's only
//! suspension point; outbound traffic goes through the registry's bounded
//! queue, drained by a separate writer task, so a broadcast never waits on
//! this connection's socket.

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};

use crate::hub::ChangeEvent;
use crate::protocol::{ClientMessage, ServerMessage};

use super::routes::AppState;

/// Connection lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionPhase {
    /// Socket upgraded, not yet registered
    Connecting,
    /// Registered with the connection registry, serving messages
    Open,
    /// Deregistered; the connection receives no further broadcasts
    Closed,
}

/// Per-connection lifecycle tracking
#[derive(Debug)]
pub struct ConnectionState {
    /// Current phase
    pub phase: ConnectionPhase,

    /// Registry-assigned ID, set on open
    pub id: Option<u64>,
}

impl ConnectionState {
    /// Create state for a freshly upgraded socket
    pub fn new() -> Self {
        Self {
            phase: ConnectionPhase::Connecting,
            id: None,
        }
    }

    /// Mark the connection registered
    pub fn open(&mut self, id: u64) {
        if self.phase == ConnectionPhase::Connecting {
            self.phase = ConnectionPhase::Open;
            self.id = Some(id);
        }
    }

    /// Mark the connection closed
    pub fn close(&mut self) {
        self.phase = ConnectionPhase::Closed;
    }

    /// Check if the connection is serving messages
    pub fn is_open(&self) -> bool {
        self.phase == ConnectionPhase::Open
    }
}

impl Default for ConnectionState {
    fn default() -> Self {
        Self::new()
    }
}

/// Serve one WebSocket connection until it closes
///
/// Registers with the connection registry on entry and deregisters on any
/// exit path — transport close, receive error, or a malformed frame. All
/// failures stay local to this connection.
pub(super) async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut sender, mut receiver) = socket.split();

    let mut conn = ConnectionState::new();
    let (id, mut rx) = state.registry.register().await;
    conn.open(id);
    let total = state.registry.count().await;
    tracing::info!(connection_id = id, total, "Client connected");

    // Writer task: drains the fan-out queue onto the socket
    let writer = tokio::spawn(async move {
        while let Some(payload) = rx.recv().await {
            if sender.send(Message::Text(payload.into())).await.is_err() {
                break;
            }
        }
    });

    while conn.is_open() {
        let msg = match receiver.next().await {
            Some(Ok(msg)) => msg,
            Some(Err(e)) => {
                tracing::debug!(connection_id = id, error = %e, "Receive error");
                break;
            }
            None => break,
        };

        match msg {
            Message::Text(text) => {
                if !dispatch(&state, id, text.as_str()).await {
                    break;
                }
            }
            Message::Close(_) => break,
            // Transport ping/pong is answered by the WebSocket layer;
            // binary frames are not part of the protocol
            _ => {}
        }
    }

    conn.close();
    state.registry.remove(id).await;
    writer.abort();
    let total = state.registry.count().await;
    tracing::info!(connection_id = id, total, "Client disconnected");
}

/// Dispatch one decoded frame; returns whether the connection stays open
async fn dispatch(state: &AppState, id: u64, text: &str) -> bool {
    let msg = match serde_json::from_str::<ClientMessage>(text) {
        Ok(msg) => msg,
        Err(e) => {
            // Malformed frame: fail this connection, leave the others alone
            tracing::warn!(connection_id = id, error = %e, "Malformed message, closing connection");
            return false;
        }
    };

    match msg {
        ClientMessage::SetParam {
            effect,
            param,
            value,
        } => {
            // No reply to the originator; the broadcast is the only signal
            state
                .hub
                .apply_and_broadcast(ChangeEvent {
                    effect,
                    param,
                    value,
                    origin: id,
                })
                .await;
        }
        ClientMessage::Ping => {
            if let Ok(payload) = serde_json::to_string(&ServerMessage::Pong) {
                state.registry.send_to(id, payload).await;
            }
        }
        ClientMessage::Unknown => {
            tracing::debug!(connection_id = id, "Ignoring unrecognized message type");
        }
    }

    true
}
