//! Wire protocol messages
//!
//! Every frame is a UTF-8 JSON object tagged by a `type` field. The
//! protocol is permissive by design: unrecognized message types are
//! ignored rather than rejected, and invalid `set_param` payloads receive
//! no error reply — the originator already holds its own authoritative
//! local state.

use serde::{Deserialize, Serialize};

/// Inbound message from a UI client
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Set one parameter: `{"type":"set_param","effect":..,"param":..,"value":..}`
    SetParam {
        effect: String,
        param: String,
        value: f64,
    },
    /// Liveness probe, answered with [`ServerMessage::Pong`]
    Ping,
    /// Any unrecognized `type` tag; ignored without a reply
    #[serde(other)]
    Unknown,
}

/// Outbound message to a UI client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// A parameter changed; fanned out to everyone except the originator
    ParamUpdate {
        effect: String,
        param: String,
        value: f64,
        source: UpdateSource,
    },
    /// Reply to [`ClientMessage::Ping`]
    Pong,
}

/// Originator class of a parameter update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateSource {
    /// A browser UI client connected to this bridge
    Ui,
}
