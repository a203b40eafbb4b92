//! Broadcast hub: persist first, then fan out
//!
//! The hub is the single path a parameter change takes through the bridge.
//! It validates the event, writes it durably through the [`StateStore`],
//! and only on a successful write notifies every other registered
//! connection. Persisting before broadcasting gives read-your-writes
//! consistency across the bridge boundary: a client that connects or a
//! poller that reads right after the notification observes the durable
//! value.

use std::sync::Arc;

use crate::protocol::{ServerMessage, UpdateSource};
use crate::registry::ConnectionRegistry;
use crate::store::StateStore;

/// A validated-pending parameter change from one connection
///
/// Ephemeral: consumed once by the hub, never persisted itself — only its
/// effect on the store is durable.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeEvent {
    /// Scope the parameter belongs to (an effect unit)
    pub effect: String,
    /// Parameter name, unique within the effect
    pub param: String,
    /// New value
    pub value: f64,
    /// Connection ID of the originator, excluded from fan-out
    pub origin: u64,
}

impl ChangeEvent {
    /// Whether the event may be applied
    ///
    /// Requires non-empty `effect` and `param` and a finite value — NaN or
    /// infinity would poison the text store.
    pub fn is_valid(&self) -> bool {
        !self.effect.is_empty() && !self.param.is_empty() && self.value.is_finite()
    }
}

/// Routes parameter changes to the store and out to peers
pub struct BroadcastHub {
    store: Arc<StateStore>,
    registry: Arc<ConnectionRegistry>,
}

impl BroadcastHub {
    /// Create a hub over the shared store and registry
    pub fn new(store: Arc<StateStore>, registry: Arc<ConnectionRegistry>) -> Self {
        Self { store, registry }
    }

    /// Get the shared state store
    pub fn store(&self) -> &Arc<StateStore> {
        &self.store
    }

    /// Get the shared connection registry
    pub fn registry(&self) -> &Arc<ConnectionRegistry> {
        &self.registry
    }

    /// Apply a change durably and notify all other connections
    ///
    /// Returns whether the persist step succeeded. Invalid events and
    /// failed writes are logged and produce no broadcast; per-peer
    /// delivery failures never roll back the persisted value.
    pub async fn apply_and_broadcast(&self, event: ChangeEvent) -> bool {
        if !event.is_valid() {
            tracing::warn!(
                effect = %event.effect,
                param = %event.param,
                value = event.value,
                "Rejecting invalid parameter change"
            );
            return false;
        }

        if !self.store.set(&event.effect, &event.param, event.value).await {
            tracing::error!(
                effect = %event.effect,
                param = %event.param,
                "Parameter change not persisted, skipping broadcast"
            );
            return false;
        }

        let update = ServerMessage::ParamUpdate {
            effect: event.effect.clone(),
            param: event.param.clone(),
            value: event.value,
            source: UpdateSource::Ui,
        };

        match serde_json::to_string(&update) {
            Ok(payload) => {
                let delivered = self.registry.broadcast_except(event.origin, &payload).await;
                tracing::info!(
                    effect = %event.effect,
                    param = %event.param,
                    value = event.value,
                    delivered,
                    "Parameter set"
                );
            }
            Err(e) => {
                // The value is already durable; peers will see it on their next read
                tracing::error!(error = %e, "Failed to encode param_update");
            }
        }

        true
    }
}
