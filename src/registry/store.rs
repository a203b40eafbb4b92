//! Connection registry implementation
//!
//! Tracks the live set of connected clients and fans payloads out to all
//! of them except an event's originator.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::{mpsc, RwLock};

use super::entry::ConnectionHandle;

/// Registry of connected clients
///
/// Thread-safe via `RwLock`. Fan-out takes a snapshot of the member set
/// under a brief read lock and sends after releasing it, so membership
/// changes never observe a torn set and a slow send never blocks
/// add/remove.
pub struct ConnectionRegistry {
    /// Map of connection ID to handle
    connections: RwLock<HashMap<u64, ConnectionHandle>>,

    /// Next connection ID to allocate
    next_id: AtomicU64,

    /// Capacity of each connection's outbound queue
    send_queue_capacity: usize,
}

impl ConnectionRegistry {
    /// Create a registry whose per-connection send queues hold `capacity`
    /// payloads
    pub fn new(capacity: usize) -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            send_queue_capacity: capacity.max(1),
        }
    }

    /// Register a new connection
    ///
    /// Returns the assigned connection ID and the receiving end of its
    /// outbound queue, to be drained by the connection's writer task.
    pub async fn register(&self) -> (u64, mpsc::Receiver<String>) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::channel(self.send_queue_capacity);

        let mut connections = self.connections.write().await;
        connections.insert(id, ConnectionHandle::new(id, tx));
        tracing::debug!(connection_id = id, total = connections.len(), "Connection registered");

        (id, rx)
    }

    /// Remove a connection
    ///
    /// Dropping the handle closes the outbound queue, which ends the
    /// connection's writer task. Removing an unknown ID is a no-op.
    pub async fn remove(&self, id: u64) {
        let mut connections = self.connections.write().await;
        if connections.remove(&id).is_some() {
            tracing::debug!(connection_id = id, total = connections.len(), "Connection removed");
        }
    }

    /// Queue a payload for one connection
    pub async fn send_to(&self, id: u64, payload: String) -> bool {
        let connections = self.connections.read().await;
        match connections.get(&id) {
            Some(handle) => handle.try_send(payload),
            None => false,
        }
    }

    /// Fan a payload out to every connection except `origin`
    ///
    /// Per-connection queue failures are logged and skipped; delivery to
    /// the remaining members continues. Returns the number of connections
    /// the payload was queued for.
    pub async fn broadcast_except(&self, origin: u64, payload: &str) -> usize {
        let snapshot: Vec<ConnectionHandle> = {
            let connections = self.connections.read().await;
            connections
                .values()
                .filter(|handle| handle.id != origin)
                .cloned()
                .collect()
        };

        let mut delivered = 0;
        for handle in snapshot {
            if handle.try_send(payload.to_string()) {
                delivered += 1;
            }
        }
        delivered
    }

    /// Number of registered connections
    pub async fn count(&self) -> usize {
        self.connections.read().await.len()
    }
}
