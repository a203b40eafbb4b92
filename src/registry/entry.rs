//! Per-connection registry entry

use tokio::sync::mpsc;

/// Handle to one connected client's outbound queue
///
/// Cheap to clone; the registry hands out clones when snapshotting for
/// fan-out so the member set lock is never held across sends.
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    /// Registry-assigned connection ID
    pub id: u64,

    /// Bounded queue drained by the connection's writer task
    pub(super) tx: mpsc::Sender<String>,
}

impl ConnectionHandle {
    pub(super) fn new(id: u64, tx: mpsc::Sender<String>) -> Self {
        Self { id, tx }
    }

    /// Queue a payload without blocking
    ///
    /// A full queue drops the payload — one slow client must never stall
    /// fan-out to the others. Returns whether the payload was queued.
    pub(super) fn try_send(&self, payload: String) -> bool {
        match self.tx.try_send(payload) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!(connection_id = self.id, "Send queue full, dropping message");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                tracing::debug!(connection_id = self.id, "Send queue closed");
                false
            }
        }
    }
}
