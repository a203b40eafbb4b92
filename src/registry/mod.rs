//! Connection registry for broadcast fan-out
//!
//! The registry owns the live set of connected clients for their whole
//! lifetime: a connection is registered when its socket opens and removed
//! when the socket closes or the protocol loop fails. Each member gets a
//! bounded outbound queue; fan-out enqueues without blocking so one slow
//! client cannot stall delivery to the rest.
//!
//! ```text
//!                    Arc<ConnectionRegistry>
//!                 ┌──────────────────────────┐
//!                 │ connections: HashMap<id, │
//!                 │   ConnectionHandle {     │
//!                 │     tx: mpsc::Sender,    │
//!                 │   }                      │
//!                 │ >                        │
//!                 └────────────┬─────────────┘
//!                              │ broadcast_except(origin)
//!             ┌────────────────┼────────────────┐
//!             ▼                ▼                ▼
//!        [origin: skip]   [writer task]    [writer task]
//!                          rx.recv()        rx.recv()
//!                              │                │
//!                              └──► WebSocket ◄─┘
//! ```

mod entry;
mod store;

pub use entry::ConnectionHandle;
pub use store::ConnectionRegistry;
