//! WebSocket bridge between browser control surfaces and REAPER
//!
//! Multiple UI clients connect over WebSocket to observe and mutate a
//! shared set of named parameters. Every change is persisted to REAPER's
//! ExtState file before being fanned out to the other clients, so REAPER
//! (polling the same file out-of-band) and late-joining clients always see
//! durable values.
//!
//! # Architecture
//!
//! ```text
//!   browser A ──ws──┐                              ┌──ws── browser B
//!                   ▼                              ▼
//!             [connection]                   [connection]
//!                   │  set_param                   ▲
//!                   ▼                              │ param_update
//!             BroadcastHub ──► ConnectionRegistry ─┘
//!                   │
//!                   ▼
//!              StateStore ──rewrite──► reaper-extstate.ini ◄──polls── REAPER
//! ```
//!
//! Changes are applied in order per connection; writers racing from
//! different connections on the same field are last-writer-wins.
//!
//! # Example
//!
//! ```no_run
//! use reaper_bridge::{BridgeServer, ServerConfig, StateStore};
//!
//! #[tokio::main]
//! async fn main() -> reaper_bridge::Result<()> {
//!     let server = BridgeServer::new(ServerConfig::default(), StateStore::new());
//!     server.run().await
//! }
//! ```

pub mod error;
pub mod extstate;
pub mod hub;
pub mod protocol;
pub mod registry;
pub mod server;
pub mod store;

pub use error::{BridgeError, Result};
pub use hub::{BroadcastHub, ChangeEvent};
pub use protocol::{ClientMessage, ServerMessage, UpdateSource};
pub use registry::ConnectionRegistry;
pub use server::{BridgeServer, ServerConfig};
pub use store::StateStore;
