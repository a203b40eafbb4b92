//! Bridge server
//!
//! HTTP/WebSocket front of the bridge: binds the configured address,
//! serves the landing page and health endpoint, and upgrades `/ws`
//! requests into per-connection protocol loops.

mod config;
mod connection;
mod routes;

pub use config::ServerConfig;
pub use connection::{ConnectionPhase, ConnectionState};
pub use routes::{build_router, AppState, HealthResponse};

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use crate::error::Result;
use crate::hub::BroadcastHub;
use crate::registry::ConnectionRegistry;
use crate::store::StateStore;

/// Parameter bridge server
pub struct BridgeServer {
    config: ServerConfig,
    store: Arc<StateStore>,
    registry: Arc<ConnectionRegistry>,
    hub: Arc<BroadcastHub>,
}

impl BridgeServer {
    /// Create a new server over the given state store
    pub fn new(config: ServerConfig, store: StateStore) -> Self {
        let store = Arc::new(store);
        let registry = Arc::new(ConnectionRegistry::new(config.send_queue_capacity));
        let hub = Arc::new(BroadcastHub::new(Arc::clone(&store), Arc::clone(&registry)));

        Self {
            config,
            store,
            registry,
            hub,
        }
    }

    /// Get a reference to the state store
    pub fn store(&self) -> &Arc<StateStore> {
        &self.store
    }

    /// Get a reference to the connection registry
    pub fn registry(&self) -> &Arc<ConnectionRegistry> {
        &self.registry
    }

    /// Get the configured bind address
    pub fn bind_addr(&self) -> SocketAddr {
        self.config.bind_addr
    }

    /// Run the server
    ///
    /// This method blocks until the server is shut down.
    pub async fn run(&self) -> Result<()> {
        let listener = TcpListener::bind(self.config.bind_addr).await?;
        tracing::info!(addr = %self.config.bind_addr, "Bridge listening");
        self.serve(listener).await
    }

    /// Run the server with graceful shutdown
    pub async fn run_until<F>(&self, shutdown: F) -> Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(self.config.bind_addr).await?;
        tracing::info!(addr = %self.config.bind_addr, "Bridge listening");

        axum::serve(listener, build_router(self.app_state()))
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("Bridge shut down");
        Ok(())
    }

    /// Serve on an already-bound listener
    ///
    /// Useful for tests that bind to an ephemeral port first.
    pub async fn serve(&self, listener: TcpListener) -> Result<()> {
        axum::serve(listener, build_router(self.app_state())).await?;
        Ok(())
    }

    fn app_state(&self) -> AppState {
        AppState::new(
            Arc::clone(&self.store),
            Arc::clone(&self.registry),
            Arc::clone(&self.hub),
        )
    }
}
