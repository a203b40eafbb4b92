//! Bridge entry point
//!
//! Run with: `reaper-bridge [BIND_ADDR]` (defaults to 127.0.0.1:8765).

use reaper_bridge::{BridgeServer, ServerConfig, StateStore};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> reaper_bridge::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut config = ServerConfig::default();
    if let Some(arg) = std::env::args().nth(1) {
        match arg.parse() {
            Ok(addr) => config = config.bind(addr),
            Err(e) => {
                eprintln!("Invalid bind address '{}': {}", arg, e);
                std::process::exit(2);
            }
        }
    }

    let server = BridgeServer::new(config, StateStore::new());
    server
        .run_until(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
}
