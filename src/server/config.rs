//! Server configuration

use std::net::SocketAddr;

/// Server configuration options
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to
    ///
    /// The bridge assumes a trusted loopback interface; there is no
    /// authentication layer.
    pub bind_addr: SocketAddr,

    /// Capacity of each connection's outbound send queue
    ///
    /// Payloads beyond this are dropped for that connection rather than
    /// stalling fan-out to the others.
    pub send_queue_capacity: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8765)),
            send_queue_capacity: 64,
        }
    }
}

impl ServerConfig {
    /// Create a new config with a custom bind address
    pub fn with_addr(addr: SocketAddr) -> Self {
        Self {
            bind_addr: addr,
            ..Default::default()
        }
    }

    /// Set the bind address
    pub fn bind(mut self, addr: SocketAddr) -> Self {
        self.bind_addr = addr;
        self
    }

    /// Set the per-connection send queue capacity
    pub fn send_queue_capacity(mut self, capacity: usize) -> Self {
        self.send_queue_capacity = capacity.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();

        assert!(config.bind_addr.ip().is_loopback());
        assert_eq!(config.bind_addr.port(), 8765);
        assert_eq!(config.send_queue_capacity, 64);
    }

    #[test]
    fn test_with_addr() {
        let addr: SocketAddr = "127.0.0.1:9000".parse().unwrap();
        let config = ServerConfig::with_addr(addr);

        assert_eq!(config.bind_addr, addr);
    }

    #[test]
    fn test_builder_chaining() {
        let addr: SocketAddr = "127.0.0.1:9001".parse().unwrap();
        let config = ServerConfig::default().bind(addr).send_queue_capacity(16);

        assert_eq!(config.bind_addr, addr);
        assert_eq!(config.send_queue_capacity, 16);
    }

    #[test]
    fn test_queue_capacity_floor() {
        let config = ServerConfig::default().send_queue_capacity(0);

        assert_eq!(config.send_queue_capacity, 1);
    }
}
