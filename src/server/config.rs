//! Server configuration

use std::net::SocketAddr;
use std::time::Duration;

/// Server configuration options
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to
    pub bind_addr: SocketAddr,

    /// Maximum concurrent connections (0 = unlimited)
    pub max_connections: usize,

    /// Deadline for each media engine round trip
    pub engine_timeout: Duration,

    /// Disconnect a peer after this long without any inbound frame
    pub idle_timeout: Duration,

    /// Capacity of each peer's outbound push channel; events beyond it are
    /// dropped rather than blocking the sender
    pub push_capacity: usize,

    /// Whether chat broadcasts include the sending peer
    pub chat_include_sender: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".parse().unwrap(),
            max_connections: 0, // Unlimited
            engine_timeout: Duration::from_secs(10),
            idle_timeout: Duration::from_secs(60),
            push_capacity: 64,
            chat_include_sender: true,
        }
    }
}

impl ServerConfig {
    /// Create a new config with custom bind address
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

    /// Set maximum connections
    pub fn max_connections(mut self, max: usize) -> Self {
        self.max_connections = max;
        self
    }

    /// Set the engine round-trip deadline
    pub fn engine_timeout(mut self, timeout: Duration) -> Self {
        self.engine_timeout = timeout;
        self
    }

    /// Set idle timeout
    pub fn idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = timeout;
        self
    }

    /// Set push channel capacity
    pub fn push_capacity(mut self, capacity: usize) -> Self {
        self.push_capacity = capacity;
        self
    }

    /// Exclude the sender from its own chat broadcasts
    pub fn exclude_chat_sender(mut self) -> Self {
        self.chat_include_sender = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();

        assert_eq!(config.bind_addr.port(), 3000);
        assert_eq!(config.max_connections, 0);
        assert_eq!(config.engine_timeout, Duration::from_secs(10));
        assert_eq!(config.idle_timeout, Duration::from_secs(60));
        assert!(config.chat_include_sender);
    }

    #[test]
    fn test_with_addr() {
        let addr: SocketAddr = "127.0.0.1:4000".parse().unwrap();
        let config = ServerConfig::with_addr(addr);

        assert_eq!(config.bind_addr, addr);
    }

    #[test]
    fn test_builder_chaining() {
        let addr: SocketAddr = "127.0.0.1:3001".parse().unwrap();
        let config = ServerConfig::default()
            .bind(addr)
            .max_connections(50)
            .engine_timeout(Duration::from_secs(15))
            .idle_timeout(Duration::from_secs(30))
            .push_capacity(128)
            .exclude_chat_sender();

        assert_eq!(config.bind_addr, addr);
        assert_eq!(config.max_connections, 50);
        assert_eq!(config.engine_timeout, Duration::from_secs(15));
        assert_eq!(config.idle_timeout, Duration::from_secs(30));
        assert_eq!(config.push_capacity, 128);
        assert!(!config.chat_include_sender);
    }
}
