//! Server gateway
//!
//! The accept loop, per-connection gateway tasks and server configuration.

pub mod config;
pub mod connection;
pub mod listener;

pub use config::ServerConfig;
pub use connection::Connection;
pub use listener::SignalingServer;
