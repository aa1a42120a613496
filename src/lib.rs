//! WebRTC room signaling server library
//!
//! Session orchestration between clients and an external media engine:
//! peers connect over WebSocket, join named rooms, negotiate transports,
//! producers and consumers against the engine, discover each other's media,
//! and exchange room-scoped chat. The engine itself (RTP, DTLS, ICE,
//! codecs) sits behind the [`engine::MediaEngine`] trait.
//!
//! # Architecture
//!
//! ```text
//!   client ──ws── Connection ──► SignalingHandler ──► EngineAdapter ──► media engine
//!                    │                  │
//!                    │                  ├─► RoomRegistry   (membership)
//!     push events ◄──┘                  ├─► PeerMap        (sessions + push channels)
//!                                       └─► ProducerDirectory (read-through discovery)
//! ```
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use signaling_rs::{LocalEngine, ServerConfig, SignalingServer};
//!
//! #[tokio::main]
//! async fn main() -> std::io::Result<()> {
//!     let config = ServerConfig::default();
//!     let server = SignalingServer::new(config, Arc::new(LocalEngine::new()));
//!     server.run().await
//! }
//! ```

pub mod engine;
pub mod error;
pub mod protocol;
pub mod registry;
pub mod server;
pub mod session;
pub mod stats;

pub use engine::{EngineAdapter, EngineError, LocalEngine, MediaEngine};
pub use error::{ConnectionError, SignalingError};
pub use protocol::{ClientRequest, MediaKind, PeerId, RoomId, ServerEvent};
pub use server::{ServerConfig, SignalingServer};
pub use session::{PeerSession, SignalingHandler};
