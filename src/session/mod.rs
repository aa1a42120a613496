//! Peer sessions and the negotiation protocol handler
//!
//! One [`PeerSession`] per connected peer tracks the negotiation state
//! machine and every engine resource the peer owns. [`SignalingHandler`]
//! interprets requests against that state, drives the media engine, and
//! owns the single teardown path invoked when a peer disconnects.

pub mod handler;
pub mod peers;
pub mod state;

pub use handler::SignalingHandler;
pub use peers::{PeerHandle, PeerMap};
pub use state::{
    ConsumerRecord, PeerPhase, PeerSession, ProducerRecord, TransportConnState, TransportRecord,
};
