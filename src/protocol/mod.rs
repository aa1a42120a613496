//! Signaling protocol types
//!
//! Wire-level request, response and event types exchanged with clients,
//! plus the identifier newtypes shared across the crate. Every request is
//! validated into a typed variant at the gateway boundary before it reaches
//! the negotiation handler.

pub mod message;
pub mod types;

pub use message::{
    ClientRequest, ConsumerCreated, ErrorBody, RequestEnvelope, ResponseEnvelope, ResponsePayload,
    ServerEvent, ServerMessage, TransportCreated,
};
pub use types::{
    ConnectionParams, ConsumerCapabilities, ConsumerId, DtlsParameters, MediaKind,
    MediaParameters, PeerId, ProducerId, RoomId, RtpCapabilities, TransportId,
};
