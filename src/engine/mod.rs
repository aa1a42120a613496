//! Media engine boundary
//!
//! The signaling layer never touches RTP, DTLS or codecs itself; everything
//! media-related is delegated to an external engine behind the [`MediaEngine`]
//! trait. Each operation is a request/response round trip and may fail or
//! stall, so callers go through [`EngineAdapter`] which bounds every call
//! with a timeout.

pub mod adapter;
pub mod local;

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::protocol::{
    ConnectionParams, ConsumerCapabilities, ConsumerId, DtlsParameters, MediaKind,
    MediaParameters, ProducerId, RtpCapabilities, TransportId,
};

pub use adapter::EngineAdapter;
pub use local::LocalEngine;

/// Failure of a media engine operation
///
/// The negotiation handler surfaces these to the requesting client verbatim
/// and never retries; retry policy belongs to the client.
#[derive(Debug, Clone, Error)]
pub enum EngineError {
    /// The engine rejected the request (malformed parameters, exhaustion)
    #[error("engine rejected request: {0}")]
    Rejected(String),

    /// The referenced resource does not exist in the engine
    #[error("engine has no such resource: {0}")]
    UnknownResource(String),

    /// The engine did not answer within the adapter's deadline
    #[error("engine did not respond within {0:?}")]
    Timeout(Duration),

    /// The engine is unreachable or has died
    #[error("engine unavailable: {0}")]
    Unavailable(String),
}

/// Direction of a transport, from the peer's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportDirection {
    /// Peer sends media over this transport (producing)
    Send,
    /// Peer receives media over this transport (consuming)
    Recv,
}

impl std::fmt::Display for TransportDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransportDirection::Send => write!(f, "send"),
            TransportDirection::Recv => write!(f, "recv"),
        }
    }
}

/// A freshly created transport and the parameters the client needs to
/// complete ICE/DTLS negotiation with the engine
#[derive(Debug, Clone)]
pub struct TransportDescriptor {
    pub id: TransportId,
    pub connection_params: ConnectionParams,
}

/// A freshly created consumer bound to an existing producer
#[derive(Debug, Clone)]
pub struct ConsumerDescriptor {
    pub id: ConsumerId,
    pub producer_id: ProducerId,
    pub kind: MediaKind,
    pub media_parameters: MediaParameters,
}

/// Request/response interface to the external media engine
///
/// Capability, DTLS and RTP parameter payloads are deliberately opaque JSON;
/// their interpretation is entirely the engine's business.
#[async_trait]
pub trait MediaEngine: Send + Sync {
    /// Capability descriptor clients need before producing or consuming
    async fn capabilities(&self) -> Result<RtpCapabilities, EngineError>;

    /// Create a transport for the given direction
    async fn create_transport(
        &self,
        direction: TransportDirection,
    ) -> Result<TransportDescriptor, EngineError>;

    /// Complete DTLS negotiation for a transport
    async fn connect_transport(
        &self,
        transport: &TransportId,
        dtls: DtlsParameters,
    ) -> Result<(), EngineError>;

    /// Create a producer of `kind` on a transport
    async fn create_producer(
        &self,
        transport: &TransportId,
        kind: MediaKind,
        params: MediaParameters,
    ) -> Result<ProducerId, EngineError>;

    /// Whether a consumer with the given capabilities can consume a producer
    async fn can_consume(
        &self,
        producer: &ProducerId,
        capabilities: &ConsumerCapabilities,
    ) -> Result<bool, EngineError>;

    /// Create a consumer on a transport, bound to an existing producer
    async fn create_consumer(
        &self,
        transport: &TransportId,
        producer: &ProducerId,
        kind: MediaKind,
    ) -> Result<ConsumerDescriptor, EngineError>;

    /// Start media flow on a consumer
    async fn resume_consumer(&self, consumer: &ConsumerId) -> Result<(), EngineError>;

    /// Close any engine resource by id; closing an unknown id is a no-op
    async fn close_resource(&self, resource: &str) -> Result<(), EngineError>;
}
