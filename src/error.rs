//! Error types
//!
//! Two layers of failure: [`SignalingError`] is a per-request outcome
//! reported back to the requesting peer inside the response envelope, and
//! [`ConnectionError`] is a gateway-level fault that ends the affected
//! connection only. Nothing here tears the server down.

use thiserror::Error;

use crate::engine::EngineError;
use crate::protocol::{ConsumerId, ErrorBody, MediaKind, ProducerId, TransportId};

/// Convenience alias for request handling results
pub type Result<T> = std::result::Result<T, SignalingError>;

/// Per-request failures surfaced in response payloads
///
/// None of these close the connection; the peer may keep issuing requests.
/// `NoProducerAvailable` is an expected outcome rather than a fault; the
/// documented client pattern is to retry it after a delay.
#[derive(Debug, Error)]
pub enum SignalingError {
    /// Transport/producer/consumer operation attempted before joining a room
    #[error("not in a room")]
    NotInRoom,

    /// `consume` issued before any consumer-side transport was created
    #[error("no consumer transport created")]
    NoConsumerTransport,

    /// Referenced transport is not owned by the requesting peer
    #[error("unknown transport: {0}")]
    UnknownTransport(TransportId),

    /// Referenced consumer is not owned by the requesting peer
    #[error("unknown consumer: {0}")]
    UnknownConsumer(ConsumerId),

    /// No other room member currently produces the requested kind
    #[error("no {0} producer available")]
    NoProducerAvailable(MediaKind),

    /// The engine refused the consumer/producer capability match
    #[error("incompatible capabilities for producer {0}")]
    IncompatibleCapabilities(ProducerId),

    /// The underlying engine call failed; message carried through
    #[error("engine operation failed: {0}")]
    Engine(#[from] EngineError),
}

impl SignalingError {
    /// Stable wire code for the response `error.code` field
    pub fn code(&self) -> &'static str {
        match self {
            SignalingError::NotInRoom | SignalingError::NoConsumerTransport => {
                "preconditionFailed"
            }
            SignalingError::UnknownTransport(_) | SignalingError::UnknownConsumer(_) => {
                "resourceNotFound"
            }
            SignalingError::NoProducerAvailable(_) => "noProducerAvailable",
            SignalingError::IncompatibleCapabilities(_) => "incompatibleCapabilities",
            SignalingError::Engine(_) => "engineOperationFailed",
        }
    }

    /// Wire representation of this error
    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            code: self.code().to_string(),
            message: self.to_string(),
        }
    }
}

/// Gateway-level faults that end a single connection
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("message encoding failed: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("peer push channel closed")]
    ChannelClosed,
}
