//! Identifier newtypes and opaque engine payloads
//!
//! Room and peer identifiers are assigned by this crate; transport, producer
//! and consumer identifiers are issued by the media engine and treated as
//! opaque strings. Capability and parameter payloads pass through the
//! signaling layer untouched, so they are thin wrappers over raw JSON.

use serde::{Deserialize, Serialize};

/// Identifier of a room (caller-supplied, used as a map key)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(pub String);

impl RoomId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for RoomId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a connected peer, allocated by the gateway at accept time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PeerId(pub u64);

impl std::fmt::Display for PeerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

macro_rules! engine_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

engine_id! {
    /// Engine-issued identifier of a negotiated transport
    TransportId
}

engine_id! {
    /// Engine-issued identifier of a media producer
    ProducerId
}

engine_id! {
    /// Engine-issued identifier of a media consumer
    ConsumerId
}

/// Kind of media carried by a producer or consumer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Audio,
    Video,
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaKind::Audio => write!(f, "audio"),
            MediaKind::Video => write!(f, "video"),
        }
    }
}

macro_rules! opaque_payload {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub serde_json::Value);

        impl $name {
            pub fn into_inner(self) -> serde_json::Value {
                self.0
            }
        }
    };
}

opaque_payload! {
    /// Engine capability descriptor (codec list and negotiation hints)
    RtpCapabilities
}

opaque_payload! {
    /// DTLS handshake parameters supplied by the client
    DtlsParameters
}

opaque_payload! {
    /// Media parameters describing an RTP stream (client to engine)
    MediaParameters
}

opaque_payload! {
    /// Capabilities the consuming side declares for compatibility checks
    ConsumerCapabilities
}

opaque_payload! {
    /// ICE/DTLS connection bundle returned when a transport is created
    ConnectionParams
}
