//! Request, response and event messages
//!
//! Requests arrive as JSON text frames shaped `{"id": n, "type": "...", ...}`
//! and are answered by `{"id": n, "result": ...}` or `{"id": n, "error": ...}`.
//! Server-initiated pushes are uncorrelated `{"event": "...", "data": ...}`
//! frames.

use serde::{Deserialize, Serialize};

use super::types::{
    ConnectionParams, ConsumerCapabilities, ConsumerId, DtlsParameters, MediaKind,
    MediaParameters, ProducerId, RoomId, RtpCapabilities, TransportId,
};

/// A client request with its correlation id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestEnvelope {
    pub id: u64,
    #[serde(flatten)]
    pub request: ClientRequest,
}

/// Signaling requests, one variant per protocol message
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientRequest {
    #[serde(rename_all = "camelCase")]
    JoinRoom { room_id: RoomId },
    GetRtpCapabilities,
    CreateProducerTransport,
    #[serde(rename_all = "camelCase")]
    ConnectTransport {
        transport_id: TransportId,
        dtls_parameters: DtlsParameters,
    },
    #[serde(rename_all = "camelCase")]
    Produce {
        transport_id: TransportId,
        kind: MediaKind,
        media_parameters: MediaParameters,
    },
    #[serde(rename_all = "camelCase")]
    CreateConsumerTransport {
        consumer_capabilities: ConsumerCapabilities,
    },
    #[serde(rename_all = "camelCase")]
    ConnectConsumerTransport {
        transport_id: TransportId,
        dtls_parameters: DtlsParameters,
    },
    #[serde(rename_all = "camelCase")]
    Consume {
        kind: MediaKind,
        consumer_capabilities: ConsumerCapabilities,
    },
    #[serde(rename_all = "camelCase")]
    ResumeConsumer { consumer_id: ConsumerId },
    #[serde(rename_all = "camelCase")]
    ChatMessage {
        room_id: RoomId,
        text: String,
        sender: String,
    },
}

impl ClientRequest {
    /// Protocol name of this request, for logging
    pub fn name(&self) -> &'static str {
        match self {
            ClientRequest::JoinRoom { .. } => "joinRoom",
            ClientRequest::GetRtpCapabilities => "getRtpCapabilities",
            ClientRequest::CreateProducerTransport => "createProducerTransport",
            ClientRequest::ConnectTransport { .. } => "connectTransport",
            ClientRequest::Produce { .. } => "produce",
            ClientRequest::CreateConsumerTransport { .. } => "createConsumerTransport",
            ClientRequest::ConnectConsumerTransport { .. } => "connectConsumerTransport",
            ClientRequest::Consume { .. } => "consume",
            ClientRequest::ResumeConsumer { .. } => "resumeConsumer",
            ClientRequest::ChatMessage { .. } => "chatMessage",
        }
    }
}

/// Payload of a `createProducerTransport`/`createConsumerTransport` response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportCreated {
    pub transport_id: TransportId,
    pub connection_params: ConnectionParams,
}

/// Payload of a successful `consume` response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsumerCreated {
    pub consumer_id: ConsumerId,
    pub producer_id: ProducerId,
    pub kind: MediaKind,
    pub media_parameters: MediaParameters,
}

/// Successful response payloads
///
/// Serialized untagged: each variant is the bare object the protocol table
/// defines for its request. `Capabilities` wraps arbitrary JSON and must stay
/// the last variant so deserialization tries the structured shapes first.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponsePayload {
    Consumer(ConsumerCreated),
    Transport(TransportCreated),
    #[serde(rename_all = "camelCase")]
    Produced { producer_id: ProducerId },
    Ack { success: bool },
    Connected {},
    Capabilities(RtpCapabilities),
}

/// Error payload carried in a response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

/// A response correlated to a request id; exactly one of `result`/`error`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<ResponsePayload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

impl ResponseEnvelope {
    pub fn ok(id: u64, payload: ResponsePayload) -> Self {
        Self {
            id,
            result: Some(payload),
            error: None,
        }
    }

    pub fn err(id: u64, body: ErrorBody) -> Self {
        Self {
            id,
            result: None,
            error: Some(body),
        }
    }
}

/// Server-initiated pushes fanned out to room members
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ServerEvent {
    #[serde(rename_all = "camelCase")]
    NewProducer { producer_id: ProducerId, kind: MediaKind },
    #[serde(rename_all = "camelCase")]
    ChatMessage {
        sender: String,
        text: String,
        room_id: RoomId,
    },
}

/// Any outbound frame: a correlated response or an unsolicited event
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ServerMessage {
    Response(ResponseEnvelope),
    Event(ServerEvent),
}
