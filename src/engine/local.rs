//! In-process media engine
//!
//! A self-contained [`MediaEngine`] used by the demo binary and the test
//! suite. It performs no media work; it issues ids, keeps a ledger of open
//! resources and answers capability checks against a fixed codec set
//! (opus audio at 48 kHz, VP8 video at 90 kHz). Real deployments inject an
//! out-of-process engine behind the same trait.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::json;
use uuid::Uuid;

use super::{
    ConsumerDescriptor, EngineError, MediaEngine, TransportDescriptor, TransportDirection,
};
use crate::protocol::{
    ConnectionParams, ConsumerCapabilities, ConsumerId, DtlsParameters, MediaKind,
    MediaParameters, ProducerId, RtpCapabilities, TransportId,
};

#[derive(Debug, Clone)]
enum Resource {
    Transport {
        direction: TransportDirection,
        connected: bool,
    },
    Producer {
        kind: MediaKind,
    },
    Consumer,
}

/// In-process engine with a ledger of open resources
#[derive(Default)]
pub struct LocalEngine {
    resources: Mutex<HashMap<String, Resource>>,
}

impl LocalEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of currently open resources, for leak assertions
    pub fn open_resources(&self) -> usize {
        self.resources.lock().unwrap().len()
    }

    /// Whether a resource id is still open
    pub fn has_resource(&self, id: &str) -> bool {
        self.resources.lock().unwrap().contains_key(id)
    }

    /// Whether a transport has completed its DTLS connect
    pub fn transport_connected(&self, id: &TransportId) -> bool {
        matches!(
            self.resources.lock().unwrap().get(id.as_str()),
            Some(Resource::Transport {
                connected: true,
                ..
            })
        )
    }

    fn fresh_id() -> String {
        Uuid::new_v4().to_string()
    }

    fn codec_mime(kind: MediaKind) -> &'static str {
        match kind {
            MediaKind::Audio => "audio/opus",
            MediaKind::Video => "video/VP8",
        }
    }

    /// A declared capability set supports `kind` if it lists at least one
    /// codec of that media type
    fn caps_support(capabilities: &ConsumerCapabilities, kind: MediaKind) -> bool {
        let prefix = match kind {
            MediaKind::Audio => "audio/",
            MediaKind::Video => "video/",
        };

        capabilities
            .0
            .get("codecs")
            .and_then(|c| c.as_array())
            .map(|codecs| {
                codecs.iter().any(|codec| {
                    codec
                        .get("mimeType")
                        .and_then(|m| m.as_str())
                        .is_some_and(|m| m.starts_with(prefix))
                })
            })
            .unwrap_or(false)
    }
}

#[async_trait]
impl MediaEngine for LocalEngine {
    async fn capabilities(&self) -> Result<RtpCapabilities, EngineError> {
        Ok(RtpCapabilities(json!({
            "codecs": [
                {
                    "kind": "audio",
                    "mimeType": "audio/opus",
                    "clockRate": 48000,
                    "channels": 2
                },
                {
                    "kind": "video",
                    "mimeType": "video/VP8",
                    "clockRate": 90000,
                    "parameters": {}
                }
            ]
        })))
    }

    async fn create_transport(
        &self,
        direction: TransportDirection,
    ) -> Result<TransportDescriptor, EngineError> {
        let id = Self::fresh_id();

        self.resources.lock().unwrap().insert(
            id.clone(),
            Resource::Transport {
                direction,
                connected: false,
            },
        );

        Ok(TransportDescriptor {
            id: TransportId::new(id.clone()),
            connection_params: ConnectionParams(json!({
                "iceParameters": {
                    "usernameFragment": Self::fresh_id(),
                    "password": Self::fresh_id(),
                    "iceLite": true
                },
                "iceCandidates": [],
                "dtlsParameters": {
                    "role": "auto",
                    "fingerprints": []
                }
            })),
        })
    }

    async fn connect_transport(
        &self,
        transport: &TransportId,
        _dtls: DtlsParameters,
    ) -> Result<(), EngineError> {
        let mut resources = self.resources.lock().unwrap();

        match resources.get_mut(transport.as_str()) {
            Some(Resource::Transport { connected, .. }) => {
                *connected = true;
                Ok(())
            }
            _ => Err(EngineError::UnknownResource(transport.to_string())),
        }
    }

    async fn create_producer(
        &self,
        transport: &TransportId,
        kind: MediaKind,
        _params: MediaParameters,
    ) -> Result<ProducerId, EngineError> {
        let mut resources = self.resources.lock().unwrap();

        match resources.get(transport.as_str()) {
            Some(Resource::Transport { direction, .. }) => {
                if *direction != TransportDirection::Send {
                    return Err(EngineError::Rejected(format!(
                        "transport {} is not a send transport",
                        transport
                    )));
                }
            }
            _ => return Err(EngineError::UnknownResource(transport.to_string())),
        }

        let id = Self::fresh_id();
        resources.insert(id.clone(), Resource::Producer { kind });

        Ok(ProducerId::new(id))
    }

    async fn can_consume(
        &self,
        producer: &ProducerId,
        capabilities: &ConsumerCapabilities,
    ) -> Result<bool, EngineError> {
        let resources = self.resources.lock().unwrap();

        match resources.get(producer.as_str()) {
            Some(Resource::Producer { kind }) => Ok(Self::caps_support(capabilities, *kind)),
            _ => Err(EngineError::UnknownResource(producer.to_string())),
        }
    }

    async fn create_consumer(
        &self,
        transport: &TransportId,
        producer: &ProducerId,
        kind: MediaKind,
    ) -> Result<ConsumerDescriptor, EngineError> {
        let mut resources = self.resources.lock().unwrap();

        match resources.get(transport.as_str()) {
            Some(Resource::Transport { direction, .. }) => {
                if *direction != TransportDirection::Recv {
                    return Err(EngineError::Rejected(format!(
                        "transport {} is not a recv transport",
                        transport
                    )));
                }
            }
            _ => return Err(EngineError::UnknownResource(transport.to_string())),
        }
        if !matches!(
            resources.get(producer.as_str()),
            Some(Resource::Producer { .. })
        ) {
            return Err(EngineError::UnknownResource(producer.to_string()));
        }

        let clock_rate = match kind {
            MediaKind::Audio => 48_000,
            MediaKind::Video => 90_000,
        };
        let id = Self::fresh_id();
        resources.insert(id.clone(), Resource::Consumer);

        Ok(ConsumerDescriptor {
            id: ConsumerId::new(id),
            producer_id: producer.clone(),
            kind,
            media_parameters: MediaParameters(json!({
                "codecs": [{
                    "mimeType": Self::codec_mime(kind),
                    "payloadType": 100,
                    "clockRate": clock_rate
                }],
                "rtcp": { "reducedSize": true }
            })),
        })
    }

    async fn resume_consumer(&self, consumer: &ConsumerId) -> Result<(), EngineError> {
        let resources = self.resources.lock().unwrap();

        match resources.get(consumer.as_str()) {
            Some(Resource::Consumer) => Ok(()),
            _ => Err(EngineError::UnknownResource(consumer.to_string())),
        }
    }

    async fn close_resource(&self, resource: &str) -> Result<(), EngineError> {
        self.resources.lock().unwrap().remove(resource);
        Ok(())
    }
}
