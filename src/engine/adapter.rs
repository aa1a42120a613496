//! Timeout-bounded engine access
//!
//! Wraps the engine trait object so that every round trip carries the
//! server's configured deadline. A stalled engine call surfaces as
//! [`EngineError::Timeout`] instead of hanging the peer's request loop.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use super::{
    ConsumerDescriptor, EngineError, MediaEngine, TransportDescriptor, TransportDirection,
};
use crate::protocol::{
    ConsumerCapabilities, ConsumerId, DtlsParameters, MediaKind, MediaParameters, ProducerId,
    RtpCapabilities, TransportId,
};

/// Shared handle to the media engine with per-call timeouts
#[derive(Clone)]
pub struct EngineAdapter {
    engine: Arc<dyn MediaEngine>,
    timeout: Duration,
}

impl EngineAdapter {
    pub fn new(engine: Arc<dyn MediaEngine>, timeout: Duration) -> Self {
        Self { engine, timeout }
    }

    async fn bounded<T, F>(&self, fut: F) -> Result<T, EngineError>
    where
        F: Future<Output = Result<T, EngineError>>,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(EngineError::Timeout(self.timeout)),
        }
    }

    pub async fn capabilities(&self) -> Result<RtpCapabilities, EngineError> {
        self.bounded(self.engine.capabilities()).await
    }

    pub async fn create_transport(
        &self,
        direction: TransportDirection,
    ) -> Result<TransportDescriptor, EngineError> {
        self.bounded(self.engine.create_transport(direction)).await
    }

    pub async fn connect_transport(
        &self,
        transport: &TransportId,
        dtls: DtlsParameters,
    ) -> Result<(), EngineError> {
        self.bounded(self.engine.connect_transport(transport, dtls))
            .await
    }

    pub async fn create_producer(
        &self,
        transport: &TransportId,
        kind: MediaKind,
        params: MediaParameters,
    ) -> Result<ProducerId, EngineError> {
        self.bounded(self.engine.create_producer(transport, kind, params))
            .await
    }

    pub async fn can_consume(
        &self,
        producer: &ProducerId,
        capabilities: &ConsumerCapabilities,
    ) -> Result<bool, EngineError> {
        self.bounded(self.engine.can_consume(producer, capabilities))
            .await
    }

    pub async fn create_consumer(
        &self,
        transport: &TransportId,
        producer: &ProducerId,
        kind: MediaKind,
    ) -> Result<ConsumerDescriptor, EngineError> {
        self.bounded(self.engine.create_consumer(transport, producer, kind))
            .await
    }

    pub async fn resume_consumer(&self, consumer: &ConsumerId) -> Result<(), EngineError> {
        self.bounded(self.engine.resume_consumer(consumer)).await
    }

    pub async fn close_resource(&self, resource: &str) -> Result<(), EngineError> {
        self.bounded(self.engine.close_resource(resource)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    /// Engine that never answers, for timeout coverage
    struct StalledEngine;

    #[async_trait]
    impl MediaEngine for StalledEngine {
        async fn capabilities(&self) -> Result<RtpCapabilities, EngineError> {
            std::future::pending().await
        }

        async fn create_transport(
            &self,
            _direction: TransportDirection,
        ) -> Result<TransportDescriptor, EngineError> {
            std::future::pending().await
        }

        async fn connect_transport(
            &self,
            _transport: &TransportId,
            _dtls: DtlsParameters,
        ) -> Result<(), EngineError> {
            std::future::pending().await
        }

        async fn create_producer(
            &self,
            _transport: &TransportId,
            _kind: MediaKind,
            _params: MediaParameters,
        ) -> Result<ProducerId, EngineError> {
            std::future::pending().await
        }

        async fn can_consume(
            &self,
            _producer: &ProducerId,
            _capabilities: &ConsumerCapabilities,
        ) -> Result<bool, EngineError> {
            std::future::pending().await
        }

        async fn create_consumer(
            &self,
            _transport: &TransportId,
            _producer: &ProducerId,
            _kind: MediaKind,
        ) -> Result<ConsumerDescriptor, EngineError> {
            std::future::pending().await
        }

        async fn resume_consumer(&self, _consumer: &ConsumerId) -> Result<(), EngineError> {
            std::future::pending().await
        }

        async fn close_resource(&self, _resource: &str) -> Result<(), EngineError> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn test_stalled_call_times_out() {
        let adapter = EngineAdapter::new(Arc::new(StalledEngine), Duration::from_millis(20));

        let result = adapter.capabilities().await;
        assert!(matches!(result, Err(EngineError::Timeout(_))));
    }

    #[tokio::test]
    async fn test_fast_call_passes_through() {
        let adapter = EngineAdapter::new(
            Arc::new(super::super::LocalEngine::new()),
            Duration::from_secs(1),
        );

        let caps = adapter.capabilities().await.unwrap();
        assert!(caps.0.get("codecs").is_some());
    }
}
