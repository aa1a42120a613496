//! Negotiation protocol handler
//!
//! The state machine between client requests and the media engine. Each
//! request is validated against room membership and resource ownership
//! *before* any engine call is made, so a rejected request never leaks an
//! unowned engine resource. Successful operations update the requesting
//! peer's session and, where the protocol calls for it, fan events out to
//! the other members of the peer's room.

use std::sync::Arc;

use tokio::sync::{mpsc, RwLock};

use super::peers::{PeerHandle, PeerMap};
use super::state::{PeerSession, TransportConnState};
use crate::engine::{EngineAdapter, TransportDirection};
use crate::error::{Result, SignalingError};
use crate::protocol::{
    ClientRequest, ConsumerCapabilities, ConsumerCreated, ConsumerId, DtlsParameters, MediaKind,
    MediaParameters, PeerId, ResponsePayload, RoomId, ServerEvent, TransportCreated, TransportId,
};
use crate::registry::{ProducerDirectory, RoomRegistry};
use crate::stats::ServerStats;

/// Interprets signaling requests for all peers
///
/// Shared by every connection task; per-peer state lives in the sessions,
/// so the handler itself is stateless apart from the injected registries.
pub struct SignalingHandler {
    rooms: Arc<RoomRegistry>,
    peers: Arc<PeerMap>,
    directory: ProducerDirectory,
    engine: EngineAdapter,
    chat_include_sender: bool,
    stats: Arc<ServerStats>,
}

impl SignalingHandler {
    pub fn new(
        rooms: Arc<RoomRegistry>,
        peers: Arc<PeerMap>,
        engine: EngineAdapter,
        chat_include_sender: bool,
        stats: Arc<ServerStats>,
    ) -> Self {
        let directory = ProducerDirectory::new(rooms.clone(), peers.clone());

        Self {
            rooms,
            peers,
            directory,
            engine,
            chat_include_sender,
            stats,
        }
    }

    pub fn rooms(&self) -> &Arc<RoomRegistry> {
        &self.rooms
    }

    pub fn peers(&self) -> &Arc<PeerMap> {
        &self.peers
    }

    /// Create and register the session for a newly admitted peer
    pub async fn register_peer(
        &self,
        id: PeerId,
        pusher: mpsc::Sender<ServerEvent>,
    ) -> Arc<RwLock<PeerSession>> {
        let session = Arc::new(RwLock::new(PeerSession::new(id)));
        self.peers
            .insert(id, PeerHandle::new(session.clone(), pusher))
            .await;
        session
    }

    /// Dispatch one request for the peer owning `session`
    ///
    /// Returns `None` when the protocol defines no direct response for the
    /// request (chat); otherwise the result becomes the response payload.
    pub async fn handle_request(
        &self,
        session: &Arc<RwLock<PeerSession>>,
        request: ClientRequest,
    ) -> Option<Result<ResponsePayload>> {
        let peer = session.read().await.id();
        self.stats.request_handled();
        tracing::debug!(peer = %peer, request = request.name(), "Handling request");

        match request {
            ClientRequest::JoinRoom { room_id } => Some(self.join_room(session, room_id).await),
            ClientRequest::GetRtpCapabilities => Some(
                self.engine
                    .capabilities()
                    .await
                    .map(ResponsePayload::Capabilities)
                    .map_err(Into::into),
            ),
            ClientRequest::CreateProducerTransport => {
                Some(self.create_transport(session, TransportDirection::Send).await)
            }
            // Consumer-side capabilities are negotiated per `consume`; the
            // creation payload is accepted for wire compatibility only.
            ClientRequest::CreateConsumerTransport { .. } => {
                Some(self.create_transport(session, TransportDirection::Recv).await)
            }
            ClientRequest::ConnectTransport {
                transport_id,
                dtls_parameters,
            }
            | ClientRequest::ConnectConsumerTransport {
                transport_id,
                dtls_parameters,
            } => Some(
                self.connect_transport(session, transport_id, dtls_parameters)
                    .await,
            ),
            ClientRequest::Produce {
                transport_id,
                kind,
                media_parameters,
            } => Some(
                self.produce(session, transport_id, kind, media_parameters)
                    .await,
            ),
            ClientRequest::Consume {
                kind,
                consumer_capabilities,
            } => Some(self.consume(session, kind, consumer_capabilities).await),
            ClientRequest::ResumeConsumer { consumer_id } => {
                Some(self.resume_consumer(session, consumer_id).await)
            }
            ClientRequest::ChatMessage {
                room_id,
                text,
                sender,
            } => {
                self.chat_message(peer, room_id, text, sender).await;
                None
            }
        }
    }

    async fn join_room(
        &self,
        session: &Arc<RwLock<PeerSession>>,
        room: RoomId,
    ) -> Result<ResponsePayload> {
        let peer = session.read().await.id();

        self.rooms.join(&room, peer).await;
        session.write().await.join_room(room);

        Ok(ResponsePayload::Ack { success: true })
    }

    async fn create_transport(
        &self,
        session: &Arc<RwLock<PeerSession>>,
        direction: TransportDirection,
    ) -> Result<ResponsePayload> {
        // Membership check must precede the engine call; a transport created
        // for a room-less peer would have no owner to clean it up.
        let peer = {
            let session = session.read().await;
            if session.room().is_none() {
                return Err(SignalingError::NotInRoom);
            }
            session.id()
        };

        let descriptor = self.engine.create_transport(direction).await?;

        session
            .write()
            .await
            .add_transport(descriptor.id.clone(), direction);

        tracing::info!(
            peer = %peer,
            transport = %descriptor.id,
            direction = %direction,
            "Transport created"
        );

        Ok(ResponsePayload::Transport(TransportCreated {
            transport_id: descriptor.id,
            connection_params: descriptor.connection_params,
        }))
    }

    async fn connect_transport(
        &self,
        session: &Arc<RwLock<PeerSession>>,
        transport_id: TransportId,
        dtls: DtlsParameters,
    ) -> Result<ResponsePayload> {
        {
            let mut session = session.write().await;
            if session.transport(&transport_id).is_none() {
                return Err(SignalingError::UnknownTransport(transport_id));
            }
            session.set_transport_state(&transport_id, TransportConnState::Connecting);
        }

        match self.engine.connect_transport(&transport_id, dtls).await {
            Ok(()) => {
                session
                    .write()
                    .await
                    .set_transport_state(&transport_id, TransportConnState::Connected);
                Ok(ResponsePayload::Connected {})
            }
            Err(e) => {
                session
                    .write()
                    .await
                    .set_transport_state(&transport_id, TransportConnState::Failed);
                Err(e.into())
            }
        }
    }

    async fn produce(
        &self,
        session: &Arc<RwLock<PeerSession>>,
        transport_id: TransportId,
        kind: MediaKind,
        params: MediaParameters,
    ) -> Result<ResponsePayload> {
        let (peer, room) = {
            let session = session.read().await;
            let room = session.room().cloned().ok_or(SignalingError::NotInRoom)?;
            if session.transport(&transport_id).is_none() {
                return Err(SignalingError::UnknownTransport(transport_id));
            }
            (session.id(), room)
        };

        let producer_id = self
            .engine
            .create_producer(&transport_id, kind, params)
            .await?;

        session
            .write()
            .await
            .add_producer(producer_id.clone(), kind, transport_id);

        tracing::info!(
            peer = %peer,
            room = %room,
            producer = %producer_id,
            kind = %kind,
            "Producer created"
        );

        // Notify every other room member; pushes are queued, never awaited
        // against a slow client.
        self.broadcast(
            &room,
            ServerEvent::NewProducer {
                producer_id: producer_id.clone(),
                kind,
            },
            Some(peer),
        )
        .await;

        Ok(ResponsePayload::Produced { producer_id })
    }

    async fn consume(
        &self,
        session: &Arc<RwLock<PeerSession>>,
        kind: MediaKind,
        capabilities: ConsumerCapabilities,
    ) -> Result<ResponsePayload> {
        let (peer, room, transport_id) = {
            let session = session.read().await;
            let room = session.room().cloned().ok_or(SignalingError::NotInRoom)?;
            let transport = session
                .first_recv_transport()
                .ok_or(SignalingError::NoConsumerTransport)?;
            (session.id(), room, transport.id.clone())
        };

        // An empty directory is an expected outcome: the client retries
        // later rather than the server blocking until a producer appears.
        let (owner, producer_id) = self
            .directory
            .find_producer(&room, kind, peer)
            .await
            .ok_or(SignalingError::NoProducerAvailable(kind))?;

        if !self.engine.can_consume(&producer_id, &capabilities).await? {
            return Err(SignalingError::IncompatibleCapabilities(producer_id));
        }

        let descriptor = self
            .engine
            .create_consumer(&transport_id, &producer_id, kind)
            .await?;

        session.write().await.add_consumer(
            descriptor.id.clone(),
            descriptor.kind,
            descriptor.producer_id.clone(),
            transport_id,
        );

        tracing::info!(
            peer = %peer,
            producer_peer = %owner,
            consumer = %descriptor.id,
            kind = %kind,
            "Consumer created"
        );

        Ok(ResponsePayload::Consumer(ConsumerCreated {
            consumer_id: descriptor.id,
            producer_id: descriptor.producer_id,
            kind: descriptor.kind,
            media_parameters: descriptor.media_parameters,
        }))
    }

    async fn resume_consumer(
        &self,
        session: &Arc<RwLock<PeerSession>>,
        consumer_id: ConsumerId,
    ) -> Result<ResponsePayload> {
        let owned = session
            .read()
            .await
            .consumers()
            .iter()
            .any(|c| c.id == consumer_id);
        if !owned {
            return Err(SignalingError::UnknownConsumer(consumer_id));
        }

        self.engine.resume_consumer(&consumer_id).await?;
        session.write().await.resume_consumer(&consumer_id);

        Ok(ResponsePayload::Ack { success: true })
    }

    async fn chat_message(&self, peer: PeerId, room: RoomId, text: String, sender: String) {
        if !self.rooms.contains(&room, peer).await {
            tracing::warn!(peer = %peer, room = %room, "Chat from non-member dropped");
            return;
        }

        let exclude = if self.chat_include_sender {
            None
        } else {
            Some(peer)
        };

        self.broadcast(
            &room,
            ServerEvent::ChatMessage {
                sender,
                text,
                room_id: room.clone(),
            },
            exclude,
        )
        .await;
    }

    async fn broadcast(&self, room: &RoomId, event: ServerEvent, exclude: Option<PeerId>) {
        for member in self.rooms.members(room).await {
            if Some(member) == exclude {
                continue;
            }
            if self.peers.push(member, event.clone()).await {
                self.stats.event_pushed();
            }
        }
    }

    /// Tear down a disconnected peer
    ///
    /// The single cleanup path for voluntary closes, network drops and idle
    /// timeouts. Removes the peer from the registries first so no concurrent
    /// operation can discover it mid-teardown, then closes every owned
    /// engine resource best-effort. Invoking it again is a no-op.
    pub async fn disconnect(&self, peer: PeerId) {
        let Some(handle) = self.peers.remove(peer).await else {
            return;
        };

        let room = self.rooms.leave_all(peer).await;
        let resources = handle.session.write().await.take_resources();
        let count = resources.len();

        for id in &resources {
            if let Err(e) = self.engine.close_resource(id).await {
                tracing::warn!(peer = %peer, resource = %id, error = %e, "Failed to close engine resource");
            }
        }

        tracing::info!(
            peer = %peer,
            room = room.as_ref().map(|r| r.0.as_str()).unwrap_or("-"),
            resources = count,
            "Peer disconnected, session cleaned up"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::LocalEngine;
    use crate::protocol::ProducerId;
    use serde_json::json;
    use std::time::Duration;

    fn build_handler(chat_include_sender: bool) -> (SignalingHandler, Arc<LocalEngine>) {
        let engine = Arc::new(LocalEngine::new());
        let adapter = EngineAdapter::new(engine.clone(), Duration::from_secs(1));
        let handler = SignalingHandler::new(
            Arc::new(RoomRegistry::new()),
            Arc::new(PeerMap::new()),
            adapter,
            chat_include_sender,
            Arc::new(ServerStats::new()),
        );
        (handler, engine)
    }

    async fn connect(
        handler: &SignalingHandler,
        id: u64,
    ) -> (Arc<RwLock<PeerSession>>, mpsc::Receiver<ServerEvent>) {
        let (tx, rx) = mpsc::channel(16);
        let session = handler.register_peer(PeerId(id), tx).await;
        (session, rx)
    }

    async fn request(
        handler: &SignalingHandler,
        session: &Arc<RwLock<PeerSession>>,
        req: ClientRequest,
    ) -> Result<ResponsePayload> {
        handler.handle_request(session, req).await.unwrap()
    }

    async fn join(handler: &SignalingHandler, session: &Arc<RwLock<PeerSession>>, room: &str) {
        let payload = request(
            handler,
            session,
            ClientRequest::JoinRoom {
                room_id: RoomId::new(room),
            },
        )
        .await
        .unwrap();
        assert!(matches!(payload, ResponsePayload::Ack { success: true }));
    }

    fn video_caps() -> ConsumerCapabilities {
        ConsumerCapabilities(json!({"codecs": [{"mimeType": "video/VP8"}]}))
    }

    async fn create_transport(
        handler: &SignalingHandler,
        session: &Arc<RwLock<PeerSession>>,
        producer_side: bool,
    ) -> TransportId {
        let req = if producer_side {
            ClientRequest::CreateProducerTransport
        } else {
            ClientRequest::CreateConsumerTransport {
                consumer_capabilities: video_caps(),
            }
        };

        match request(handler, session, req).await.unwrap() {
            ResponsePayload::Transport(t) => t.transport_id,
            other => panic!("unexpected payload: {:?}", other),
        }
    }

    async fn produce_video(
        handler: &SignalingHandler,
        session: &Arc<RwLock<PeerSession>>,
    ) -> ProducerId {
        let transport = create_transport(handler, session, true).await;

        request(
            handler,
            session,
            ClientRequest::ConnectTransport {
                transport_id: transport.clone(),
                dtls_parameters: DtlsParameters(json!({"role": "client"})),
            },
        )
        .await
        .unwrap();

        match request(
            handler,
            session,
            ClientRequest::Produce {
                transport_id: transport,
                kind: MediaKind::Video,
                media_parameters: MediaParameters(json!({"codecs": []})),
            },
        )
        .await
        .unwrap()
        {
            ResponsePayload::Produced { producer_id } => producer_id,
            other => panic!("unexpected payload: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_transport_before_join_is_rejected() {
        let (handler, engine) = build_handler(true);
        let (session, _rx) = connect(&handler, 1).await;

        let result = request(&handler, &session, ClientRequest::CreateProducerTransport).await;
        assert!(matches!(result, Err(SignalingError::NotInRoom)));

        // the precondition fired before the engine was touched
        assert_eq!(engine.open_resources(), 0);
        assert!(session.read().await.transports().is_empty());
    }

    #[tokio::test]
    async fn test_connect_unknown_transport_is_rejected() {
        let (handler, _engine) = build_handler(true);
        let (session, _rx) = connect(&handler, 1).await;
        join(&handler, &session, "r1").await;

        let result = request(
            &handler,
            &session,
            ClientRequest::ConnectTransport {
                transport_id: TransportId::new("foreign"),
                dtls_parameters: DtlsParameters(json!({})),
            },
        )
        .await;
        assert!(matches!(result, Err(SignalingError::UnknownTransport(_))));
    }

    #[tokio::test]
    async fn test_produce_fans_out_to_other_members_only() {
        let (handler, _engine) = build_handler(true);
        let (a, mut a_rx) = connect(&handler, 1).await;
        let (b, mut b_rx) = connect(&handler, 2).await;
        join(&handler, &a, "r1").await;
        join(&handler, &b, "r1").await;

        let producer_id = produce_video(&handler, &a).await;

        match b_rx.try_recv() {
            Ok(ServerEvent::NewProducer {
                producer_id: pushed,
                kind,
            }) => {
                assert_eq!(pushed, producer_id);
                assert_eq!(kind, MediaKind::Video);
            }
            other => panic!("expected newProducer push, got {:?}", other),
        }

        // the producing peer gets no notification about its own producer
        assert!(a_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_produce_does_not_reach_other_rooms() {
        let (handler, _engine) = build_handler(true);
        let (a, _a_rx) = connect(&handler, 1).await;
        let (c, mut c_rx) = connect(&handler, 3).await;
        join(&handler, &a, "r1").await;
        join(&handler, &c, "r2").await;

        produce_video(&handler, &a).await;
        assert!(c_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_consume_preconditions() {
        let (handler, _engine) = build_handler(true);
        let (b, _rx) = connect(&handler, 2).await;

        // before joining a room
        let result = request(
            &handler,
            &b,
            ClientRequest::Consume {
                kind: MediaKind::Video,
                consumer_capabilities: video_caps(),
            },
        )
        .await;
        assert!(matches!(result, Err(SignalingError::NotInRoom)));

        // in a room but no consumer transport yet
        join(&handler, &b, "r1").await;
        let result = request(
            &handler,
            &b,
            ClientRequest::Consume {
                kind: MediaKind::Video,
                consumer_capabilities: video_caps(),
            },
        )
        .await;
        assert!(matches!(result, Err(SignalingError::NoConsumerTransport)));
    }

    #[tokio::test]
    async fn test_consume_with_no_producer_reports_availability() {
        let (handler, _engine) = build_handler(true);
        let (b, _rx) = connect(&handler, 2).await;
        join(&handler, &b, "r1").await;
        create_transport(&handler, &b, false).await;

        let result = request(
            &handler,
            &b,
            ClientRequest::Consume {
                kind: MediaKind::Video,
                consumer_capabilities: video_caps(),
            },
        )
        .await;

        assert!(matches!(
            result,
            Err(SignalingError::NoProducerAvailable(MediaKind::Video))
        ));
        // nothing was registered on the session
        assert!(b.read().await.consumers().is_empty());
    }

    #[tokio::test]
    async fn test_consume_binds_to_discovered_producer() {
        let (handler, _engine) = build_handler(true);
        let (a, _a_rx) = connect(&handler, 1).await;
        let (b, _b_rx) = connect(&handler, 2).await;
        join(&handler, &a, "r1").await;
        join(&handler, &b, "r1").await;

        let producer_id = produce_video(&handler, &a).await;
        create_transport(&handler, &b, false).await;

        let payload = request(
            &handler,
            &b,
            ClientRequest::Consume {
                kind: MediaKind::Video,
                consumer_capabilities: video_caps(),
            },
        )
        .await
        .unwrap();

        let created = match payload {
            ResponsePayload::Consumer(c) => c,
            other => panic!("unexpected payload: {:?}", other),
        };
        assert_eq!(created.producer_id, producer_id);
        assert_eq!(created.kind, MediaKind::Video);

        // consumer is registered and starts paused
        let session = b.read().await;
        assert_eq!(session.consumers().len(), 1);
        assert!(session.consumers()[0].paused);
    }

    #[tokio::test]
    async fn test_consume_with_incompatible_capabilities() {
        let (handler, _engine) = build_handler(true);
        let (a, _a_rx) = connect(&handler, 1).await;
        let (b, _b_rx) = connect(&handler, 2).await;
        join(&handler, &a, "r1").await;
        join(&handler, &b, "r1").await;

        produce_video(&handler, &a).await;
        create_transport(&handler, &b, false).await;

        let audio_only = ConsumerCapabilities(json!({"codecs": [{"mimeType": "audio/opus"}]}));
        let result = request(
            &handler,
            &b,
            ClientRequest::Consume {
                kind: MediaKind::Video,
                consumer_capabilities: audio_only,
            },
        )
        .await;

        assert!(matches!(
            result,
            Err(SignalingError::IncompatibleCapabilities(_))
        ));
        assert!(b.read().await.consumers().is_empty());
    }

    #[tokio::test]
    async fn test_resume_consumer_flow() {
        let (handler, _engine) = build_handler(true);
        let (a, _a_rx) = connect(&handler, 1).await;
        let (b, _b_rx) = connect(&handler, 2).await;
        join(&handler, &a, "r1").await;
        join(&handler, &b, "r1").await;

        produce_video(&handler, &a).await;
        create_transport(&handler, &b, false).await;
        let created = match request(
            &handler,
            &b,
            ClientRequest::Consume {
                kind: MediaKind::Video,
                consumer_capabilities: video_caps(),
            },
        )
        .await
        .unwrap()
        {
            ResponsePayload::Consumer(c) => c,
            other => panic!("unexpected payload: {:?}", other),
        };

        let payload = request(
            &handler,
            &b,
            ClientRequest::ResumeConsumer {
                consumer_id: created.consumer_id,
            },
        )
        .await
        .unwrap();
        assert!(matches!(payload, ResponsePayload::Ack { success: true }));
        assert!(!b.read().await.consumers()[0].paused);

        // resuming a consumer this peer does not own
        let result = request(
            &handler,
            &b,
            ClientRequest::ResumeConsumer {
                consumer_id: ConsumerId::new("ghost"),
            },
        )
        .await;
        assert!(matches!(result, Err(SignalingError::UnknownConsumer(_))));
    }

    #[tokio::test]
    async fn test_chat_reaches_all_members_including_sender() {
        let (handler, _engine) = build_handler(true);
        let (a, mut a_rx) = connect(&handler, 1).await;
        let (b, mut b_rx) = connect(&handler, 2).await;
        let (c, mut c_rx) = connect(&handler, 3).await;
        join(&handler, &a, "r1").await;
        join(&handler, &b, "r1").await;
        join(&handler, &c, "r1").await;

        let response = handler
            .handle_request(
                &a,
                ClientRequest::ChatMessage {
                    room_id: RoomId::new("r1"),
                    text: "hi".into(),
                    sender: "A".into(),
                },
            )
            .await;
        assert!(response.is_none());

        for rx in [&mut a_rx, &mut b_rx, &mut c_rx] {
            match rx.try_recv() {
                Ok(ServerEvent::ChatMessage {
                    sender,
                    text,
                    room_id,
                }) => {
                    assert_eq!(sender, "A");
                    assert_eq!(text, "hi");
                    assert_eq!(room_id, RoomId::new("r1"));
                }
                other => panic!("expected chat push, got {:?}", other),
            }
            // exactly once
            assert!(rx.try_recv().is_err());
        }
    }

    #[tokio::test]
    async fn test_chat_sender_excluded_when_configured() {
        let (handler, _engine) = build_handler(false);
        let (a, mut a_rx) = connect(&handler, 1).await;
        let (b, mut b_rx) = connect(&handler, 2).await;
        join(&handler, &a, "r1").await;
        join(&handler, &b, "r1").await;

        handler
            .handle_request(
                &a,
                ClientRequest::ChatMessage {
                    room_id: RoomId::new("r1"),
                    text: "hi".into(),
                    sender: "A".into(),
                },
            )
            .await;

        assert!(a_rx.try_recv().is_err());
        assert!(matches!(
            b_rx.try_recv(),
            Ok(ServerEvent::ChatMessage { .. })
        ));
    }

    #[tokio::test]
    async fn test_chat_from_non_member_is_dropped() {
        let (handler, _engine) = build_handler(true);
        let (a, _a_rx) = connect(&handler, 1).await;
        let (b, mut b_rx) = connect(&handler, 2).await;
        join(&handler, &b, "r1").await;

        // a never joined r1
        handler
            .handle_request(
                &a,
                ClientRequest::ChatMessage {
                    room_id: RoomId::new("r1"),
                    text: "intruding".into(),
                    sender: "A".into(),
                },
            )
            .await;

        assert!(b_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_disconnect_cleans_up_everything() {
        let (handler, engine) = build_handler(true);
        let (a, _a_rx) = connect(&handler, 1).await;
        let (b, _b_rx) = connect(&handler, 2).await;
        join(&handler, &a, "r1").await;
        join(&handler, &b, "r1").await;

        produce_video(&handler, &a).await;
        assert!(engine.open_resources() > 0);

        handler.disconnect(PeerId(1)).await;

        assert!(!handler.rooms().contains(&RoomId::new("r1"), PeerId(1)).await);
        assert!(handler.peers().get(PeerId(1)).await.is_none());
        assert_eq!(engine.open_resources(), 0);
        assert!(a.read().await.is_disconnected());

        // a producer from a departed peer is no longer discoverable
        create_transport(&handler, &b, false).await;
        let result = request(
            &handler,
            &b,
            ClientRequest::Consume {
                kind: MediaKind::Video,
                consumer_capabilities: video_caps(),
            },
        )
        .await;
        assert!(matches!(
            result,
            Err(SignalingError::NoProducerAvailable(MediaKind::Video))
        ));
    }

    #[tokio::test]
    async fn test_disconnect_twice_is_safe() {
        let (handler, engine) = build_handler(true);
        let (a, _a_rx) = connect(&handler, 1).await;
        join(&handler, &a, "r1").await;
        produce_video(&handler, &a).await;

        handler.disconnect(PeerId(1)).await;
        handler.disconnect(PeerId(1)).await;

        assert_eq!(engine.open_resources(), 0);
        assert_eq!(handler.rooms().room_count().await, 0);
    }
}
