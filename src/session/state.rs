//! Peer session state machine
//!
//! Tracks one connected peer from admission to teardown: its negotiation
//! phase, current room, and the transports, producers and consumers it owns.
//! Every resource referenced here belongs exclusively to this peer; other
//! components read the session through its accessors but never mutate it.

use std::time::Instant;

use crate::engine::TransportDirection;
use crate::protocol::{ConsumerId, MediaKind, PeerId, ProducerId, RoomId, TransportId};

/// Negotiation phase of a peer
///
/// Admission happens during the socket handshake, so a session only exists
/// for peers that already presented a token; the machine therefore starts
/// at `Connected`. Phases advance monotonically as milestones are reached;
/// request preconditions are checked against room membership and resource
/// ownership rather than the phase alone, so a peer both producing and
/// consuming is simply reported at its most recent milestone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeerPhase {
    /// Admitted, not in any room yet
    Connected,
    /// Joined a room
    InRoom,
    /// At least one transport created, negotiation in progress
    Negotiating,
    /// Owns at least one producer
    Producing,
    /// Owns at least one consumer
    Consuming,
    /// Teardown ran; terminal
    Disconnected,
}

/// Connection state of a negotiated transport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportConnState {
    New,
    Connecting,
    Connected,
    Failed,
    Closed,
}

/// A transport owned by this peer
#[derive(Debug, Clone)]
pub struct TransportRecord {
    pub id: TransportId,
    pub direction: TransportDirection,
    pub state: TransportConnState,
}

/// A producer owned by this peer
#[derive(Debug, Clone)]
pub struct ProducerRecord {
    pub id: ProducerId,
    pub kind: MediaKind,
    pub transport_id: TransportId,
    pub closed: bool,
}

/// A consumer owned by this peer, bound to another peer's producer
#[derive(Debug, Clone)]
pub struct ConsumerRecord {
    pub id: ConsumerId,
    pub kind: MediaKind,
    pub producer_id: ProducerId,
    pub transport_id: TransportId,
    pub paused: bool,
}

/// Complete per-peer session state
#[derive(Debug)]
pub struct PeerSession {
    id: PeerId,
    phase: PeerPhase,
    room: Option<RoomId>,
    /// Owned transports, in creation order
    transports: Vec<TransportRecord>,
    producers: Vec<ProducerRecord>,
    consumers: Vec<ConsumerRecord>,
    connected_at: Instant,
}

impl PeerSession {
    pub fn new(id: PeerId) -> Self {
        Self {
            id,
            phase: PeerPhase::Connected,
            room: None,
            transports: Vec::new(),
            producers: Vec::new(),
            consumers: Vec::new(),
            connected_at: Instant::now(),
        }
    }

    pub fn id(&self) -> PeerId {
        self.id
    }

    pub fn phase(&self) -> PeerPhase {
        self.phase
    }

    pub fn room(&self) -> Option<&RoomId> {
        self.room.as_ref()
    }

    pub fn duration(&self) -> std::time::Duration {
        self.connected_at.elapsed()
    }

    /// Record a room join (or a switch to a different room)
    pub fn join_room(&mut self, room: RoomId) {
        self.room = Some(room);
        if self.phase == PeerPhase::Connected {
            self.phase = PeerPhase::InRoom;
        }
    }

    /// Register a freshly created transport
    pub fn add_transport(&mut self, id: TransportId, direction: TransportDirection) {
        self.transports.push(TransportRecord {
            id,
            direction,
            state: TransportConnState::New,
        });
        if self.phase == PeerPhase::InRoom {
            self.phase = PeerPhase::Negotiating;
        }
    }

    pub fn transports(&self) -> &[TransportRecord] {
        &self.transports
    }

    /// Look up an owned transport by id
    pub fn transport(&self, id: &TransportId) -> Option<&TransportRecord> {
        self.transports.iter().find(|t| &t.id == id)
    }

    /// Update an owned transport's connection state; false if not owned
    pub fn set_transport_state(&mut self, id: &TransportId, state: TransportConnState) -> bool {
        match self.transports.iter_mut().find(|t| &t.id == id) {
            Some(transport) => {
                transport.state = state;
                true
            }
            None => false,
        }
    }

    /// First consumer-direction transport, in creation order
    pub fn first_recv_transport(&self) -> Option<&TransportRecord> {
        self.transports
            .iter()
            .find(|t| t.direction == TransportDirection::Recv)
    }

    /// Register a producer created on one of this peer's transports
    pub fn add_producer(&mut self, id: ProducerId, kind: MediaKind, transport_id: TransportId) {
        self.producers.push(ProducerRecord {
            id,
            kind,
            transport_id,
            closed: false,
        });
        self.phase = PeerPhase::Producing;
    }

    pub fn producers(&self) -> &[ProducerRecord] {
        &self.producers
    }

    /// Register a consumer; consumers start paused until resumed
    pub fn add_consumer(
        &mut self,
        id: ConsumerId,
        kind: MediaKind,
        producer_id: ProducerId,
        transport_id: TransportId,
    ) {
        self.consumers.push(ConsumerRecord {
            id,
            kind,
            producer_id,
            transport_id,
            paused: true,
        });
        self.phase = PeerPhase::Consuming;
    }

    pub fn consumers(&self) -> &[ConsumerRecord] {
        &self.consumers
    }

    /// Mark an owned consumer as resumed; false if not owned
    pub fn resume_consumer(&mut self, id: &ConsumerId) -> bool {
        match self.consumers.iter_mut().find(|c| &c.id == id) {
            Some(consumer) => {
                consumer.paused = false;
                true
            }
            None => false,
        }
    }

    pub fn is_disconnected(&self) -> bool {
        self.phase == PeerPhase::Disconnected
    }

    /// Drain every owned resource id for teardown and enter the terminal
    /// phase
    ///
    /// Consumers come first, then producers, then transports, so media flow
    /// stops before its endpoints disappear. A second call yields nothing,
    /// which keeps teardown idempotent.
    pub fn take_resources(&mut self) -> Vec<String> {
        let mut ids = Vec::with_capacity(
            self.consumers.len() + self.producers.len() + self.transports.len(),
        );

        ids.extend(self.consumers.drain(..).map(|c| c.id.0));
        ids.extend(self.producers.drain(..).map(|p| p.id.0));
        ids.extend(self.transports.drain(..).map(|t| t.id.0));

        self.room = None;
        self.phase = PeerPhase::Disconnected;

        ids
    }
}
