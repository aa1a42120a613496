//! Connected-peer table
//!
//! Maps peer ids to their session state and push channel. The session is
//! written only by the owning connection task; the `Arc<RwLock<_>>` exists
//! so the producer directory and fan-out paths can read it concurrently.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{mpsc, RwLock};

use super::state::PeerSession;
use crate::protocol::{PeerId, ServerEvent};

/// A connected peer's shared session and its outbound push channel
#[derive(Clone)]
pub struct PeerHandle {
    pub session: Arc<RwLock<PeerSession>>,
    pusher: mpsc::Sender<ServerEvent>,
}

impl PeerHandle {
    pub fn new(session: Arc<RwLock<PeerSession>>, pusher: mpsc::Sender<ServerEvent>) -> Self {
        Self { session, pusher }
    }

    /// Queue an event for this peer without blocking
    ///
    /// A full or closed channel drops the event; pushes are best-effort and
    /// must never stall the sender's request handling.
    pub fn push(&self, event: ServerEvent) -> bool {
        match self.pusher.try_send(event) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!("Peer push channel full, dropping event");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => false,
        }
    }
}

/// Table of all currently connected peers
#[derive(Default)]
pub struct PeerMap {
    peers: RwLock<HashMap<PeerId, PeerHandle>>,
}

impl PeerMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, id: PeerId, handle: PeerHandle) {
        self.peers.write().await.insert(id, handle);
    }

    /// Remove and return a peer's handle; `None` on the second call
    pub async fn remove(&self, id: PeerId) -> Option<PeerHandle> {
        self.peers.write().await.remove(&id)
    }

    pub async fn get(&self, id: PeerId) -> Option<PeerHandle> {
        self.peers.read().await.get(&id).cloned()
    }

    /// Shared session of a connected peer
    pub async fn session(&self, id: PeerId) -> Option<Arc<RwLock<PeerSession>>> {
        self.peers.read().await.get(&id).map(|h| h.session.clone())
    }

    /// Queue an event for a peer; false if the peer is gone or backed up
    pub async fn push(&self, id: PeerId, event: ServerEvent) -> bool {
        match self.peers.read().await.get(&id) {
            Some(handle) => handle.push(event),
            None => false,
        }
    }

    pub async fn len(&self) -> usize {
        self.peers.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.peers.read().await.is_empty()
    }
}
