//! Room membership registry
//!
//! Pure membership bookkeeping: room id to member set, no media state.
//! Rooms exist exactly while they have members: created on first join,
//! removed when the last member leaves. Every operation is infallible and
//! idempotent; a `leave` for an unknown room/peer pair is a silent no-op.

use std::collections::{HashMap, HashSet};

use tokio::sync::RwLock;

use crate::protocol::{PeerId, RoomId};

/// Registry of rooms and their member peers
///
/// Thread-safe via `RwLock`; a single room's membership mutation is atomic
/// with respect to concurrent joins/leaves.
#[derive(Default)]
pub struct RoomRegistry {
    rooms: RwLock<HashMap<RoomId, HashSet<PeerId>>>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a peer to a room, creating the room on demand
    ///
    /// Idempotent: re-joining the current room changes nothing. A peer is a
    /// member of at most one room, so joining a different room removes the
    /// peer from its previous room first (dropping it if emptied).
    pub async fn join(&self, room: &RoomId, peer: PeerId) {
        let mut rooms = self.rooms.write().await;

        // Enforce the single-room invariant before inserting.
        rooms.retain(|id, members| {
            if id != room {
                members.remove(&peer);
            }
            !members.is_empty()
        });

        let members = rooms.entry(room.clone()).or_default();
        if members.insert(peer) {
            tracing::info!(room = %room, peer = %peer, members = members.len(), "Peer joined room");
        }
    }

    /// Remove a peer from a room, dropping the room if it empties
    pub async fn leave(&self, room: &RoomId, peer: PeerId) {
        let mut rooms = self.rooms.write().await;

        if let Some(members) = rooms.get_mut(room) {
            if members.remove(&peer) {
                tracing::info!(room = %room, peer = %peer, members = members.len(), "Peer left room");
            }
            if members.is_empty() {
                rooms.remove(room);
                tracing::debug!(room = %room, "Room removed (empty)");
            }
        }
    }

    /// Remove a peer from whichever room it is in, returning that room
    pub async fn leave_all(&self, peer: PeerId) -> Option<RoomId> {
        let mut rooms = self.rooms.write().await;

        let room = rooms
            .iter()
            .find(|(_, members)| members.contains(&peer))
            .map(|(id, _)| id.clone())?;

        if let Some(members) = rooms.get_mut(&room) {
            members.remove(&peer);
            if members.is_empty() {
                rooms.remove(&room);
            }
        }

        tracing::info!(room = %room, peer = %peer, "Peer left room");
        Some(room)
    }

    /// Snapshot of the current member set
    ///
    /// Copy semantics: the returned set does not track later joins/leaves.
    /// Iteration order is the internal set order, which is arbitrary.
    pub async fn members(&self, room: &RoomId) -> Vec<PeerId> {
        self.rooms
            .read()
            .await
            .get(room)
            .map(|members| members.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Whether a peer is currently a member of a room
    pub async fn contains(&self, room: &RoomId, peer: PeerId) -> bool {
        self.rooms
            .read()
            .await
            .get(room)
            .is_some_and(|members| members.contains(&peer))
    }

    /// Number of rooms that currently have members
    pub async fn room_count(&self) -> usize {
        self.rooms.read().await.len()
    }
}
