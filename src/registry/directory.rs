//! Producer directory
//!
//! Derived, read-through index over the producers owned by each room
//! member. Nothing is stored here: every query walks the authoritative
//! peer-owned collections at call time, so the view can never diverge from
//! them.

use std::sync::Arc;

use super::rooms::RoomRegistry;
use crate::protocol::{MediaKind, PeerId, ProducerId, RoomId};
use crate::session::PeerMap;

/// Read-through producer discovery scoped by room
#[derive(Clone)]
pub struct ProducerDirectory {
    rooms: Arc<RoomRegistry>,
    peers: Arc<PeerMap>,
}

impl ProducerDirectory {
    pub fn new(rooms: Arc<RoomRegistry>, peers: Arc<PeerMap>) -> Self {
        Self { rooms, peers }
    }

    /// Find an open producer of `kind` owned by any member of `room` other
    /// than `exclude`
    ///
    /// When several producers are eligible the first one encountered in the
    /// room's member iteration order wins; that order is arbitrary, and
    /// callers must not depend on which producer is chosen.
    pub async fn find_producer(
        &self,
        room: &RoomId,
        kind: MediaKind,
        exclude: PeerId,
    ) -> Option<(PeerId, ProducerId)> {
        for member in self.rooms.members(room).await {
            if member == exclude {
                continue;
            }

            let Some(session) = self.peers.session(member).await else {
                continue;
            };
            let session = session.read().await;

            if let Some(producer) = session
                .producers()
                .iter()
                .find(|p| p.kind == kind && !p.closed)
            {
                return Some((member, producer.id.clone()));
            }
        }

        None
    }

    /// Count the eligible producers of `kind` visible to `exclude` in `room`
    pub async fn count_producers(&self, room: &RoomId, kind: MediaKind, exclude: PeerId) -> usize {
        let mut count = 0;

        for member in self.rooms.members(room).await {
            if member == exclude {
                continue;
            }

            let Some(session) = self.peers.session(member).await else {
                continue;
            };
            let session = session.read().await;

            count += session
                .producers()
                .iter()
                .filter(|p| p.kind == kind && !p.closed)
                .count();
        }

        count
    }
}
