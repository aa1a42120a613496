//! Server-wide counters
//!
//! Shared across all connection tasks, so everything is atomic. Export to a
//! metrics system is out of scope; these exist for logging and tests.

use std::sync::atomic::{AtomicU64, Ordering};

/// Server-wide statistics
#[derive(Debug, Default)]
pub struct ServerStats {
    /// Connections admitted past the token check
    pub connections_accepted: AtomicU64,
    /// Upgrade attempts rejected at admission
    pub connections_rejected: AtomicU64,
    /// Currently connected peers
    pub connections_active: AtomicU64,
    /// Requests dispatched to the negotiation handler
    pub requests_handled: AtomicU64,
    /// Events queued on peer push channels
    pub events_pushed: AtomicU64,
}

impl ServerStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connection_opened(&self) {
        self.connections_accepted.fetch_add(1, Ordering::Relaxed);
        self.connections_active.fetch_add(1, Ordering::Relaxed);
    }

    pub fn connection_closed(&self) {
        self.connections_active.fetch_sub(1, Ordering::Relaxed);
    }

    pub fn connection_rejected(&self) {
        self.connections_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn request_handled(&self) {
        self.requests_handled.fetch_add(1, Ordering::Relaxed);
    }

    pub fn event_pushed(&self) {
        self.events_pushed.fetch_add(1, Ordering::Relaxed);
    }

    /// Point-in-time copy of all counters
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            connections_accepted: self.connections_accepted.load(Ordering::Relaxed),
            connections_rejected: self.connections_rejected.load(Ordering::Relaxed),
            connections_active: self.connections_active.load(Ordering::Relaxed),
            requests_handled: self.requests_handled.load(Ordering::Relaxed),
            events_pushed: self.events_pushed.load(Ordering::Relaxed),
        }
    }
}

/// Plain copy of [`ServerStats`] counters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub connections_accepted: u64,
    pub connections_rejected: u64,
    pub connections_active: u64,
    pub requests_handled: u64,
    pub events_pushed: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_counters() {
        let stats = ServerStats::new();

        stats.connection_opened();
        stats.connection_opened();
        stats.connection_closed();
        stats.connection_rejected();

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.connections_accepted, 2);
        assert_eq!(snapshot.connections_active, 1);
        assert_eq!(snapshot.connections_rejected, 1);
    }

    #[test]
    fn test_snapshot_is_detached() {
        let stats = ServerStats::new();
        let before = stats.snapshot();

        stats.request_handled();
        stats.event_pushed();

        assert_eq!(before.requests_handled, 0);
        assert_eq!(stats.snapshot().requests_handled, 1);
        assert_eq!(stats.snapshot().events_pushed, 1);
    }
}
