//! Shared registries
//!
//! Process-wide state shared by all peer tasks: room membership and the
//! derived producer directory. Both are injectable services guarded by a
//! single locking discipline (`tokio::sync::RwLock` over plain maps), never
//! ambient globals, so they test in isolation with fake peers.

pub mod directory;
pub mod rooms;

pub use directory::ProducerDirectory;
pub use rooms::RoomRegistry;
