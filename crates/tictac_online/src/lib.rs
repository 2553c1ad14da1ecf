//! Online tic-tac-toe over a synchronized document store.
//!
//! The store is the single source of truth. An [`OnlineSession`] subscribes
//! to the game document, validates moves against the last snapshot it saw,
//! and merge-writes the recomputed state back. Its own writes only become
//! visible when the store notifies it.
//!
//! Writes are blind merges: two clients moving from the same stale snapshot
//! can lose an update, and the last writer wins.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod document;
mod error;
mod memory;
mod session;
mod store;

pub use document::{
    DEFAULT_GAME_ID, GAME_COLLECTION, GameDocument, MovePatch, SeatPatch, Winner, game_key,
};
pub use error::{SessionError, StoreError, StoreErrorKind};
pub use memory::MemoryStore;
pub use session::OnlineSession;
pub use store::{DocumentStore, Subscription, WriteMode};
