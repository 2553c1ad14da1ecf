//! Error types for the store seam and the online session.

use derive_more::{Display, Error, From};
use tictac_engine::Player;
use tracing::instrument;

/// Broad class of store failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum StoreErrorKind {
    /// The backend could not be reached.
    #[display("unavailable")]
    Unavailable,
    /// A payload could not be applied to the stored document.
    #[display("invalid write")]
    InvalidWrite,
}

/// Store error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Store error ({}): {} at {}:{}", kind, message, file, line)]
pub struct StoreError {
    /// Failure class.
    pub kind: StoreErrorKind,
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl StoreError {
    /// Creates a new store error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(kind: StoreErrorKind, message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// Shorthand for an [`StoreErrorKind::Unavailable`] error.
    #[track_caller]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::Unavailable, message)
    }
}

/// Failures of an online session.
///
/// None of these are fatal: the session's snapshot and seat are unchanged
/// and the user may retry the action.
#[derive(Debug, Display, Error, From)]
pub enum SessionError {
    /// The store rejected a read, write or subscription.
    #[display("{}", _0)]
    #[from]
    Store(StoreError),

    /// The stored document does not match the game schema.
    #[display("Malformed game document: {}", _0)]
    #[from]
    Document(serde_json::Error),

    /// Another client holds the seat.
    #[display("Player {} is already taken.", _0)]
    SeatTaken(#[error(not(source))] Player),

    /// [`OnlineSession::connect`](crate::OnlineSession::connect) has not run.
    #[display("Not connected to a game")]
    NotConnected,

    /// The store dropped the subscription.
    #[display("Lost connection to the game")]
    Disconnected,
}
