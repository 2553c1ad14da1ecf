//! One client's view of a shared game.

use crate::document::{GameDocument, MovePatch, SeatPatch};
use crate::error::SessionError;
use crate::store::{DocumentStore, Subscription, WriteMode};
use serde::Serialize;
use std::sync::Arc;
use tictac_engine::{Player, Position};
use tracing::{debug, info, instrument, warn};

/// A client of an online game.
///
/// The session never trusts its own writes: [`snapshot`](Self::snapshot)
/// changes only when the store reports a new document.
pub struct OnlineSession {
    store: Arc<dyn DocumentStore>,
    key: String,
    subscription: Option<Subscription>,
    snapshot: Option<GameDocument>,
    seat: Option<Player>,
    reset: bool,
}

impl std::fmt::Debug for OnlineSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnlineSession")
            .field("key", &self.key)
            .field("connected", &self.subscription.is_some())
            .field("seat", &self.seat)
            .finish()
    }
}

impl OnlineSession {
    /// Creates a session for the document at `key`. Call
    /// [`connect`](Self::connect) before use.
    pub fn new(store: Arc<dyn DocumentStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            subscription: None,
            snapshot: None,
            seat: None,
            reset: false,
        }
    }

    /// Returns the last document the store reported.
    pub fn snapshot(&self) -> Option<&GameDocument> {
        self.snapshot.as_ref()
    }

    /// Returns the seat this client claimed.
    pub fn seat(&self) -> Option<Player> {
        self.seat
    }

    /// True once subscribed.
    pub fn is_connected(&self) -> bool {
        self.subscription.is_some()
    }

    /// Subscribes to the game document.
    #[instrument(skip(self), fields(key = %self.key))]
    pub async fn connect(&mut self) -> Result<(), SessionError> {
        let subscription = self.store.subscribe(&self.key).await?;
        self.subscription = Some(subscription);
        info!("Connected to online game");
        Ok(())
    }

    /// Waits for the next snapshot and adopts it.
    ///
    /// A missing document is initialized with the starting state, and the
    /// wait continues until the store reports it.
    #[instrument(skip(self), fields(key = %self.key))]
    pub async fn next_snapshot(&mut self) -> Result<&GameDocument, SessionError> {
        loop {
            let subscription = self
                .subscription
                .as_mut()
                .ok_or(SessionError::NotConnected)?;
            let Some(value) = subscription.next().await else {
                warn!("Subscription closed by store");
                return Err(SessionError::Disconnected);
            };
            match value {
                None => {
                    info!("No game document yet, initializing");
                    self.write(&GameDocument::initial(), WriteMode::Replace)
                        .await?;
                }
                Some(value) => {
                    let doc: GameDocument = serde_json::from_value(value)?;
                    return Ok(self.apply_snapshot(doc));
                }
            }
        }
    }

    /// Adopts `doc` as the last-seen state.
    pub fn apply_snapshot(&mut self, doc: GameDocument) -> &GameDocument {
        debug!(
            current_player = %doc.current_player,
            winner = ?doc.winner,
            "Snapshot received"
        );
        self.snapshot.insert(doc)
    }

    /// Claims `seat`.
    ///
    /// Returns `Ok(false)` without writing if no snapshot has arrived yet.
    /// A seat whose flag is already set can still be claimed while it is
    /// that seat's turn.
    #[instrument(skip(self), fields(key = %self.key))]
    pub async fn join(&mut self, seat: Player) -> Result<bool, SessionError> {
        let Some(doc) = &self.snapshot else {
            debug!("Join ignored before first snapshot");
            return Ok(false);
        };
        if doc.seat_taken(seat) && doc.current_player != seat {
            info!(%seat, "Seat already taken");
            return Err(SessionError::SeatTaken(seat));
        }

        self.write(&SeatPatch::claim(seat), WriteMode::Merge).await?;
        self.seat = Some(seat);
        self.reset = false;
        info!(%seat, "Joined game");
        Ok(true)
    }

    /// Proposes a move at cell `index`.
    ///
    /// Validated against the last snapshot; illegal proposals are ignored
    /// and return `Ok(None)`. A legal move merge-writes the full recomputed
    /// [`MovePatch`] and returns it.
    #[instrument(skip(self), fields(key = %self.key, seat = ?self.seat))]
    pub async fn propose_move(&mut self, index: usize) -> Result<Option<MovePatch>, SessionError> {
        let (Some(doc), Some(seat)) = (&self.snapshot, self.seat) else {
            debug!("Move ignored without snapshot or seat");
            return Ok(None);
        };
        let open = Position::from_index(index).is_some_and(|pos| doc.board.is_empty(pos));
        if doc.winner.is_some() || !open || doc.current_player != seat {
            debug!("Move ignored");
            return Ok(None);
        }

        let mut state = doc.game_state();
        if !state.apply_move(index, seat) {
            return Ok(None);
        }
        let patch = MovePatch::from_state(&state);
        self.write(&patch, WriteMode::Merge).await?;
        info!(index, outcome = %state.outcome(), "Move written");
        Ok(Some(patch))
    }

    /// Resets the shared game and gives up the local seat.
    ///
    /// Until the next join the status line reports the reset.
    #[instrument(skip(self), fields(key = %self.key))]
    pub async fn retry(&mut self) -> Result<(), SessionError> {
        self.write(&GameDocument::initial(), WriteMode::Replace)
            .await?;
        self.seat = None;
        self.reset = true;
        info!("Game reset");
        Ok(())
    }

    /// Resets the shared game and releases the subscription.
    ///
    /// The subscription is released even if the reset fails.
    #[instrument(skip(self), fields(key = %self.key))]
    pub async fn leave(mut self) -> Result<(), SessionError> {
        let reset = self.retry().await;
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
        reset
    }

    /// Status line for the player.
    pub fn status(&self) -> String {
        let Some(doc) = &self.snapshot else {
            return "Loading game...".to_string();
        };
        match (doc.winner, self.seat) {
            (Some(crate::Winner::Draw), _) => "It's a Draw!".to_string(),
            (Some(crate::Winner::X), _) => "Player X wins!".to_string(),
            (Some(crate::Winner::O), _) => "Player O wins!".to_string(),
            _ if doc.board.empty_positions().is_empty() => "It's a Draw!".to_string(),
            (None, None) if self.reset => "Game reset. Choose your side (X or O).".to_string(),
            (None, None) => "Choose your side to play (X or O).".to_string(),
            (None, Some(seat)) if seat == doc.current_player => format!("Your turn ({})", seat),
            (None, Some(_)) => format!("Waiting for Player {}...", doc.current_player),
        }
    }

    async fn write<T: Serialize>(&self, payload: &T, mode: WriteMode) -> Result<(), SessionError> {
        let value = serde_json::to_value(payload)?;
        self.store.write(&self.key, value, mode).await.map_err(|e| {
            warn!(error = %e, "Store write failed");
            SessionError::from(e)
        })
    }
}
