//! Game orchestration between players.

use crate::players::Player;
use anyhow::{Result, anyhow};
use tictac_engine::{GameOutcome, GameState, Move, Player as Mark, Position};
use tokio::sync::mpsc;
use tracing::{debug, info, instrument};

/// Messages sent from orchestrator to the front end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    /// Board redrawn after a move.
    StateChanged(String),
    /// A player was asked for a move.
    Thinking {
        /// Mark of the player to move.
        player: Mark,
    },
    /// Move was made.
    MoveMade {
        /// Mark that moved.
        player: Mark,
        /// Where it moved.
        position: Position,
    },
    /// Game ended.
    GameOver {
        /// Final outcome.
        outcome: GameOutcome,
    },
}

/// Alternates two players until the game ends.
pub struct Orchestrator {
    game: GameState,
    player_x: Box<dyn Player>,
    player_o: Box<dyn Player>,
    event_tx: mpsc::UnboundedSender<GameEvent>,
}

impl Orchestrator {
    /// Creates a new orchestrator.
    pub fn new(
        player_x: Box<dyn Player>,
        player_o: Box<dyn Player>,
        event_tx: mpsc::UnboundedSender<GameEvent>,
    ) -> Self {
        Self {
            game: GameState::new(),
            player_x,
            player_o,
            event_tx,
        }
    }

    /// Returns the game state.
    pub fn game(&self) -> &GameState {
        &self.game
    }

    /// Runs the game loop and returns the final outcome.
    ///
    /// A player answering with an occupied cell is an error.
    #[instrument(skip(self), fields(x = %self.player_x.name(), o = %self.player_o.name()))]
    pub async fn run(&mut self) -> Result<GameOutcome> {
        info!("Starting game orchestration");

        loop {
            let outcome = self.game.outcome();
            if outcome.is_over() {
                info!(%outcome, moves = self.game.history().len(), "Game over");
                self.event_tx.send(GameEvent::GameOver { outcome })?;
                return Ok(outcome);
            }

            let mark = self.game.current_player();
            let player = match mark {
                Mark::X => &mut self.player_x,
                Mark::O => &mut self.player_o,
            };

            self.event_tx.send(GameEvent::Thinking { player: mark })?;
            debug!(player = %player.name(), "Waiting for move");
            let position = player.get_move(&self.game).await?;

            self.game
                .try_move(Move::new(mark, position))
                .map_err(|e| anyhow!("{} made an illegal move: {}", player.name(), e))?;

            self.event_tx.send(GameEvent::MoveMade {
                player: mark,
                position,
            })?;
            self.event_tx
                .send(GameEvent::StateChanged(self.game.board().display()))?;
        }
    }
}
