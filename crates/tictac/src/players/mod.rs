//! Player trait and implementations.

mod ai;
mod human;

pub use ai::AiPlayer;
pub use human::{HumanPlayer, Quit};

use anyhow::Result;
use tictac_engine::{GameState, Position};

/// Trait for players that can make moves.
#[async_trait::async_trait]
pub trait Player: Send {
    /// Gets a move from this player.
    ///
    /// The returned position must be empty on the board of `game`.
    async fn get_move(&mut self, game: &GameState) -> Result<Position>;

    /// Returns the player's display name.
    fn name(&self) -> &str;
}
