//! AI player backed by the engine's move policy.

use super::Player;
use anyhow::Result;
use derive_new::new;
use rand::rngs::StdRng;
use std::time::Duration;
use tictac_engine::{Difficulty, GameState, Player as Mark, Position, choose_ai_move};
use tracing::{debug, instrument};

/// AI opponent playing one mark at a fixed difficulty.
#[derive(Debug, new)]
pub struct AiPlayer {
    name: String,
    mark: Mark,
    difficulty: Difficulty,
    /// Pause before answering. Zero skips the sleep.
    delay: Duration,
    rng: StdRng,
}

#[async_trait::async_trait]
impl Player for AiPlayer {
    #[instrument(skip(self, game), fields(ai = %self.name, difficulty = %self.difficulty))]
    async fn get_move(&mut self, game: &GameState) -> Result<Position> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let position = choose_ai_move(
            game.board(),
            self.mark,
            self.mark.opponent(),
            self.difficulty,
            &mut self.rng,
        )?;
        debug!(%position, "AI chose position");
        Ok(position)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
