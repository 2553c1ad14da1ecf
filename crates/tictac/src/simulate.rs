//! AI-versus-AI batch runs.

use crate::orchestrator::{GameEvent, Orchestrator};
use crate::players::AiPlayer;
use anyhow::Result;
use derive_more::Display;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::time::Duration;
use tictac_engine::{Difficulty, GameOutcome, Player as Mark};
use tokio::sync::mpsc;
use tracing::{debug, info, instrument};

/// Results of a batch of games.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display)]
#[display("X wins: {}, O wins: {}, draws: {}", x_wins, o_wins, draws)]
pub struct Tally {
    /// Games X won.
    pub x_wins: u32,
    /// Games O won.
    pub o_wins: u32,
    /// Drawn games.
    pub draws: u32,
}

impl Tally {
    /// Counts one finished game.
    pub fn record(&mut self, outcome: GameOutcome) {
        match outcome.winner() {
            Some(Mark::X) => self.x_wins += 1,
            Some(Mark::O) => self.o_wins += 1,
            None => self.draws += 1,
        }
    }

    /// Total games counted.
    pub fn total(&self) -> u32 {
        self.x_wins + self.o_wins + self.draws
    }
}

/// Plays `games` games between an X and an O AI.
///
/// Game `n` seeds its players from `seed`, so a run is reproducible.
#[instrument]
pub async fn simulate(games: u32, x: Difficulty, o: Difficulty, seed: u64) -> Result<Tally> {
    let mut tally = Tally::default();

    for n in 0..games {
        let base = seed.wrapping_add(u64::from(n) * 2);
        let player_x = AiPlayer::new(
            format!("X ({})", x),
            Mark::X,
            x,
            Duration::ZERO,
            StdRng::seed_from_u64(base),
        );
        let player_o = AiPlayer::new(
            format!("O ({})", o),
            Mark::O,
            o,
            Duration::ZERO,
            StdRng::seed_from_u64(base.wrapping_add(1)),
        );

        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        let mut orchestrator = Orchestrator::new(Box::new(player_x), Box::new(player_o), event_tx);
        let outcome = orchestrator.run().await?;

        let mut moves = 0;
        while let Ok(event) = event_rx.try_recv() {
            if matches!(event, GameEvent::MoveMade { .. }) {
                moves += 1;
            }
        }
        debug!(game = n, moves, %outcome, "Simulated game");
        tally.record(outcome);
    }

    info!(%tally, "Simulation finished");
    Ok(tally)
}
