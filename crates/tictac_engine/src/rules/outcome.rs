//! Outcome evaluation.

use super::{WinningLine, is_full, winning_line};
use crate::{Board, Player};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Result of evaluating a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameOutcome {
    /// No line complete and at least one empty cell.
    InProgress,
    /// A player completed a line.
    Win {
        /// The player owning the line.
        player: Player,
        /// The completed line.
        line: WinningLine,
    },
    /// Board full with no completed line.
    Draw,
}

impl GameOutcome {
    /// Returns true once the game has ended.
    pub fn is_over(&self) -> bool {
        !matches!(self, GameOutcome::InProgress)
    }

    /// Returns the winner if there is one.
    pub fn winner(&self) -> Option<Player> {
        match self {
            GameOutcome::Win { player, .. } => Some(*player),
            _ => None,
        }
    }

    /// Returns the completed line if there is one.
    pub fn line(&self) -> Option<WinningLine> {
        match self {
            GameOutcome::Win { line, .. } => Some(*line),
            _ => None,
        }
    }
}

impl std::fmt::Display for GameOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameOutcome::InProgress => write!(f, "In progress"),
            GameOutcome::Win { player, .. } => write!(f, "Player {} wins!", player),
            GameOutcome::Draw => write!(f, "It's a Draw!"),
        }
    }
}

/// Evaluates a board.
///
/// Lines are checked in fixed order and the first complete one wins. A win
/// takes precedence over a full board. Board legality is not re-validated.
#[instrument(level = "trace", skip(board))]
pub fn evaluate(board: &Board) -> GameOutcome {
    if let Some((player, line)) = winning_line(board) {
        GameOutcome::Win { player, line }
    } else if is_full(board) {
        GameOutcome::Draw
    } else {
        GameOutcome::InProgress
    }
}
