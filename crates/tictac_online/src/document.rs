//! Shared game document schema.
//!
//! Field names match the stored JSON exactly:
//!
//! ```json
//! {
//!   "board": ["X", null, null, null, "O", null, null, null, null],
//!   "currentPlayer": "X",
//!   "winner": null,
//!   "winningLine": null,
//!   "playerX_taken": true,
//!   "playerO_taken": true
//! }
//! ```

use serde::{Deserialize, Serialize};
use tictac_engine::{Board, GameOutcome, GameState, Player, WinningLine};

/// Collection holding game documents.
pub const GAME_COLLECTION: &str = "ticTacToeGames";

/// Id of the single shared game.
pub const DEFAULT_GAME_ID: &str = "ticTacToe_default_game";

/// Store key for a game id.
pub fn game_key(game_id: &str) -> String {
    format!("{}/{}", GAME_COLLECTION, game_id)
}

/// Recorded result of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Winner {
    /// X completed a line.
    X,
    /// O completed a line.
    O,
    /// Board full with no line.
    Draw,
}

impl Winner {
    /// Maps an outcome to what the document records, `None` while live.
    pub fn from_outcome(outcome: GameOutcome) -> Option<Self> {
        match outcome {
            GameOutcome::InProgress => None,
            GameOutcome::Win { player: Player::X, .. } => Some(Winner::X),
            GameOutcome::Win { player: Player::O, .. } => Some(Winner::O),
            GameOutcome::Draw => Some(Winner::Draw),
        }
    }
}

/// The full shared state of an online game.
///
/// Missing fields take their initial values, so a document that only
/// carries a seat flag still decodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameDocument {
    /// The board.
    pub board: Board,
    /// Player to move.
    #[serde(rename = "currentPlayer")]
    pub current_player: Player,
    /// Result, once the game is over.
    pub winner: Option<Winner>,
    /// Completed line, if any.
    #[serde(rename = "winningLine")]
    pub winning_line: Option<WinningLine>,
    /// Seat X has been claimed.
    #[serde(rename = "playerX_taken")]
    pub player_x_taken: bool,
    /// Seat O has been claimed.
    #[serde(rename = "playerO_taken")]
    pub player_o_taken: bool,
}

impl GameDocument {
    /// The state every game starts (and restarts) from.
    pub fn initial() -> Self {
        Self {
            board: Board::new(),
            current_player: Player::X,
            winner: None,
            winning_line: None,
            player_x_taken: false,
            player_o_taken: false,
        }
    }

    /// Whether `seat` has been claimed.
    pub fn seat_taken(&self, seat: Player) -> bool {
        match seat {
            Player::X => self.player_x_taken,
            Player::O => self.player_o_taken,
        }
    }

    /// Rebuilds the engine state this document describes.
    pub fn game_state(&self) -> GameState {
        GameState::from_parts(self.board.clone(), self.current_player)
    }
}

impl Default for GameDocument {
    fn default() -> Self {
        Self::initial()
    }
}

/// Merge payload written after a move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovePatch {
    /// Board after the move.
    pub board: Board,
    /// Player to move next.
    #[serde(rename = "currentPlayer")]
    pub current_player: Player,
    /// Result, `null` while the game continues.
    pub winner: Option<Winner>,
    /// Completed line, `null` unless someone won.
    #[serde(rename = "winningLine")]
    pub winning_line: Option<WinningLine>,
}

impl MovePatch {
    /// Captures the fields a move recomputes.
    pub fn from_state(state: &GameState) -> Self {
        let outcome = state.outcome();
        Self {
            board: state.board().clone(),
            current_player: state.current_player(),
            winner: Winner::from_outcome(outcome),
            winning_line: outcome.line(),
        }
    }
}

/// Merge payload claiming one seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeatPatch {
    /// Claims X.
    #[serde(rename = "playerX_taken")]
    X(bool),
    /// Claims O.
    #[serde(rename = "playerO_taken")]
    O(bool),
}

impl SeatPatch {
    /// Claim for `seat`.
    pub fn claim(seat: Player) -> Self {
        match seat {
            Player::X => SeatPatch::X(true),
            Player::O => SeatPatch::O(true),
        }
    }
}
