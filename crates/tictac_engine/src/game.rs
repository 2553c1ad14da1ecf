//! Mode-agnostic game state and move application.

use super::action::{Move, MoveError};
use super::contracts::{InBounds, LegalMove, Precondition, marks_balanced};
use super::rules::{GameOutcome, evaluate};
use super::{Board, Player, Position, Square};
use tracing::{debug, instrument, warn};

/// Complete game state: board, outcome and whose turn it is.
///
/// `current_player` is only meaningful while the outcome is
/// [`GameOutcome::InProgress`]; it stops flipping once the game ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    board: Board,
    outcome: GameOutcome,
    current_player: Player,
    history: Vec<Position>,
}

impl GameState {
    /// Creates a new game. X moves first.
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            outcome: GameOutcome::InProgress,
            current_player: Player::X,
            history: Vec::new(),
        }
    }

    /// Rebuilds a state from a board and the player to move.
    ///
    /// The outcome is recomputed from the board. History is unknown and
    /// left empty.
    pub fn from_parts(board: Board, current_player: Player) -> Self {
        let outcome = evaluate(&board);
        let state = Self {
            board,
            outcome,
            current_player,
            history: Vec::new(),
        };
        if !marks_balanced(&state) {
            warn!(counts = ?state.board.mark_counts(), "Rebuilt board has unbalanced marks");
        }
        state
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the current outcome.
    pub fn outcome(&self) -> GameOutcome {
        self.outcome
    }

    /// Returns the player to move.
    pub fn current_player(&self) -> Player {
        self.current_player
    }

    /// Returns positions in the order they were played.
    pub fn history(&self) -> &[Position] {
        &self.history
    }

    /// Returns the empty positions.
    pub fn valid_moves(&self) -> Vec<Position> {
        Position::valid_moves(&self.board)
    }

    /// Places a mark, checking every precondition first.
    ///
    /// On `Err` the state is unchanged. On success returns the new outcome;
    /// `current_player` flips only if the game is still in progress.
    #[instrument(skip(self), fields(player = %action.player, position = %action.position))]
    pub fn try_move(&mut self, action: Move) -> Result<GameOutcome, MoveError> {
        LegalMove::check(self, &action)?;

        self.board
            .set(action.position, Square::Occupied(action.player));
        self.history.push(action.position);
        self.outcome = evaluate(&self.board);
        if !self.outcome.is_over() {
            self.current_player = self.current_player.opponent();
        }

        debug!(outcome = %self.outcome, "Move applied");
        Ok(self.outcome)
    }

    /// Applies a move by raw cell index, silently ignoring illegal ones.
    ///
    /// Returns `true` if the move was applied. Rejections are logged at
    /// debug level and never surfaced to the player.
    pub fn apply_move(&mut self, index: usize, player: Player) -> bool {
        if let Err(e) = InBounds::check(self, &index) {
            debug!(index, error = %e, "Move ignored");
            return false;
        }
        let Some(position) = Position::from_index(index) else {
            return false;
        };
        match self.try_move(Move::new(player, position)) {
            Ok(_) => true,
            Err(e) => {
                debug!(index, %player, error = %e, "Move ignored");
                false
            }
        }
    }

    /// Replays moves from the initial state.
    pub fn replay(moves: &[Move]) -> Result<Self, MoveError> {
        let mut game = Self::new();
        for action in moves {
            game.try_move(*action)?;
        }
        Ok(game)
    }

    /// Replays positions from the initial state, alternating X and O.
    pub fn replay_positions(positions: &[Position]) -> Result<Self, MoveError> {
        let mut game = Self::new();
        for &position in positions {
            let player = game.current_player;
            game.try_move(Move::new(player, position))?;
        }
        Ok(game)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_flips_player() {
        let mut game = GameState::new();
        assert!(game.apply_move(4, Player::X));
        assert_eq!(game.current_player(), Player::O);
        assert_eq!(game.history(), &[Position::Center]);
    }

    #[test]
    fn test_rejected_moves_leave_state_unchanged() {
        let mut game = GameState::new();
        game.apply_move(0, Player::X);
        let before = game.clone();

        assert!(!game.apply_move(0, Player::O)); // occupied
        assert!(!game.apply_move(1, Player::X)); // wrong turn
        assert!(!game.apply_move(9, Player::O)); // out of bounds
        assert_eq!(game, before);
    }

    #[test]
    fn test_replay_moves() {
        let moves = [
            Move::new(Player::X, Position::Center),
            Move::new(Player::O, Position::TopLeft),
            Move::new(Player::X, Position::BottomRight),
        ];
        let game = GameState::replay(&moves).unwrap();
        assert_eq!(
            game.history(),
            &[Position::Center, Position::TopLeft, Position::BottomRight]
        );
        assert_eq!(game.current_player(), Player::O);
    }

    #[test]
    fn test_replay_stops_at_illegal_move() {
        let moves = [
            Move::new(Player::X, Position::Center),
            Move::new(Player::O, Position::Center),
        ];
        assert_eq!(
            GameState::replay(&moves),
            Err(MoveError::SquareOccupied(Position::Center))
        );

        let out_of_turn = [Move::new(Player::O, Position::Center)];
        assert_eq!(
            GameState::replay(&out_of_turn),
            Err(MoveError::WrongPlayer(Player::O))
        );
    }

    #[test]
    fn test_player_stops_flipping_after_win() {
        let moves = [0, 3, 1, 4, 2].map(|i| Position::from_index(i).unwrap());
        let game = GameState::replay_positions(&moves).unwrap();
        assert_eq!(game.outcome().winner(), Some(Player::X));
        assert_eq!(game.current_player(), Player::X);
    }

    #[test]
    fn test_from_parts_recomputes_outcome() {
        let board = Board::from([
            Some(Player::O),
            Some(Player::O),
            Some(Player::O),
            Some(Player::X),
            Some(Player::X),
            None,
            Some(Player::X),
            None,
            None,
        ]);
        let game = GameState::from_parts(board, Player::X);
        assert_eq!(game.outcome().winner(), Some(Player::O));
    }
}
