//! Move preconditions.
//!
//! Each check is a small predicate over the pre-move state. `LegalMove`
//! composes them in the order the game reports rejections.

use super::action::{Move, MoveError};
use super::game::GameState;
use super::position::Position;
use tracing::instrument;

/// A precondition over a state and a proposed action.
pub trait Precondition<S, A> {
    /// Checks the precondition, naming the violation on failure.
    fn check(state: &S, action: &A) -> Result<(), MoveError>;
}

/// Precondition: the game has not ended.
pub struct GameNotOver;

impl Precondition<GameState, Move> for GameNotOver {
    fn check(state: &GameState, _action: &Move) -> Result<(), MoveError> {
        if state.outcome().is_over() {
            Err(MoveError::GameOver)
        } else {
            Ok(())
        }
    }
}

/// Precondition: a raw cell index names one of the nine cells.
pub struct InBounds;

impl Precondition<GameState, usize> for InBounds {
    fn check(_state: &GameState, index: &usize) -> Result<(), MoveError> {
        match Position::from_index(*index) {
            Some(_) => Ok(()),
            None => Err(MoveError::OutOfBounds(*index)),
        }
    }
}

/// Precondition: the square at the move's position must be empty.
pub struct SquareIsEmpty;

impl Precondition<GameState, Move> for SquareIsEmpty {
    fn check(state: &GameState, action: &Move) -> Result<(), MoveError> {
        if state.board().is_empty(action.position) {
            Ok(())
        } else {
            Err(MoveError::SquareOccupied(action.position))
        }
    }
}

/// Precondition: it must be the player's turn.
pub struct PlayersTurn;

impl Precondition<GameState, Move> for PlayersTurn {
    fn check(state: &GameState, action: &Move) -> Result<(), MoveError> {
        if action.player == state.current_player() {
            Ok(())
        } else {
            Err(MoveError::WrongPlayer(action.player))
        }
    }
}

/// Composite precondition for placing a mark.
pub struct LegalMove;

impl Precondition<GameState, Move> for LegalMove {
    #[instrument(level = "trace", skip(state))]
    fn check(state: &GameState, action: &Move) -> Result<(), MoveError> {
        GameNotOver::check(state, action)?;
        SquareIsEmpty::check(state, action)?;
        PlayersTurn::check(state, action)?;
        Ok(())
    }
}

/// Board-level sanity check: the mark counts differ by at most one.
///
/// Holds for every board reachable by alternating play. Boards taken from
/// a shared document are not guaranteed to satisfy it.
pub fn marks_balanced(state: &GameState) -> bool {
    let (x, o) = state.board().mark_counts();
    x.abs_diff(o) <= 1
}
