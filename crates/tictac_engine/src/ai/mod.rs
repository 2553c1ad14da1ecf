//! AI move selection.
//!
//! Every tier first takes an immediate win, then blocks an immediate loss.
//! Only when neither exists does the tier's positional policy apply:
//!
//! - **Easy** moves at random 70% of the time (always, with one cell left),
//!   otherwise center then a random corner.
//! - **Medium** moves at random 30% of the time while more than two cells
//!   remain, otherwise center, a random corner, then a random side.
//! - **Impossible** never rolls: center, the corner opposite a human corner,
//!   a random corner, then a random side.
//!
//! Whatever a tier leaves undecided falls back to a random empty cell. This
//! is a heuristic, not a search; the impossible tier can still be forked.

mod difficulty;
mod plan;

pub use difficulty::Difficulty;
pub use plan::Plan;

use crate::{Board, Player, Position};
use rand::Rng;
use tracing::{debug, instrument};

/// The AI was asked to move on a board with no empty cell.
///
/// Callers must not request a move once the game is over; this is a logic
/// error rather than a recoverable condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("AI asked to move on a full board")]
pub struct BoardFull;

/// Computes the AI's plan without resolving its random choice.
///
/// Easy and medium may draw from `rng` to decide between random and
/// positional play.
#[instrument(level = "debug", skip(board, rng))]
pub fn plan_move<R: Rng + ?Sized>(
    board: &Board,
    ai: Player,
    human: Player,
    difficulty: Difficulty,
    rng: &mut R,
) -> Result<Plan, BoardFull> {
    if board.empty_positions().is_empty() {
        return Err(BoardFull);
    }
    if let Some(pos) = plan::tactical(board, ai, human) {
        debug!(position = %pos, "Tactical move");
        return Ok(Plan::Take(pos));
    }
    Ok(plan::positional(board, human, difficulty, rng))
}

/// Deterministic plan of the impossible tier, for enumerating its choices.
pub fn plan_impossible(board: &Board, ai: Player, human: Player) -> Result<Plan, BoardFull> {
    if board.empty_positions().is_empty() {
        return Err(BoardFull);
    }
    Ok(plan::tactical(board, ai, human)
        .map(Plan::Take)
        .unwrap_or_else(|| plan::impossible(board, human)))
}

/// Chooses the AI's move. Always returns an empty cell.
#[instrument(skip(board, rng))]
pub fn choose_ai_move<R: Rng + ?Sized>(
    board: &Board,
    ai: Player,
    human: Player,
    difficulty: Difficulty,
    rng: &mut R,
) -> Result<Position, BoardFull> {
    let plan = plan_move(board, ai, human, difficulty, rng)?;
    let choice = plan
        .resolve(rng)
        .or_else(|| {
            let open = board.empty_positions();
            rand::seq::SliceRandom::choose(open.as_slice(), rng).copied()
        })
        .ok_or(BoardFull)?;
    debug!(position = %choice, "AI chose position");
    Ok(choice)
}
