//! Tier policies, expressed as plans before any random choice is made.

use super::Difficulty;
use crate::rules::completing_move;
use crate::{Board, Player, Position};
use rand::Rng;
use rand::seq::SliceRandom;

/// What the AI intends to play.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Plan {
    /// A single forced choice.
    Take(Position),
    /// A uniform choice among these positions. Never empty.
    AnyOf(Vec<Position>),
}

impl Plan {
    /// Every position the plan might resolve to.
    pub fn options(&self) -> &[Position] {
        match self {
            Plan::Take(pos) => std::slice::from_ref(pos),
            Plan::AnyOf(positions) => positions,
        }
    }

    /// Resolves the plan to one position.
    ///
    /// Only an empty `AnyOf` resolves to `None`; the planners never build one
    /// for a board with an empty cell.
    pub fn resolve<R: Rng + ?Sized>(self, rng: &mut R) -> Option<Position> {
        match self {
            Plan::Take(pos) => Some(pos),
            Plan::AnyOf(positions) => positions.choose(rng).copied(),
        }
    }
}

/// Immediate win for `ai`, else an immediate block against `human`.
pub(super) fn tactical(board: &Board, ai: Player, human: Player) -> Option<Position> {
    completing_move(board, ai).or_else(|| completing_move(board, human))
}

/// Empty cells among `candidates`.
fn empty_among(board: &Board, candidates: &[Position]) -> Vec<Position> {
    candidates
        .iter()
        .copied()
        .filter(|&pos| board.is_empty(pos))
        .collect()
}

/// First non-empty candidate list wins, else every empty cell.
fn first_available(board: &Board, tiers: &[&[Position]]) -> Plan {
    tiers
        .iter()
        .map(|tier| empty_among(board, tier))
        .find(|open| !open.is_empty())
        .map(|open| match open.as_slice() {
            [only] => Plan::Take(*only),
            _ => Plan::AnyOf(open),
        })
        .unwrap_or_else(|| Plan::AnyOf(board.empty_positions()))
}

/// Positional plan for a non-tactical board. The board must have an empty
/// cell.
///
/// Easy and medium draw one number from `rng` to decide whether to move at
/// random; impossible draws nothing here.
pub(super) fn positional<R: Rng + ?Sized>(
    board: &Board,
    human: Player,
    difficulty: Difficulty,
    rng: &mut R,
) -> Plan {
    let open = board.empty_positions().len();
    let center: &[Position] = &[Position::Center];
    match difficulty {
        Difficulty::Easy => {
            if rng.gen_bool(difficulty.random_move_chance()) || open < 2 {
                Plan::AnyOf(board.empty_positions())
            } else {
                first_available(board, &[center, &Position::CORNERS])
            }
        }
        Difficulty::Medium => {
            if rng.gen_bool(difficulty.random_move_chance()) && open > 2 {
                Plan::AnyOf(board.empty_positions())
            } else {
                first_available(board, &[center, &Position::CORNERS, &Position::SIDES])
            }
        }
        Difficulty::Impossible => impossible(board, human),
    }
}

/// Center, then the corner opposite a human corner, then any corner, then
/// any side.
pub(super) fn impossible(board: &Board, human: Player) -> Plan {
    if board.is_empty(Position::Center) {
        return Plan::Take(Position::Center);
    }
    let opposite = Position::CORNERS.into_iter().find_map(|corner| {
        corner
            .opposite_corner()
            .filter(|&across| board.is_marked_by(corner, human) && board.is_empty(across))
    });
    match opposite {
        Some(across) => Plan::Take(across),
        None => first_available(board, &[&Position::CORNERS, &Position::SIDES]),
    }
}
