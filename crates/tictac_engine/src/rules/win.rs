//! Win detection logic for tic-tac-toe.

use crate::{Board, Player, Position, Square};
use serde::{Deserialize, Serialize};

/// One of the 8 index triples that ends the game when uniformly marked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "[usize; 3]", into = "[usize; 3]")]
pub struct WinningLine([Position; 3]);

impl WinningLine {
    /// All lines in check order: rows, then columns, then diagonals.
    pub const ALL: [WinningLine; 8] = [
        // Rows
        WinningLine([Position::TopLeft, Position::TopCenter, Position::TopRight]),
        WinningLine([Position::MiddleLeft, Position::Center, Position::MiddleRight]),
        WinningLine([Position::BottomLeft, Position::BottomCenter, Position::BottomRight]),
        // Columns
        WinningLine([Position::TopLeft, Position::MiddleLeft, Position::BottomLeft]),
        WinningLine([Position::TopCenter, Position::Center, Position::BottomCenter]),
        WinningLine([Position::TopRight, Position::MiddleRight, Position::BottomRight]),
        // Diagonals
        WinningLine([Position::TopLeft, Position::Center, Position::BottomRight]),
        WinningLine([Position::TopRight, Position::Center, Position::BottomLeft]),
    ];

    /// Returns the three positions of the line.
    pub fn positions(&self) -> [Position; 3] {
        self.0
    }

    /// Returns the three board indices of the line.
    pub fn indices(&self) -> [usize; 3] {
        self.0.map(Position::to_index)
    }

    /// Returns the player owning all three cells, if any.
    pub fn owner(&self, board: &Board) -> Option<Player> {
        let [a, b, c] = self.0;
        let sq = board.get(a);
        if sq != Square::Empty && sq == board.get(b) && sq == board.get(c) {
            sq.player()
        } else {
            None
        }
    }
}

/// Index triple that is not one of the 8 fixed lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("{:?} is not a winning line", indices)]
pub struct InvalidLine {
    /// The rejected indices.
    pub indices: [usize; 3],
}

impl TryFrom<[usize; 3]> for WinningLine {
    type Error = InvalidLine;

    /// Matches the indices against the fixed set, in any order.
    fn try_from(indices: [usize; 3]) -> Result<Self, Self::Error> {
        let mut sorted = indices;
        sorted.sort_unstable();
        Self::ALL
            .into_iter()
            .find(|line| {
                let mut own = line.indices();
                own.sort_unstable();
                own == sorted
            })
            .ok_or(InvalidLine { indices })
    }
}

impl From<WinningLine> for [usize; 3] {
    fn from(line: WinningLine) -> Self {
        line.indices()
    }
}

/// Returns the first completed line and its owner, in check order.
pub fn winning_line(board: &Board) -> Option<(Player, WinningLine)> {
    WinningLine::ALL
        .into_iter()
        .find_map(|line| line.owner(board).map(|player| (player, line)))
}

/// Checks if there is a winner on the board.
///
/// Returns `Some(player)` if the player has three in a row,
/// `None` otherwise.
pub fn check_winner(board: &Board) -> Option<Player> {
    winning_line(board).map(|(player, _)| player)
}

/// Finds the first empty position, in index order, that would complete a
/// line for `player`.
pub fn completing_move(board: &Board, player: Player) -> Option<Position> {
    Position::valid_moves(board).into_iter().find(|&pos| {
        let mut trial = board.clone();
        trial.set(pos, Square::Occupied(player));
        check_winner(&trial) == Some(player)
    })
}
