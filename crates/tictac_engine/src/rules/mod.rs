//! Game rules for tic-tac-toe.
//!
//! This module contains pure functions for evaluating board state.
//! Rules are separated from board storage so the move contracts, the AI
//! policy and the online document can all share them.

pub mod draw;
pub mod outcome;
pub mod win;

pub use draw::is_full;
pub use outcome::{GameOutcome, evaluate};
pub use win::{InvalidLine, WinningLine, check_winner, completing_move, winning_line};
