//! Tic-tac-toe rules and AI opponent.
//!
//! - [`Board`], [`Position`] and [`Player`] model the 3x3 grid.
//! - [`evaluate`] turns a board into a [`GameOutcome`].
//! - [`GameState`] applies moves, rejecting illegal ones without changing.
//! - [`choose_ai_move`] picks the AI's reply for a [`Difficulty`].
//! - [`AiMatch`] runs a local human-versus-AI game.
//!
//! # Example
//!
//! ```
//! use tictac_engine::{AiMatch, Difficulty, Player, Position};
//! use rand::SeedableRng;
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(0);
//! let mut game = AiMatch::start(Player::X, Difficulty::Impossible);
//! assert!(game.human_move(0));
//! assert_eq!(game.ai_move(&mut rng).unwrap(), Some(Position::Center));
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
mod ai;
mod contracts;
mod game;
mod position;
pub mod rules;
mod types;
mod vs_ai;

pub use action::{Move, MoveError};
pub use ai::{BoardFull, Difficulty, Plan, choose_ai_move, plan_impossible, plan_move};
pub use contracts::{
    GameNotOver, InBounds, LegalMove, PlayersTurn, Precondition, SquareIsEmpty, marks_balanced,
};
pub use game::GameState;
pub use position::Position;
pub use rules::{GameOutcome, WinningLine, evaluate};
pub use types::{Board, Player, Square};
pub use vs_ai::AiMatch;
