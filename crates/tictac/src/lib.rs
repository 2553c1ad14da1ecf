//! Terminal front end for tictac.
//!
//! Local games against the AI, a two-seat online table over an in-memory
//! store, and AI-versus-AI simulation.

#![warn(missing_docs)]

pub mod cli;
pub mod config;
pub mod online;
pub mod orchestrator;
pub mod play;
pub mod players;
pub mod simulate;

pub use config::{AppConfig, ConfigError};
pub use online::OnlineTable;
pub use orchestrator::{GameEvent, Orchestrator};
pub use play::LocalGame;
pub use players::{AiPlayer, HumanPlayer, Player, Quit};
pub use simulate::{Tally, simulate};
