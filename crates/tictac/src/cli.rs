//! Command-line interface for tictac.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tictac_engine::{Difficulty, Player};

/// Tic-tac-toe in the terminal
#[derive(Parser, Debug)]
#[command(name = "tictac")]
#[command(about = "Tic-tac-toe against the AI or a second client", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to a TOML config file
    #[arg(short, long, global = true, default_value = "tictac.toml")]
    pub config: PathBuf,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Mark choice on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Side {
    /// Play as X (moves first).
    X,
    /// Play as O.
    O,
}

impl From<Side> for Player {
    fn from(side: Side) -> Self {
        match side {
            Side::X => Player::X,
            Side::O => Player::O,
        }
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play against the AI
    Play {
        /// AI difficulty (easy, medium, impossible)
        #[arg(short, long)]
        difficulty: Option<Difficulty>,

        /// Your mark
        #[arg(short, long, value_enum)]
        mark: Option<Side>,

        /// AI thinking delay in milliseconds
        #[arg(long)]
        think_ms: Option<u64>,
    },

    /// Play both seats of an online game through a shared in-memory store
    Online {
        /// Game id within the game collection
        #[arg(long)]
        game_id: Option<String>,
    },

    /// Pit two AIs against each other and tally the results
    Simulate {
        /// Number of games
        #[arg(short, long, default_value = "100")]
        games: u32,

        /// Difficulty of the X player
        #[arg(long, default_value = "impossible")]
        x: Difficulty,

        /// Difficulty of the O player
        #[arg(long, default_value = "impossible")]
        o: Difficulty,

        /// Seed for reproducible runs
        #[arg(long)]
        seed: Option<u64>,
    },
}
