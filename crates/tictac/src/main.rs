//! tictac - tic-tac-toe in the terminal.

use anyhow::Result;
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tictac::cli::{Cli, Command};
use tictac::{AppConfig, HumanPlayer, LocalGame, OnlineTable, simulate};
use tictac_online::MemoryStore;
use tokio::io::{BufReader, stdin, stdout};
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tictac=debug")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load(&cli.config)?;

    match cli.command {
        Command::Play {
            difficulty,
            mark,
            think_ms,
        } => {
            let config = config.with_overrides(difficulty, mark.map(Into::into), think_ms, None);
            run_play(config).await
        }
        Command::Online { game_id } => {
            let config = config.with_overrides(None, None, None, game_id);
            run_online(config).await
        }
        Command::Simulate { games, x, o, seed } => {
            let seed = seed.unwrap_or_else(rand::random);
            info!(seed, "Simulation seed");
            let tally = simulate(games, x, o, seed).await?;
            println!("{}", tally);
            Ok(())
        }
    }
}

/// Run a local game against the AI
#[instrument(skip(config))]
async fn run_play(config: AppConfig) -> Result<()> {
    info!(difficulty = %config.difficulty(), mark = %config.mark(), "Starting local game");
    let human = HumanPlayer::new("You", BufReader::new(stdin()), stdout());
    let mut game = LocalGame::new(human, &config, StdRng::from_entropy());
    game.run().await
}

/// Run both online seats on this terminal
#[instrument(skip(config))]
async fn run_online(config: AppConfig) -> Result<()> {
    info!(game_id = %config.game_id(), "Starting online table");
    let human = HumanPlayer::new("Player", BufReader::new(stdin()), stdout());
    OnlineTable::new(human, MemoryStore::new(), config.game_id())
        .run()
        .await?;
    Ok(())
}
