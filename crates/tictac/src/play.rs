//! Local game against the AI on a terminal.

use crate::config::AppConfig;
use crate::players::{HumanPlayer, Player, Quit};
use anyhow::Result;
use rand::rngs::StdRng;
use std::time::Duration;
use tictac_engine::{AiMatch, Difficulty, Player as Mark};
use tokio::io::{AsyncBufRead, AsyncWrite};
use tracing::{info, instrument};

/// How a round ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RoundEnd {
    Finished,
    Quit,
}

/// Human-versus-AI session: any number of rounds until the human quits.
pub struct LocalGame<R, W> {
    human: HumanPlayer<R, W>,
    game: AiMatch,
    rng: StdRng,
    think: Duration,
    opening_think: Duration,
    rounds: u32,
}

impl<R, W> LocalGame<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    /// Sets up the first match from `config`.
    pub fn new(human: HumanPlayer<R, W>, config: &AppConfig, rng: StdRng) -> Self {
        Self {
            human,
            game: AiMatch::start(*config.mark(), *config.difficulty()),
            rng,
            think: Duration::from_millis(*config.think_ms()),
            opening_think: Duration::from_millis(*config.opening_think_ms()),
            rounds: 0,
        }
    }

    /// Returns the current match.
    pub fn game(&self) -> &AiMatch {
        &self.game
    }

    /// Number of rounds played to the end.
    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    /// Gives back the human player.
    pub fn into_human(self) -> HumanPlayer<R, W> {
        self.human
    }

    /// Plays rounds until the human quits or input ends.
    #[instrument(skip(self))]
    pub async fn run(&mut self) -> Result<()> {
        loop {
            if self.play_round().await? == RoundEnd::Quit {
                break;
            }
            self.rounds += 1;

            match self.menu().await? {
                Some(next) => self.game = next,
                None => break,
            }
        }
        info!(rounds = self.rounds, "Local game finished");
        self.human.say("Bye!\n").await
    }

    async fn play_round(&mut self) -> Result<RoundEnd> {
        loop {
            let state = self.game.state();
            let frame = format!("\n{}\n\n{}\n", state.board().display(), self.game.status());
            self.human.say(&frame).await?;

            if state.outcome().is_over() {
                return Ok(RoundEnd::Finished);
            }

            if self.game.ai_thinking() {
                let delay = if state.history().is_empty() {
                    self.opening_think
                } else {
                    self.think
                };
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                self.game.ai_move(&mut self.rng)?;
                continue;
            }

            match self.human.get_move(self.game.state()).await {
                Ok(position) => {
                    let applied = self.game.human_move(position.to_index());
                    debug_assert!(applied, "human chose an illegal cell");
                }
                Err(e) if e.is::<Quit>() => return Ok(RoundEnd::Quit),
                Err(e) => return Err(e),
            }
        }
    }

    /// Post-game choice: the next match, or `None` to quit.
    async fn menu(&mut self) -> Result<Option<AiMatch>> {
        loop {
            let Some(choice) = self.human.ask("[r]etry, [n]ew game, [q]uit: ").await? else {
                return Ok(None);
            };
            match choice.to_lowercase().as_str() {
                "r" | "retry" => return Ok(Some(self.game.retry())),
                "n" | "new" => return self.new_match().await.map(Some),
                "q" | "quit" => return Ok(None),
                _ => self.human.say("Press r, n or q.\n").await?,
            }
        }
    }

    /// Asks for difficulty and mark; blank answers keep the current ones.
    async fn new_match(&mut self) -> Result<AiMatch> {
        let mut difficulty = self.game.difficulty();
        let mut mark = self.game.human();

        if let Some(answer) = self.human.ask("Difficulty (easy, medium, impossible): ").await? {
            match answer.parse::<Difficulty>() {
                Ok(choice) => difficulty = choice,
                Err(_) if answer.is_empty() => {}
                Err(_) => self.human.say("Keeping the current difficulty.\n").await?,
            }
        }
        if let Some(answer) = self.human.ask("Play as X or O: ").await? {
            match answer.to_uppercase().as_str() {
                "X" => mark = Mark::X,
                "O" => mark = Mark::O,
                _ => {}
            }
        }
        Ok(AiMatch::start(mark, difficulty))
    }
}
