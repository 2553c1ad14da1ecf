//! Human player at a terminal.

use super::Player;
use anyhow::Result;
use derive_more::{Display, Error};
use tictac_engine::{GameState, Position};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

/// The human asked to stop, or input ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
#[display("player quit")]
pub struct Quit;

/// Human reading moves from a line-based input.
///
/// Moves are a cell number (1-9) or a label such as `top left`.
pub struct HumanPlayer<R, W> {
    name: String,
    input: R,
    output: W,
}

impl<R, W> HumanPlayer<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    /// Creates a human player over `input` and `output`.
    pub fn new(name: impl Into<String>, input: R, output: W) -> Self {
        Self {
            name: name.into(),
            input,
            output,
        }
    }

    /// Writes `text` to the player.
    pub async fn say(&mut self, text: &str) -> Result<()> {
        self.output.write_all(text.as_bytes()).await?;
        self.output.flush().await?;
        Ok(())
    }

    /// Prompts and reads one trimmed line, `None` at end of input.
    pub async fn ask(&mut self, prompt: &str) -> Result<Option<String>> {
        self.say(prompt).await?;
        let mut line = String::new();
        if self.input.read_line(&mut line).await? == 0 {
            debug!(player = %self.name, "Input closed");
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Gives back the output, for inspection after a scripted session.
    pub fn into_output(self) -> W {
        self.output
    }
}

#[async_trait::async_trait]
impl<R, W> Player for HumanPlayer<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn get_move(&mut self, game: &GameState) -> Result<Position> {
        let prompt = format!("{} ({}), your move: ", self.name, game.current_player());
        loop {
            let Some(line) = self.ask(&prompt).await? else {
                return Err(Quit.into());
            };
            if matches!(line.to_lowercase().as_str(), "q" | "quit") {
                return Err(Quit.into());
            }
            match Position::parse_input(&line) {
                Some(pos) if game.board().is_empty(pos) => return Ok(pos),
                Some(pos) => self.say(&format!("{} is taken.\n", pos)).await?,
                None => self.say("Enter 1-9 or a cell name.\n").await?,
            }
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}
