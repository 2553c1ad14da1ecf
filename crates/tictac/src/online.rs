//! Two online clients sharing one terminal.
//!
//! Both seats run through their own [`OnlineSession`] against a shared
//! [`MemoryStore`]. The board shown is the last snapshot the store
//! reported, never a locally predicted one.

use crate::players::{HumanPlayer, Player, Quit};
use anyhow::Result;
use std::sync::Arc;
use tictac_engine::Player as Mark;
use tictac_online::{DocumentStore, MemoryStore, OnlineSession, SessionError, game_key};
use tokio::io::{AsyncBufRead, AsyncWrite};
use tracing::{info, instrument, warn};

/// Hot-seat table for an online game.
pub struct OnlineTable<R, W> {
    human: HumanPlayer<R, W>,
    clients: [OnlineSession; 2],
}

impl<R, W> OnlineTable<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    /// Creates both clients for `game_id`. Nothing is written until
    /// [`run`](Self::run).
    pub fn new(human: HumanPlayer<R, W>, store: MemoryStore, game_id: &str) -> Self {
        let key = game_key(game_id);
        let shared: Arc<dyn DocumentStore> = Arc::new(store);
        let clients = [
            OnlineSession::new(shared.clone(), key.clone()),
            OnlineSession::new(shared, key),
        ];
        Self { human, clients }
    }

    /// Connects, seats X and O, and plays until the human quits.
    ///
    /// Store failures are reported and the step is offered again. Both
    /// subscriptions are released on the way out.
    #[instrument(skip(self))]
    pub async fn run(mut self) -> Result<HumanPlayer<R, W>> {
        let played = self.play().await;
        for client in self.clients {
            if let Err(e) = client.leave().await {
                warn!(error = %e, "Leave failed");
            }
        }
        played?;
        self.human.say("Bye!\n").await?;
        Ok(self.human)
    }

    async fn play(&mut self) -> Result<()> {
        loop {
            let ready = match self.open().await {
                Ok(()) => self.seat_clients().await,
                Err(e) => Err(e),
            };
            if let Err(e) = ready {
                self.report(e).await?;
                if !self.ask_again("[enter] try again, [q]uit: ").await? {
                    return Ok(());
                }
                continue;
            }

            let Some(doc) = self.clients[0].snapshot().cloned() else {
                return Ok(());
            };
            let mover = match doc.current_player {
                Mark::X => 0,
                Mark::O => 1,
            };
            let frame = format!(
                "\n{}\n\n{}\n",
                doc.board.display(),
                self.clients[mover].status()
            );
            self.human.say(&frame).await?;

            if doc.winner.is_some() || doc.board.empty_positions().is_empty() {
                let Some(choice) = self.human.ask("[r]etry, [q]uit: ").await? else {
                    return Ok(());
                };
                if !matches!(choice.to_lowercase().as_str(), "r" | "retry") {
                    return Ok(());
                }
                if let Err(e) = self.reset().await {
                    self.report(e).await?;
                }
                continue;
            }

            let position = match self.human.get_move(&doc.game_state()).await {
                Ok(position) => position,
                Err(e) if e.is::<Quit>() => return Ok(()),
                Err(e) => return Err(e),
            };
            let written = match self.clients[mover].propose_move(position.to_index()).await {
                Ok(Some(_)) => self.sync().await,
                Ok(None) => {
                    self.human.say("Move ignored.\n").await?;
                    Ok(())
                }
                Err(e) => Err(e),
            };
            if let Err(e) = written {
                self.report(e).await?;
            }
        }
    }

    /// Tells the user a store call failed so they can retry; any other
    /// session error ends the table.
    async fn report(&mut self, error: SessionError) -> Result<()> {
        match error {
            SessionError::Store(e) => {
                warn!(error = %e, "Store call failed");
                self.human
                    .say(&format!("Could not reach the game store ({}). Try again.\n", e))
                    .await
            }
            other => Err(other.into()),
        }
    }

    /// False when the user quits or input ends.
    async fn ask_again(&mut self, prompt: &str) -> Result<bool> {
        Ok(self
            .human
            .ask(prompt)
            .await?
            .is_some_and(|answer| !matches!(answer.to_lowercase().as_str(), "q" | "quit")))
    }

    /// Subscribes any client without a snapshot yet.
    ///
    /// A client whose first snapshot failed subscribes afresh.
    async fn open(&mut self) -> Result<(), SessionError> {
        for client in &mut self.clients {
            if client.is_connected() && client.snapshot().is_some() {
                continue;
            }
            client.connect().await?;
            client.next_snapshot().await?;
        }
        Ok(())
    }

    /// Waits until every client has seen the latest write.
    async fn sync(&mut self) -> Result<(), SessionError> {
        for client in &mut self.clients {
            client.next_snapshot().await?;
        }
        Ok(())
    }

    /// Claims X and O for whichever clients hold no seat.
    async fn seat_clients(&mut self) -> Result<(), SessionError> {
        for (client, seat) in [(0, Mark::X), (1, Mark::O)] {
            if self.clients[client].seat().is_some() {
                continue;
            }
            if self.clients[client].join(seat).await? {
                self.sync().await?;
                info!(%seat, "Seat taken");
            }
        }
        Ok(())
    }

    /// Resets the game through both clients; the next turn re-seats them.
    async fn reset(&mut self) -> Result<(), SessionError> {
        for client in 0..self.clients.len() {
            self.clients[client].retry().await?;
            self.sync().await?;
        }
        Ok(())
    }
}
