//! `MusicalChairs` builder: the entry point for running a game.
//!
//! Ties the layers together: config → game actors → event output.

use std::time::Duration;

use chairs_game::{GameConfig, GameHandle, GameReport, spawn_game};
use chairs_pacing::PacingConfig;
use chairs_protocol::EventEncoder;
use tokio::io::AsyncWrite;
use tokio::sync::mpsc;

use crate::ChairsError;
use crate::printer::print_events;

/// Builder for configuring a game.
///
/// # Example
///
/// ```rust,no_run
/// use chairs::prelude::*;
///
/// # async fn demo() -> Result<(), ChairsError> {
/// let report = MusicalChairs::builder()
///     .players(6)
///     .music(std::time::Duration::from_millis(500))
///     .build()?
///     .run_printing(&TextEncoder, tokio::io::stdout())
///     .await?;
/// println!("winner: {:?}", report.winner);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MusicalChairsBuilder {
    config: GameConfig,
}

impl MusicalChairsBuilder {
    /// Creates a new builder with default settings (4 players, 2 s music).
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of players.
    pub fn players(mut self, players: usize) -> Self {
        self.config.players = players;
        self
    }

    /// Caps the number of rounds. `None` plays to a single winner.
    pub fn max_rounds(mut self, max_rounds: Option<u32>) -> Self {
        self.config.max_rounds = max_rounds;
        self
    }

    /// Replaces the whole pacing config.
    pub fn pacing(mut self, pacing: PacingConfig) -> Self {
        self.config.pacing = pacing;
        self
    }

    /// Sets how long the music plays each round.
    pub fn music(mut self, music: Duration) -> Self {
        self.config.pacing.music = music;
        self
    }

    /// Sets the random extra play time added each round.
    pub fn music_jitter(mut self, jitter: Duration) -> Self {
        self.config.pacing.music_jitter = jitter;
        self
    }

    /// Sets the pause seated players take between rounds.
    pub fn settle(mut self, settle: Duration) -> Self {
        self.config.pacing.settle = settle;
        self
    }

    /// Sets the rendezvous bound. `None` waits forever.
    pub fn rendezvous_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.config.pacing.rendezvous_timeout = timeout;
        self
    }

    /// The config as built so far.
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Validates the config.
    ///
    /// # Errors
    /// Returns [`ChairsError::Game`] if the config can't run.
    pub fn build(self) -> Result<MusicalChairs, ChairsError> {
        self.config.validate()?;
        Ok(MusicalChairs {
            config: self.config,
        })
    }
}

/// A validated game, ready to run.
#[derive(Debug, Clone)]
pub struct MusicalChairs {
    config: GameConfig,
}

impl MusicalChairs {
    /// Creates a new builder.
    pub fn builder() -> MusicalChairsBuilder {
        MusicalChairsBuilder::new()
    }

    /// The config this game runs with.
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Spawns the actors and returns a handle, publishing events on
    /// `events` if given.
    pub fn spawn(
        self,
        events: Option<mpsc::UnboundedSender<chairs_protocol::GameEvent>>,
    ) -> Result<GameHandle, ChairsError> {
        Ok(spawn_game(self.config, events)?)
    }

    /// Runs the game to completion without publishing events.
    pub async fn run(self) -> Result<GameReport, ChairsError> {
        Ok(self.spawn(None)?.join().await?)
    }

    /// Runs the game to completion, writing one encoded line per event
    /// to `out` as the game progresses.
    ///
    /// # Errors
    /// A game failure takes precedence over an output failure.
    pub async fn run_printing<W: AsyncWrite + Unpin>(
        self,
        encoder: &dyn EventEncoder,
        out: W,
    ) -> Result<GameReport, ChairsError> {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = self.spawn(Some(tx))?;

        let (report, printed) = tokio::join!(handle.join(), print_events(rx, encoder, out));

        let report = report?;
        let lines = printed?;
        tracing::debug!(lines, rounds = report.rounds, "game output complete");
        Ok(report)
    }
}
