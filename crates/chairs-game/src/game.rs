//! Spawning a game and waiting for it to finish.

use std::sync::Arc;

use chairs_pacing::Pacer;
use chairs_protocol::PlayerId;
use chairs_sync::{RoundSignal, SeatPool, round_barrier};
use serde::Serialize;
use tokio::task::JoinHandle;

use crate::coordinator::{CoordinatorActor, CoordinatorOutcome};
use crate::player::PlayerActor;
use crate::{
    EndReason, EventSender, GameConfig, GameError, GameSnapshot, GameState, PlayerSummary,
};

/// The result of a finished game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameReport {
    /// The last player standing, if the game got that far.
    pub winner: Option<PlayerId>,
    /// Rounds played.
    pub rounds: u32,
    /// Players in the order they were eliminated.
    pub eliminations: Vec<PlayerId>,
    /// Why the game stopped.
    pub end: EndReason,
    /// One summary per player, in id order.
    pub players: Vec<PlayerSummary>,
}

/// Handle to a running game.
///
/// Dropping the handle does not stop the game; call [`abort`](Self::abort)
/// for that.
pub struct GameHandle {
    game: Arc<GameState>,
    signal: Arc<RoundSignal>,
    coordinator: JoinHandle<Result<CoordinatorOutcome, GameError>>,
    players: Vec<JoinHandle<PlayerSummary>>,
}

impl GameHandle {
    /// Current counters.
    pub fn snapshot(&self) -> GameSnapshot {
        self.game.snapshot()
    }

    /// Shared game state, for observers.
    pub fn state(&self) -> &Arc<GameState> {
        &self.game
    }

    /// Stops the game now. Every player waiting on the round signal is
    /// released and exits; the coordinator abandons the current round.
    pub fn abort(&self) {
        tracing::info!("game abort requested");
        self.game.finish();
        self.signal.shutdown();
    }

    /// Waits for every actor to exit and assembles the report.
    ///
    /// # Errors
    /// Returns the coordinator's error if the game hit a protocol
    /// violation or a rendezvous failure, or [`GameError::ActorFailed`]
    /// if a task panicked.
    pub async fn join(self) -> Result<GameReport, GameError> {
        let coordinator = self.coordinator.await;

        // The coordinator always shuts the signal down on its way out, so
        // every player is on its way out too. Join them all before
        // surfacing any error.
        let mut players = Vec::with_capacity(self.players.len());
        let mut failed = None;
        for handle in self.players {
            match handle.await {
                Ok(summary) => players.push(summary),
                Err(e) => failed = Some(GameError::ActorFailed(e.to_string())),
            }
        }

        let outcome = coordinator.map_err(|e| GameError::ActorFailed(e.to_string()))??;
        if let Some(e) = failed {
            return Err(e);
        }

        Ok(GameReport {
            winner: match outcome.end {
                EndReason::Winner => self.game.winner(),
                _ => None,
            },
            rounds: outcome.rounds,
            eliminations: self.game.eliminated(),
            end: outcome.end,
            players,
        })
    }
}

/// Spawns the coordinator and one actor per player on the current Tokio
/// runtime.
///
/// Events are published on `events` as the game progresses, if given.
///
/// # Errors
/// Returns [`GameError::InvalidConfig`] if `config` can't run.
pub fn spawn_game(
    config: GameConfig,
    events: Option<EventSender>,
) -> Result<GameHandle, GameError> {
    config.validate()?;

    let game = Arc::new(GameState::new(config.players));
    let pool = Arc::new(SeatPool::new(game.seats_remaining()));
    let signal = Arc::new(RoundSignal::new());
    let (arrivals, barrier) = round_barrier();
    let pacer = Pacer::new(config.pacing);
    let settle = pacer.settle();

    let players: Vec<_> = game
        .active_players()
        .into_iter()
        .map(|id| {
            let actor = PlayerActor::new(
                id,
                Arc::clone(&game),
                Arc::clone(&pool),
                Arc::clone(&signal),
                arrivals.clone(),
                settle,
            );
            tokio::spawn(actor.run())
        })
        .collect();
    // Only players hold senders; if they all exit the barrier closes.
    drop(arrivals);

    let coordinator = CoordinatorActor::new(
        Arc::clone(&game),
        pool,
        Arc::clone(&signal),
        barrier,
        pacer,
        config.max_rounds,
        events,
    );
    let coordinator = tokio::spawn(coordinator.run());

    tracing::info!(players = config.players, "game spawned");

    Ok(GameHandle {
        game,
        signal,
        coordinator,
        players,
    })
}

/// Spawns a game and waits for it to finish.
///
/// # Errors
/// See [`spawn_game`] and [`GameHandle::join`].
pub async fn run_game(
    config: GameConfig,
    events: Option<EventSender>,
) -> Result<GameReport, GameError> {
    spawn_game(config, events)?.join().await
}
