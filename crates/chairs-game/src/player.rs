//! Player actor: one Tokio task per player.
//!
//! Each round the player waits for the music to stop, races for a seat,
//! and reports how it went at the rendezvous. A seated player loops; an
//! eliminated one exits. Every player exits as soon as the round signal
//! is shut down or the game stops running.

use std::sync::Arc;
use std::time::Duration;

use chairs_protocol::{Epoch, Outcome, PlayerId};
use chairs_sync::{BarrierSender, RoundSignal, SeatPool, Wake};
use serde::Serialize;

use crate::{GameState, PlayerState, ProtocolViolation};

/// What a player reports at the rendezvous.
pub type RaceResult = Result<Outcome, ProtocolViolation>;

/// How a player's game went, returned when its task exits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerSummary {
    pub id: PlayerId,
    /// Rounds in which the player found a seat.
    pub rounds_survived: u32,
    /// The round epoch in which the player went out, if it did.
    pub eliminated_in: Option<Epoch>,
}

impl PlayerSummary {
    /// Whether the player was still in the game when it ended.
    pub fn survived(&self) -> bool {
        self.eliminated_in.is_none()
    }
}

pub(crate) struct PlayerActor {
    id: PlayerId,
    state: PlayerState,
    game: Arc<GameState>,
    pool: Arc<SeatPool>,
    signal: Arc<RoundSignal>,
    arrivals: BarrierSender<RaceResult>,
    settle: Duration,
    next_epoch: Epoch,
    rounds_survived: u32,
    eliminated_in: Option<Epoch>,
}

impl PlayerActor {
    pub(crate) fn new(
        id: PlayerId,
        game: Arc<GameState>,
        pool: Arc<SeatPool>,
        signal: Arc<RoundSignal>,
        arrivals: BarrierSender<RaceResult>,
        settle: Duration,
    ) -> Self {
        let next_epoch = signal.epoch();
        Self {
            id,
            state: PlayerState::Idle,
            game,
            pool,
            signal,
            arrivals,
            settle,
            next_epoch,
            rounds_survived: 0,
            eliminated_in: None,
        }
    }

    /// Runs the round loop until the player is out or the game ends.
    pub(crate) async fn run(mut self) -> PlayerSummary {
        tracing::debug!(player = %self.id, "player actor started");

        while self.game.is_running() {
            self.transition(PlayerState::WaitingForStop);
            let epoch = match self.signal.wait_for_stop(self.next_epoch).await {
                Wake::Stopped(epoch) => epoch,
                Wake::Shutdown => break,
            };

            self.transition(PlayerState::Racing);
            let result = self.race();
            let delivered = self.arrivals.arrive(self.id, epoch, result.clone());

            match result {
                Ok(Outcome::Seated) => {
                    self.transition(PlayerState::Seated);
                    self.rounds_survived += 1;
                    self.next_epoch = epoch.next();
                    tracing::debug!(player = %self.id, %epoch, "found a seat");
                    if !delivered {
                        break;
                    }
                    if !self.settle.is_zero() {
                        // A shutdown cuts the settle short.
                        tokio::select! {
                            _ = tokio::time::sleep(self.settle) => {}
                            _ = self.signal.wait_for_shutdown() => {}
                        }
                    }
                    self.transition(PlayerState::Idle);
                }
                Ok(Outcome::Eliminated) => {
                    self.transition(PlayerState::Eliminated);
                    self.eliminated_in = Some(epoch);
                    break;
                }
                Err(violation) => {
                    tracing::error!(
                        player = %self.id,
                        %epoch,
                        %violation,
                        "protocol violation while racing"
                    );
                    break;
                }
            }
        }

        self.transition(PlayerState::Terminated);
        tracing::debug!(
            player = %self.id,
            rounds_survived = self.rounds_survived,
            "player actor stopped"
        );

        PlayerSummary {
            id: self.id,
            rounds_survived: self.rounds_survived,
            eliminated_in: self.eliminated_in,
        }
    }

    /// One attempt at a seat. No seat means elimination.
    fn race(&self) -> RaceResult {
        if self.pool.try_acquire() {
            Ok(Outcome::Seated)
        } else {
            self.game.eliminate(self.id)?;
            Ok(Outcome::Eliminated)
        }
    }

    fn transition(&mut self, next: PlayerState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "player {} cannot go {} → {}",
            self.id,
            self.state,
            next
        );
        tracing::trace!(player = %self.id, from = %self.state, to = %next, "player transition");
        self.state = next;
    }
}
