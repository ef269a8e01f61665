//! Coordinator actor: drives the rounds.
//!
//! One iteration per round: play music, stop it, wait at the rendezvous
//! for every racer, then shrink the seats and reset the signal for the
//! next epoch. The coordinator is the only writer of the seat pool's
//! capacity and of the round signal.

use std::sync::Arc;

use chairs_pacing::Pacer;
use chairs_protocol::{Epoch, GameEvent, Outcome};
use chairs_sync::{RoundBarrier, RoundSignal, SeatPool};
use serde::Serialize;
use tokio::sync::mpsc;

use crate::player::RaceResult;
use crate::{CoordinatorPhase, GameError, GameState, ProtocolViolation};

/// Channel the coordinator publishes game events on.
pub type EventSender = mpsc::UnboundedSender<GameEvent>;

/// Why the game stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    /// One player left standing.
    Winner,
    /// The configured round budget ran out first.
    RoundBudget,
    /// The game was torn down from outside.
    Aborted,
}

/// What the coordinator hands back when it stops cleanly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CoordinatorOutcome {
    pub(crate) rounds: u32,
    pub(crate) end: EndReason,
}

pub(crate) struct CoordinatorActor {
    game: Arc<GameState>,
    pool: Arc<SeatPool>,
    signal: Arc<RoundSignal>,
    barrier: RoundBarrier<RaceResult>,
    pacer: Pacer,
    max_rounds: Option<u32>,
    events: Option<EventSender>,
    phase: CoordinatorPhase,
    round: u32,
    epoch: Epoch,
}

impl CoordinatorActor {
    pub(crate) fn new(
        game: Arc<GameState>,
        pool: Arc<SeatPool>,
        signal: Arc<RoundSignal>,
        barrier: RoundBarrier<RaceResult>,
        pacer: Pacer,
        max_rounds: Option<u32>,
        events: Option<EventSender>,
    ) -> Self {
        let epoch = signal.epoch();
        Self {
            game,
            pool,
            signal,
            barrier,
            pacer,
            max_rounds,
            events,
            phase: CoordinatorPhase::Playing,
            round: 0,
            epoch,
        }
    }

    /// Runs rounds until one player remains, the budget runs out, or the
    /// game is aborted.
    ///
    /// Whatever happens, the game is marked finished and the signal shut
    /// down before this returns, so no player is left waiting.
    pub(crate) async fn run(mut self) -> Result<CoordinatorOutcome, GameError> {
        tracing::info!(
            players = self.game.players_remaining(),
            seats = self.game.seats_remaining(),
            "coordinator started"
        );

        let result = self.drive().await;

        self.phase = CoordinatorPhase::Ended;
        self.game.finish();
        self.signal.shutdown();

        match &result {
            Ok(end) => {
                let winner = match end {
                    EndReason::Winner => self.game.winner(),
                    _ => None,
                };
                self.emit(GameEvent::GameOver {
                    winner,
                    rounds: self.round,
                });
                let music = self.pacer.metrics();
                tracing::info!(
                    rounds = self.round,
                    end = ?end,
                    winner = ?winner,
                    music_total_ms = music.total_music.as_millis() as u64,
                    music_avg_ms = music.avg_music().as_millis() as u64,
                    music_max_ms = music.max_music.as_millis() as u64,
                    "coordinator stopped"
                );
            }
            Err(e) => {
                tracing::error!(round = self.round, error = %e, "game aborted by fatal error");
            }
        }

        result.map(|end| CoordinatorOutcome {
            rounds: self.round,
            end,
        })
    }

    async fn drive(&mut self) -> Result<EndReason, GameError> {
        let signal = Arc::clone(&self.signal);

        while self.game.is_running() {
            if self.max_rounds.is_some_and(|budget| self.round >= budget) {
                tracing::info!(rounds = self.round, "round budget exhausted");
                return Ok(EndReason::RoundBudget);
            }
            self.round += 1;
            let round = self.round;

            tokio::select! {
                biased;
                _ = signal.wait_for_shutdown() => {
                    tracing::info!(round, "shutdown requested mid-round");
                    return Ok(EndReason::Aborted);
                }
                result = self.play_round() => result?,
            }
        }

        // Aborted between rounds: `finish` flips `is_running` without a
        // winner being decided.
        if self.game.winner().is_some() {
            Ok(EndReason::Winner)
        } else {
            Ok(EndReason::Aborted)
        }
    }

    async fn play_round(&mut self) -> Result<(), GameError> {
        let round = self.round;
        let players = self.game.players_remaining();
        let seats = self.game.seats_remaining();

        // Playing
        if self.phase == CoordinatorPhase::Continuing {
            self.advance(true);
        }
        self.emit(GameEvent::RoundStarted {
            round,
            epoch: self.epoch,
            players,
            seats,
        });
        tracing::info!(round, epoch = %self.epoch, players, seats, "music playing");
        self.pacer.play_music().await;

        // Stopping
        self.advance(true);
        let epoch = self.signal.signal_stop();
        self.emit(GameEvent::MusicStopped { round, epoch });

        // Resolving: every player still in the game races exactly once.
        self.advance(true);
        let arrivals = self
            .barrier
            .collect(epoch, players, self.pacer.rendezvous_timeout())
            .await?;

        let mut eliminated = 0;
        for arrival in arrivals {
            match arrival.payload? {
                Outcome::Seated => self.emit(GameEvent::PlayerSeated {
                    round,
                    player: arrival.player,
                }),
                Outcome::Eliminated => {
                    eliminated += 1;
                    self.emit(GameEvent::PlayerEliminated {
                        round,
                        player: arrival.player,
                    });
                }
            }
        }
        if eliminated != 1 {
            return Err(ProtocolViolation::EliminationCount { round, eliminated }.into());
        }

        let seats_remaining = self.game.shrink_seats()?;
        self.pool.reset(seats_remaining);
        self.epoch = epoch.next();
        self.signal.reset(self.epoch)?;
        self.game.check_invariant()?;

        let players_remaining = self.game.players_remaining();
        self.emit(GameEvent::RoundResolved {
            round,
            players_remaining,
            seats_remaining,
        });
        tracing::info!(round, players_remaining, seats_remaining, "round resolved");

        self.advance(players_remaining > 1);
        Ok(())
    }

    /// Steps to the next phase. `more_rounds` picks the branch out of
    /// `Resolving`.
    fn advance(&mut self, more_rounds: bool) {
        let Some(next) = self.phase.next(more_rounds) else {
            return;
        };
        tracing::trace!(round = self.round, from = ?self.phase, to = ?next, "coordinator phase");
        self.phase = next;
    }

    /// Publishes an event. Silently drops it if nobody is listening.
    fn emit(&self, event: GameEvent) {
        if let Some(events) = &self.events {
            let _ = events.send(event);
        }
    }
}
