//! Shared game state: who is still in, how many seats are left, and
//! whether the game is running.
//!
//! One `GameState` per game, wrapped in an `Arc` and handed to every actor
//! at spawn time. All fields sit behind a single `parking_lot::Mutex`; no
//! method holds the lock across an `.await` (none of them are async).

use std::collections::BTreeSet;

use chairs_protocol::PlayerId;
use parking_lot::Mutex;
use serde::Serialize;

use crate::ProtocolViolation;

/// A point-in-time copy of the counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GameSnapshot {
    pub players_remaining: usize,
    pub seats_remaining: usize,
    pub running: bool,
}

struct Inner {
    /// Size of the original roster; valid ids are `1..=roster`.
    roster: usize,
    active: BTreeSet<PlayerId>,
    /// Elimination order, first out first.
    eliminated: Vec<PlayerId>,
    seats_remaining: usize,
    running: bool,
}

/// The single source of truth for player and seat counts.
pub struct GameState {
    inner: Mutex<Inner>,
}

impl GameState {
    /// A fresh game with `players` players and `players - 1` seats.
    ///
    /// A one-player game is born finished: there is nobody to race.
    /// Player ids are `u32`, so a count beyond `u32::MAX` is capped there
    /// with a warning; [`GameConfig::validate`](crate::GameConfig::validate)
    /// keeps real games well below that.
    pub fn new(players: usize) -> Self {
        let roster = roster_size(players);
        let active = (1..=roster).map(PlayerId).collect();
        let players = roster as usize;
        Self {
            inner: Mutex::new(Inner {
                roster: players,
                active,
                eliminated: Vec::new(),
                seats_remaining: players.saturating_sub(1),
                running: players > 1,
            }),
        }
    }

    /// Marks `player` as out and decrements the player count.
    ///
    /// # Errors
    /// - [`ProtocolViolation::UnknownPlayer`] for an id outside the roster.
    /// - [`ProtocolViolation::AlreadyEliminated`] on a second call for the
    ///   same player. The state is not touched.
    /// - [`ProtocolViolation::LastPlayer`] if `player` is the only one left.
    pub fn eliminate(&self, player: PlayerId) -> Result<(), ProtocolViolation> {
        let mut inner = self.inner.lock();

        if player.0 == 0 || player.0 as usize > inner.roster {
            return Err(ProtocolViolation::UnknownPlayer(player));
        }
        if !inner.active.contains(&player) {
            return Err(ProtocolViolation::AlreadyEliminated(player));
        }
        if inner.active.len() == 1 {
            return Err(ProtocolViolation::LastPlayer(player));
        }

        inner.active.remove(&player);
        inner.eliminated.push(player);
        tracing::info!(
            %player,
            players_remaining = inner.active.len(),
            "player eliminated"
        );
        Ok(())
    }

    /// Removes one seat. Called once per round after the rendezvous.
    ///
    /// # Errors
    /// Returns [`ProtocolViolation::SeatsExhausted`] when no seats are left.
    pub fn shrink_seats(&self) -> Result<usize, ProtocolViolation> {
        let mut inner = self.inner.lock();
        inner.seats_remaining = inner
            .seats_remaining
            .checked_sub(1)
            .ok_or(ProtocolViolation::SeatsExhausted)?;
        Ok(inner.seats_remaining)
    }

    /// `true` while more than one player remains and the game hasn't
    /// been finished.
    pub fn is_running(&self) -> bool {
        let inner = self.inner.lock();
        inner.running && inner.active.len() > 1
    }

    /// Stops the game. Players exit their loop at the next check.
    pub fn finish(&self) {
        let mut inner = self.inner.lock();
        if inner.running {
            inner.running = false;
            tracing::debug!(
                players_remaining = inner.active.len(),
                "game marked finished"
            );
        }
    }

    /// Checks `seats == players - 1`, which must hold between rounds.
    ///
    /// # Errors
    /// Returns [`ProtocolViolation::SeatInvariant`] when it doesn't.
    pub fn check_invariant(&self) -> Result<(), ProtocolViolation> {
        let inner = self.inner.lock();
        let players = inner.active.len();
        if inner.seats_remaining + 1 != players {
            return Err(ProtocolViolation::SeatInvariant {
                players,
                seats: inner.seats_remaining,
            });
        }
        Ok(())
    }

    pub fn players_remaining(&self) -> usize {
        self.inner.lock().active.len()
    }

    pub fn seats_remaining(&self) -> usize {
        self.inner.lock().seats_remaining
    }

    /// Whether `player` is still in the game.
    pub fn is_active(&self, player: PlayerId) -> bool {
        self.inner.lock().active.contains(&player)
    }

    /// Players still in the game, in id order.
    pub fn active_players(&self) -> Vec<PlayerId> {
        self.inner.lock().active.iter().copied().collect()
    }

    /// Players eliminated so far, in the order they went out.
    pub fn eliminated(&self) -> Vec<PlayerId> {
        self.inner.lock().eliminated.clone()
    }

    /// The last player standing, once there is exactly one.
    pub fn winner(&self) -> Option<PlayerId> {
        let inner = self.inner.lock();
        if inner.active.len() == 1 {
            inner.active.first().copied()
        } else {
            None
        }
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let inner = self.inner.lock();
        GameSnapshot {
            players_remaining: inner.active.len(),
            seats_remaining: inner.seats_remaining,
            running: inner.running && inner.active.len() > 1,
        }
    }
}

/// Number of player ids a roster of `players` can hand out.
fn roster_size(players: usize) -> u32 {
    u32::try_from(players).unwrap_or_else(|_| {
        tracing::warn!(players, max = u32::MAX, "player count exceeds id range, capping");
        u32::MAX
    })
}

impl std::fmt::Debug for GameState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let snap = self.snapshot();
        f.debug_struct("GameState")
            .field("players_remaining", &snap.players_remaining)
            .field("seats_remaining", &snap.seats_remaining)
            .field("running", &snap.running)
            .finish()
    }
}
