//! Game configuration and the actor state machines.

use chairs_pacing::PacingConfig;
use serde::{Deserialize, Serialize};

use crate::GameError;

// ---------------------------------------------------------------------------
// GameConfig
// ---------------------------------------------------------------------------

/// Configuration for one game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Number of players, numbered `1..=players`. Seats start at one fewer.
    pub players: usize,

    /// Stop after this many rounds even if more than one player remains.
    /// `None` plays until a single winner is left (`players - 1` rounds).
    pub max_rounds: Option<u32>,

    /// Music, settle, and rendezvous timing.
    pub pacing: PacingConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            players: 4,
            max_rounds: None,
            pacing: PacingConfig::default(),
        }
    }
}

impl GameConfig {
    /// Largest supported player count (ids must fit in a `u32`).
    pub const MAX_PLAYERS: usize = 1024;

    /// A config for `players` players with default pacing.
    pub fn with_players(players: usize) -> Self {
        Self {
            players,
            ..Default::default()
        }
    }

    /// Checks the config can run.
    ///
    /// # Errors
    /// Returns [`GameError::InvalidConfig`] for zero players, more than
    /// [`Self::MAX_PLAYERS`], or a round budget of zero.
    pub fn validate(&self) -> Result<(), GameError> {
        if self.players == 0 {
            return Err(GameError::InvalidConfig(
                "a game needs at least one player".into(),
            ));
        }
        if self.players > Self::MAX_PLAYERS {
            return Err(GameError::InvalidConfig(format!(
                "{} players exceeds the maximum of {}",
                self.players,
                Self::MAX_PLAYERS
            )));
        }
        if self.max_rounds == Some(0) {
            return Err(GameError::InvalidConfig(
                "round budget must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Rounds the game will actually play: the budget or `players - 1`,
    /// whichever is smaller.
    pub fn expected_rounds(&self) -> u32 {
        let full = self.players.saturating_sub(1) as u32;
        match self.max_rounds {
            Some(budget) => budget.min(full),
            None => full,
        }
    }
}

// ---------------------------------------------------------------------------
// PlayerState
// ---------------------------------------------------------------------------

/// Where a player actor is in its round loop.
///
/// ```text
/// Idle → WaitingForStop → Racing → Seated ──→ Idle (next round)
///                                 └→ Eliminated
/// any ──→ Terminated
/// ```
///
/// - **Idle**: between rounds, about to wait on the next epoch.
/// - **WaitingForStop**: blocked on the round signal.
/// - **Racing**: woke up, trying to take a seat.
/// - **Seated**: got a seat, survives the round.
/// - **Eliminated**: no seat left; out of the game.
/// - **Terminated**: the actor has exited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerState {
    Idle,
    WaitingForStop,
    Racing,
    Seated,
    Eliminated,
    Terminated,
}

impl PlayerState {
    /// Returns `true` if moving to `target` follows the state machine.
    pub fn can_transition_to(self, target: Self) -> bool {
        use PlayerState::*;
        matches!(
            (self, target),
            (Idle, WaitingForStop)
                | (WaitingForStop, Racing)
                | (Racing, Seated)
                | (Racing, Eliminated)
                | (Seated, Idle)
        ) || (target == Terminated && self != Terminated)
    }
}

impl std::fmt::Display for PlayerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::WaitingForStop => write!(f, "WaitingForStop"),
            Self::Racing => write!(f, "Racing"),
            Self::Seated => write!(f, "Seated"),
            Self::Eliminated => write!(f, "Eliminated"),
            Self::Terminated => write!(f, "Terminated"),
        }
    }
}

// ---------------------------------------------------------------------------
// CoordinatorPhase
// ---------------------------------------------------------------------------

/// Where the coordinator is in a round.
///
/// ```text
/// Playing → Stopping → Resolving → Continuing → Playing ...
///                                └→ Ended
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoordinatorPhase {
    /// Music playing; no shared state touched.
    Playing,
    /// Broadcasting the stop.
    Stopping,
    /// Waiting at the rendezvous, then shrinking seats and resetting.
    Resolving,
    /// Round done; another round follows.
    Continuing,
    /// No more rounds.
    Ended,
}

impl CoordinatorPhase {
    /// The phase that follows this one. `more_rounds` picks the branch
    /// out of `Resolving`.
    pub fn next(self, more_rounds: bool) -> Option<Self> {
        match self {
            Self::Playing => Some(Self::Stopping),
            Self::Stopping => Some(Self::Resolving),
            Self::Resolving if more_rounds => Some(Self::Continuing),
            Self::Resolving => Some(Self::Ended),
            Self::Continuing => Some(Self::Playing),
            Self::Ended => None,
        }
    }
}
