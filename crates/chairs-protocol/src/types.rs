//! Core types shared by every actor in a musical chairs game.
//!
//! Nothing in here knows about tasks, locks, or channels. These are the
//! plain values that flow between the coordinator and the players: who a
//! player is, which round a stop signal belongs to, how a race ended, and
//! the events that describe the game to an observer.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A unique identifier for a player, numbered `1..=N`.
///
/// Newtype over `u32` so a player id can't be confused with a round
/// number or a seat count in a function signature, even though all three
/// are small integers underneath.
///
/// `#[serde(transparent)]` keeps the JSON form a bare number: `PlayerId(3)`
/// serializes as `3`, not `{ "0": 3 }`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PlayerId(pub u32);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// A monotonically increasing round counter attached to every stop signal.
///
/// The epoch is what lets a player tell "the music stopped for the round
/// I'm waiting on" apart from "the music is still marked stopped from the
/// round that just ended". Epoch 1 is the first round.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Epoch(pub u64);

impl Epoch {
    /// The epoch of the first round.
    pub const FIRST: Epoch = Epoch(1);

    /// The epoch that follows this one.
    pub fn next(self) -> Self {
        Epoch(self.0 + 1)
    }
}

impl fmt::Display for Epoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Outcome: how one player's race ended
// ---------------------------------------------------------------------------

/// The result of a single player's attempt to grab a seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The player acquired a seat and stays in the game.
    Seated,
    /// The pool was empty; the player is out.
    Eliminated,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Seated => write!(f, "seated"),
            Self::Eliminated => write!(f, "eliminated"),
        }
    }
}

// ---------------------------------------------------------------------------
// GameEvent: the observable sequence of state transitions
// ---------------------------------------------------------------------------

/// A game-state transition, published by the coordinator as it happens.
///
/// The order of events is the contract; the exact wording of the text
/// form is not. Observers can render these however they like (see
/// [`EventEncoder`](crate::EventEncoder)).
///
/// Serialized with an internal `"event"` tag so each JSON line is
/// self-describing:
///
/// ```json
/// {"event":"player_eliminated","round":1,"player":3}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    /// The music started for a new round.
    RoundStarted {
        round: u32,
        epoch: Epoch,
        players: usize,
        seats: usize,
    },

    /// The music stopped; players are racing.
    MusicStopped { round: u32, epoch: Epoch },

    /// A player found a seat this round.
    PlayerSeated { round: u32, player: PlayerId },

    /// A player was left standing and is out of the game.
    PlayerEliminated { round: u32, player: PlayerId },

    /// All racers reported in; counts for the next round are settled.
    RoundResolved {
        round: u32,
        players_remaining: usize,
        seats_remaining: usize,
    },

    /// The game ended. `winner` is `None` only when a round budget cut
    /// the game short with more than one player still standing.
    GameOver {
        winner: Option<PlayerId>,
        rounds: u32,
    },
}

impl GameEvent {
    /// The round this event belongs to, if any.
    pub fn round(&self) -> Option<u32> {
        match self {
            Self::RoundStarted { round, .. }
            | Self::MusicStopped { round, .. }
            | Self::PlayerSeated { round, .. }
            | Self::PlayerEliminated { round, .. }
            | Self::RoundResolved { round, .. } => Some(*round),
            Self::GameOver { .. } => None,
        }
    }
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RoundStarted {
                round,
                players,
                seats,
                ..
            } => write!(
                f,
                "Round {round}: music playing ({players} players, {seats} seats)"
            ),
            Self::MusicStopped { round, .. } => {
                write!(f, "Round {round}: music stopped")
            }
            Self::PlayerSeated { player, .. } => {
                write!(f, "Player {} found a seat", player.0)
            }
            Self::PlayerEliminated { player, .. } => {
                write!(f, "Player {} eliminated", player.0)
            }
            Self::RoundResolved {
                seats_remaining, ..
            } => write!(f, "Seats remaining: {seats_remaining}"),
            Self::GameOver {
                winner: Some(winner),
                rounds,
            } => write!(
                f,
                "Game over after {rounds} rounds: player {} wins",
                winner.0
            ),
            Self::GameOver {
                winner: None,
                rounds,
            } => write!(f, "Game over after {rounds} rounds: no winner"),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_id_display() {
        assert_eq!(PlayerId(3).to_string(), "P-3");
    }

    #[test]
    fn test_epoch_next_is_monotonic() {
        let e = Epoch::FIRST;
        assert_eq!(e.next(), Epoch(2));
        assert!(e.next() > e);
    }

    #[test]
    fn test_eliminated_line_names_player() {
        let event = GameEvent::PlayerEliminated {
            round: 1,
            player: PlayerId(4),
        };
        assert_eq!(event.to_string(), "Player 4 eliminated");
    }

    #[test]
    fn test_round_resolved_reports_seats() {
        let event = GameEvent::RoundResolved {
            round: 2,
            players_remaining: 2,
            seats_remaining: 1,
        };
        assert_eq!(event.to_string(), "Seats remaining: 1");
    }

    #[test]
    fn test_game_over_without_winner() {
        let event = GameEvent::GameOver {
            winner: None,
            rounds: 1,
        };
        assert!(event.to_string().contains("no winner"));
        assert_eq!(event.round(), None);
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_event_json_is_tagged() {
        let event = GameEvent::PlayerEliminated {
            round: 1,
            player: PlayerId(3),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "player_eliminated");
        assert_eq!(json["round"], 1);
        assert_eq!(json["player"], 3);
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_outcome_serializes_snake_case() {
        let json = serde_json::to_string(&Outcome::Eliminated).unwrap();
        assert_eq!(json, "\"eliminated\"");
    }
}
