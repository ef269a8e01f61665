//! Error types for the game layer.

use chairs_protocol::PlayerId;
use chairs_sync::SyncError;

/// An invariant breach observed by an actor.
///
/// Each of these means the round protocol itself is broken, not that
/// something went wrong at runtime. They abort the game.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolViolation {
    /// The player was already eliminated in an earlier round.
    #[error("player {0} already eliminated")]
    AlreadyEliminated(PlayerId),

    /// No player with this id was ever part of the game.
    #[error("player {0} is not in this game")]
    UnknownPlayer(PlayerId),

    /// Eliminating this player would leave nobody in the game.
    #[error("player {0} is the last one standing and can't be eliminated")]
    LastPlayer(PlayerId),

    /// `shrink_seats` was called with no seats left.
    #[error("no seats left to remove")]
    SeatsExhausted,

    /// Between rounds, seats must be exactly one fewer than players.
    #[error("seat invariant broken: {players} players, {seats} seats")]
    SeatInvariant { players: usize, seats: usize },

    /// A round must eliminate exactly one player.
    #[error("round {round} eliminated {eliminated} players, expected 1")]
    EliminationCount { round: u32, eliminated: usize },
}

/// Errors that can end a game.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    /// An actor observed an invariant breach.
    #[error("protocol violation: {0}")]
    Violation(#[from] ProtocolViolation),

    /// The round primitives were misused or the rendezvous failed.
    #[error("synchronization failure: {0}")]
    Sync(#[from] SyncError),

    /// The config can't run.
    #[error("invalid game config: {0}")]
    InvalidConfig(String),

    /// An actor task panicked or was cancelled.
    #[error("actor failed: {0}")]
    ActorFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use chairs_protocol::Epoch;

    #[test]
    fn test_violation_converts_into_game_error() {
        let err: GameError = ProtocolViolation::SeatsExhausted.into();
        assert!(matches!(
            err,
            GameError::Violation(ProtocolViolation::SeatsExhausted)
        ));
    }

    #[test]
    fn test_sync_error_converts_into_game_error() {
        let err: GameError = SyncError::RendezvousTimeout {
            epoch: Epoch(2),
            arrived: 1,
            expected: 3,
        }
        .into();
        assert!(err.to_string().contains("1/3"));
    }

    #[test]
    fn test_already_eliminated_message_names_player() {
        let msg = ProtocolViolation::AlreadyEliminated(PlayerId(7)).to_string();
        assert!(msg.contains("P-7"));
    }
}
