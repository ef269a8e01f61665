//! Error types for the synchronization layer.

use chairs_protocol::{Epoch, PlayerId};

/// Errors raised by the round primitives.
///
/// All of these point at a defect in how the primitives are being driven
/// (a synchronization bug), not at a runtime condition worth retrying.
///
/// Unlike most error enums this one derives `Clone`, `PartialEq` and
/// `Eq`: every field is a small `Copy` id or count, so tests can compare
/// a returned error against an expected value with `assert_eq!` instead
/// of pattern matching. The named fields also show up in the
/// `#[error(...)]` messages through `{field}` interpolation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyncError {
    /// `reset` was asked to move the epoch backwards or keep it in place.
    #[error("epoch must advance: current {current}, requested {requested}")]
    EpochRegression { current: Epoch, requested: Epoch },

    /// Every sender is gone before the round's reports were all in.
    #[error("barrier closed during {epoch}: {arrived}/{expected} arrived")]
    BarrierClosed {
        epoch: Epoch,
        arrived: usize,
        expected: usize,
    },

    /// The rendezvous did not complete in time.
    ///
    /// `arrived` counts the reports that did make it, so the message
    /// reads like "rendezvous for E-2 timed out: 0/2 arrived".
    #[error("rendezvous for {epoch} timed out: {arrived}/{expected} arrived")]
    RendezvousTimeout {
        epoch: Epoch,
        arrived: usize,
        expected: usize,
    },

    /// A player reported for a round other than the one being collected.
    #[error("player {player} reported for {got} while collecting {expected}")]
    StaleArrival {
        player: PlayerId,
        expected: Epoch,
        got: Epoch,
    },

    /// A player reported twice for the same round.
    #[error("player {player} reported twice for {epoch}")]
    DuplicateArrival { player: PlayerId, epoch: Epoch },
}
