//! Unified error type for the musical chairs crates.

use chairs_game::GameError;
use chairs_protocol::ProtocolError;

/// Top-level error that wraps every crate-specific error.
///
/// Programs built on the `chairs` crate handle this one type instead of
/// importing an error from each layer. `#[from]` on each variant
/// generates a `From` impl, so `?` converts sub-crate errors directly.
///
/// `#[error(transparent)]` forwards `Display` and `source()` to the
/// wrapped error unchanged, so a `GameError` prints the same whether or
/// not it went through this wrapper.
#[derive(Debug, thiserror::Error)]
pub enum ChairsError {
    /// The game failed: invalid config, protocol violation, or a broken
    /// rendezvous.
    #[error(transparent)]
    Game(#[from] GameError),

    /// An event couldn't be encoded.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// Writing event output failed.
    #[error("output failed: {0}")]
    Io(#[from] std::io::Error),
}

impl ChairsError {
    /// Whether this error means the round protocol itself broke, as
    /// opposed to bad input or an output failure.
    pub fn is_protocol_violation(&self) -> bool {
        matches!(
            self,
            Self::Game(GameError::Violation(_)) | Self::Game(GameError::Sync(_))
        )
    }
}
