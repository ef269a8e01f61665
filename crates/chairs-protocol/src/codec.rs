//! Encoders that turn [`GameEvent`]s into output lines.
//!
//! The core never prints anything. It publishes events, and whoever is
//! watching picks an encoder: [`TextEncoder`] for people reading a
//! terminal, [`JsonEncoder`] for tools reading a pipe. Adding another
//! format means implementing [`EventEncoder`], nothing else changes.

use crate::{GameEvent, ProtocolError};

/// Converts a game event into a single line of output (no trailing newline).
///
/// `Send + Sync + 'static` so one encoder can be moved into a spawned
/// task that drains the event channel.
pub trait EventEncoder: Send + Sync + 'static {
    /// Encodes one event.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Encode`] if the event can't be represented
    /// in this format.
    fn encode(&self, event: &GameEvent) -> Result<String, ProtocolError>;
}

// ---------------------------------------------------------------------------
// TextEncoder
// ---------------------------------------------------------------------------

/// Human-readable lines, one per event, using the event's `Display` form.
///
/// ```rust
/// use chairs_protocol::{EventEncoder, GameEvent, PlayerId, TextEncoder};
///
/// let line = TextEncoder
///     .encode(&GameEvent::PlayerEliminated { round: 1, player: PlayerId(2) })
///     .unwrap();
/// assert_eq!(line, "Player 2 eliminated");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TextEncoder;

impl EventEncoder for TextEncoder {
    fn encode(&self, event: &GameEvent) -> Result<String, ProtocolError> {
        Ok(event.to_string())
    }
}

// ---------------------------------------------------------------------------
// JsonEncoder
// ---------------------------------------------------------------------------

/// JSON lines via `serde_json`, behind the `json` feature (on by default).
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonEncoder;

#[cfg(feature = "json")]
impl EventEncoder for JsonEncoder {
    fn encode(&self, event: &GameEvent) -> Result<String, ProtocolError> {
        serde_json::to_string(event).map_err(ProtocolError::Encode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Epoch, PlayerId};

    #[test]
    fn test_text_encoder_uses_display() {
        let event = GameEvent::MusicStopped {
            round: 2,
            epoch: Epoch(2),
        };
        assert_eq!(TextEncoder.encode(&event).unwrap(), "Round 2: music stopped");
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_json_encoder_is_single_line() {
        let event = GameEvent::GameOver {
            winner: Some(PlayerId(1)),
            rounds: 3,
        };
        let line = JsonEncoder.encode(&event).unwrap();
        assert!(!line.contains('\n'));
        let decoded: GameEvent = serde_json::from_str(&line).unwrap();
        assert_eq!(decoded, event);
    }
}
