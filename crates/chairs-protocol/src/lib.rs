//! Shared vocabulary for the musical chairs simulation.
//!
//! This crate defines the values that actors exchange and observers see:
//!
//! - **Types** ([`PlayerId`], [`Epoch`], [`Outcome`], [`GameEvent`]):
//!   identities, round counters, race results, and the event stream.
//! - **Encoders** ([`EventEncoder`] trait, [`TextEncoder`], [`JsonEncoder`]):
//!   how events become output lines.
//! - **Errors** ([`ProtocolError`]): what can go wrong while encoding.
//!
//! It knows nothing about tasks or synchronization; that lives in
//! `chairs-sync` and `chairs-game`.

mod codec;
mod error;
mod types;

pub use codec::{EventEncoder, TextEncoder};
#[cfg(feature = "json")]
pub use codec::JsonEncoder;
pub use error::ProtocolError;
pub use types::{Epoch, GameEvent, Outcome, PlayerId};

/// Output formats known to this build, for CLI parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// JSON lines.
    #[cfg(feature = "json")]
    Json,
}

impl EventFormat {
    /// Returns a boxed encoder for this format.
    pub fn encoder(self) -> Box<dyn EventEncoder> {
        match self {
            Self::Text => Box::new(TextEncoder),
            #[cfg(feature = "json")]
            Self::Json => Box::new(JsonEncoder),
        }
    }
}

impl std::str::FromStr for EventFormat {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            #[cfg(feature = "json")]
            "json" => Ok(Self::Json),
            other => Err(ProtocolError::UnsupportedFormat(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_format_parses_case_insensitively() {
        assert_eq!("TEXT".parse::<EventFormat>().unwrap(), EventFormat::Text);
        #[cfg(feature = "json")]
        assert_eq!("json".parse::<EventFormat>().unwrap(), EventFormat::Json);
    }

    #[test]
    fn test_event_format_rejects_unknown() {
        let err = "xml".parse::<EventFormat>().unwrap_err();
        assert!(matches!(err, ProtocolError::UnsupportedFormat(ref f) if f == "xml"));
    }
}
