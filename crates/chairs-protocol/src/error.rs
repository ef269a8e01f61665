//! Error types for the protocol layer.
//!
//! Each crate in the workspace defines its own error enum. A
//! `ProtocolError` always means an event could not be turned into output;
//! it never says anything about the game itself, which reports through
//! `GameError` in `chairs-game`.

/// Errors that can occur while rendering game events.
///
/// `#[derive(thiserror::Error)]` generates the `std::error::Error`
/// implementation. Each `#[error("...")]` attribute is the `Display`
/// text for its variant, which is what ends up in logs and on stderr.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization of an event failed.
    ///
    /// Printing it shows e.g. "encode failed: key must be a string". The
    /// inner `serde_json::Error` is kept as-is so callers can still
    /// inspect it. The variant only exists when the `json` feature is on,
    /// because without it nothing in this crate can produce one.
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// The requested output format is not one this build supports.
    ///
    /// Returned by `EventFormat::from_str` for names like `"xml"`, and
    /// for `"json"` in a build without the `json` feature.
    #[error("unsupported event format: {0}")]
    UnsupportedFormat(String),
}
