//! Event printer: drains the game's event channel into a writer.
//!
//! Runs as its own task next to the game. It ends by itself once the
//! coordinator exits and drops its sender.

use chairs_protocol::{EventEncoder, GameEvent};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;

use crate::ChairsError;

/// Encodes every event from `events` and writes one line per event to
/// `out`, flushing after each so output keeps pace with the game.
///
/// Returns the number of lines written once the channel closes.
///
/// `out` is any [`AsyncWrite`]: `tokio::io::stdout()`, a file, a socket,
/// or a `Vec<u8>` in tests. The `Unpin` bound comes from the
/// [`AsyncWriteExt`] helpers, which pin the writer with `Pin::new` each
/// time they poll it.
///
/// # Errors
/// Stops at the first encode or write failure. The game keeps running;
/// its events are simply no longer printed.
pub async fn print_events<W>(
    mut events: mpsc::UnboundedReceiver<GameEvent>,
    encoder: &dyn EventEncoder,
    mut out: W,
) -> Result<usize, ChairsError>
where
    W: AsyncWrite + Unpin,
{
    let mut lines = 0;
    while let Some(event) = events.recv().await {
        let mut line = encoder.encode(&event)?;
        line.push('\n');
        out.write_all(line.as_bytes()).await?;
        out.flush().await?;
        lines += 1;
    }
    tracing::debug!(lines, "event stream closed");
    Ok(lines)
}
