//! Synchronization primitives for a round-based musical chairs game.
//!
//! Three pieces, each owned by the game and shared with actors through
//! an `Arc` (or a channel endpoint) handed out at construction time:
//!
//! - [`SeatPool`]: a non-blocking, resizable pool of seats. Players race
//!   on [`SeatPool::try_acquire`]; the first `capacity` callers win.
//! - [`RoundSignal`]: a broadcast "music stopped" condition tagged with
//!   an [`Epoch`](chairs_protocol::Epoch). Also carries the shutdown
//!   notification so no player waits forever after the game ends.
//! - [`RoundBarrier`]: the rendezvous the coordinator blocks on until
//!   every racer for the current epoch has reported in.
//!
//! # Round handshake
//!
//! ```text
//! coordinator                      player (x N)
//! ───────────                      ────────────
//!                                  signal.wait_for_stop(epoch)
//! signal.signal_stop()  ─────────▶ wakes
//!                                  pool.try_acquire()
//! barrier.collect(epoch, N) ◀───── arrival.arrive(id, epoch, outcome)
//! pool.reset(N - 2)
//! signal.reset(epoch + 1)
//! ```

mod barrier;
mod error;
mod seat_pool;
mod signal;

pub use barrier::{Arrival, BarrierSender, RoundBarrier, round_barrier};
pub use error::SyncError;
pub use seat_pool::SeatPool;
pub use signal::{RoundSignal, Wake};
