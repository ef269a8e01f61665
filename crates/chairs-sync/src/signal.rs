//! The round signal: a broadcast "music stopped" flag with an epoch.
//!
//! Backed by a `tokio::sync::watch` cell. The stop flag, the epoch, and
//! the shutdown flag live in one value that is replaced atomically, so a
//! waiter can never observe a stop flag paired with the wrong epoch, and
//! the check-then-wait in [`RoundSignal::wait_for_stop`] can't lose a
//! wakeup: `wait_for` inspects the current value before it suspends.

use chairs_protocol::Epoch;
use tokio::sync::watch;
use tracing::trace;

use crate::SyncError;

/// What a waiting player woke up to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wake {
    /// The music stopped for this epoch. Go race.
    Stopped(Epoch),
    /// The game is over. Exit.
    Shutdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SignalState {
    epoch: Epoch,
    music_stopped: bool,
    shutdown: bool,
}

/// Broadcast wake primitive shared by the coordinator and every player.
///
/// Only the coordinator mutates it (`signal_stop`, `reset`, `shutdown`);
/// players only wait.
#[derive(Debug)]
pub struct RoundSignal {
    state: watch::Sender<SignalState>,
}

impl RoundSignal {
    /// Creates a signal at [`Epoch::FIRST`] with the music playing.
    pub fn new() -> Self {
        Self::starting_at(Epoch::FIRST)
    }

    /// Creates a signal at the given epoch with the music playing.
    pub fn starting_at(epoch: Epoch) -> Self {
        let (state, _) = watch::channel(SignalState {
            epoch,
            music_stopped: false,
            shutdown: false,
        });
        Self { state }
    }

    /// Blocks until the music stops for `expected` or a later epoch.
    ///
    /// A stop still standing from an earlier epoch is ignored and the
    /// caller keeps waiting. Returns [`Wake::Shutdown`] as soon as the
    /// signal is shut down, whether or not the music ever stopped.
    pub async fn wait_for_stop(&self, expected: Epoch) -> Wake {
        let mut rx = self.state.subscribe();
        let result = rx
            .wait_for(|s| {
                if s.shutdown {
                    return true;
                }
                if s.music_stopped && s.epoch < expected {
                    trace!(
                        current = %s.epoch,
                        %expected,
                        "spurious wake on stale stop, waiting again"
                    );
                }
                s.music_stopped && s.epoch >= expected
            })
            .await
            .map(|s| *s);

        match result {
            Ok(s) if s.shutdown => Wake::Shutdown,
            Ok(s) => Wake::Stopped(s.epoch),
            // The sender lives as long as `self`, so this can't happen
            // while we're borrowed; treat it as shutdown regardless.
            Err(_) => Wake::Shutdown,
        }
    }

    /// Stops the music for the current epoch and wakes every waiter.
    ///
    /// Returns the epoch that was stopped.
    pub fn signal_stop(&self) -> Epoch {
        let mut stopped = self.state.borrow().epoch;
        self.state.send_modify(|s| {
            s.music_stopped = true;
            stopped = s.epoch;
        });
        trace!(epoch = %stopped, "music stopped");
        stopped
    }

    /// Clears the stop flag and advances to `new_epoch`.
    ///
    /// Call only after every racer for the current epoch has reported in.
    ///
    /// # Errors
    /// Returns [`SyncError::EpochRegression`] if `new_epoch` is not
    /// strictly greater than the current epoch. The signal is unchanged.
    pub fn reset(&self, new_epoch: Epoch) -> Result<(), SyncError> {
        let mut result = Ok(());
        self.state.send_if_modified(|s| {
            if new_epoch <= s.epoch {
                result = Err(SyncError::EpochRegression {
                    current: s.epoch,
                    requested: new_epoch,
                });
                return false;
            }
            s.epoch = new_epoch;
            s.music_stopped = false;
            true
        });
        if result.is_ok() {
            trace!(epoch = %new_epoch, "round signal reset");
        }
        result
    }

    /// Releases every waiter, now and in the future, with [`Wake::Shutdown`].
    ///
    /// Idempotent.
    pub fn shutdown(&self) {
        self.state.send_if_modified(|s| {
            if s.shutdown {
                return false;
            }
            s.shutdown = true;
            true
        });
    }

    /// Resolves once [`shutdown`](Self::shutdown) has been called.
    ///
    /// Meant for a `tokio::select!` branch next to work that should be
    /// abandoned when the game is torn down.
    pub async fn wait_for_shutdown(&self) {
        let mut rx = self.state.subscribe();
        // Err means the sender is gone, which is as final as a shutdown.
        let _ = rx.wait_for(|s| s.shutdown).await;
    }

    /// The current epoch.
    pub fn epoch(&self) -> Epoch {
        self.state.borrow().epoch
    }

    /// Whether the music is stopped for the current epoch.
    pub fn is_stopped(&self) -> bool {
        self.state.borrow().music_stopped
    }

    /// Whether [`shutdown`](Self::shutdown) has been called.
    pub fn is_shutdown(&self) -> bool {
        self.state.borrow().shutdown
    }
}

impl Default for RoundSignal {
    fn default() -> Self {
        Self::new()
    }
}
