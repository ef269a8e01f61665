//! Rendezvous barrier: the coordinator waits for every racer to report.
//!
//! Players hold a cloneable [`BarrierSender`]; the coordinator owns the
//! single [`RoundBarrier`]. Each round the coordinator calls
//! [`RoundBarrier::collect`] with the number of players who were racing,
//! and only moves on once that many arrivals tagged with the round's
//! epoch are in.

use std::collections::HashSet;
use std::time::Duration;

use chairs_protocol::{Epoch, PlayerId};
use tokio::sync::mpsc;
use tokio::time::{self, Instant};

use crate::SyncError;

/// One player's report for one round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arrival<T> {
    /// Who is reporting.
    pub player: PlayerId,
    /// The round being reported on.
    pub epoch: Epoch,
    /// What happened to the player this round.
    pub payload: T,
}

/// Creates a connected sender/barrier pair.
pub fn round_barrier<T>() -> (BarrierSender<T>, RoundBarrier<T>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (BarrierSender { tx }, RoundBarrier { rx })
}

/// Player-side handle. Cheap to clone: one per player.
#[derive(Debug)]
pub struct BarrierSender<T> {
    tx: mpsc::UnboundedSender<Arrival<T>>,
}

impl<T> Clone for BarrierSender<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<T> BarrierSender<T> {
    /// Reports this player's arrival for `epoch`. Never blocks.
    ///
    /// Returns `false` if the coordinator is gone, in which case nobody
    /// is listening and the player should stop.
    pub fn arrive(&self, player: PlayerId, epoch: Epoch, payload: T) -> bool {
        self.tx
            .send(Arrival {
                player,
                epoch,
                payload,
            })
            .is_ok()
    }
}

/// Coordinator-side end of the rendezvous.
#[derive(Debug)]
pub struct RoundBarrier<T> {
    rx: mpsc::UnboundedReceiver<Arrival<T>>,
}

impl<T> RoundBarrier<T> {
    /// Waits for `expected` distinct players to arrive for `epoch`.
    ///
    /// Arrivals are returned in the order they were received. With a
    /// `timeout`, the whole collection must finish within that window.
    ///
    /// # Errors
    /// - [`SyncError::StaleArrival`] if an arrival carries another epoch.
    /// - [`SyncError::DuplicateArrival`] if a player reports twice.
    /// - [`SyncError::BarrierClosed`] if every sender is dropped first.
    /// - [`SyncError::RendezvousTimeout`] if the window elapses first.
    pub async fn collect(
        &mut self,
        epoch: Epoch,
        expected: usize,
        timeout: Option<Duration>,
    ) -> Result<Vec<Arrival<T>>, SyncError> {
        let deadline = timeout.map(|t| Instant::now() + t);
        let mut arrivals = Vec::with_capacity(expected);
        let mut seen = HashSet::with_capacity(expected);

        while arrivals.len() < expected {
            let next = match deadline {
                Some(deadline) => match time::timeout_at(deadline, self.rx.recv()).await {
                    Ok(next) => next,
                    Err(_) => {
                        return Err(SyncError::RendezvousTimeout {
                            epoch,
                            arrived: arrivals.len(),
                            expected,
                        });
                    }
                },
                None => self.rx.recv().await,
            };

            let Some(arrival) = next else {
                return Err(SyncError::BarrierClosed {
                    epoch,
                    arrived: arrivals.len(),
                    expected,
                });
            };

            if arrival.epoch != epoch {
                return Err(SyncError::StaleArrival {
                    player: arrival.player,
                    expected: epoch,
                    got: arrival.epoch,
                });
            }
            if !seen.insert(arrival.player) {
                return Err(SyncError::DuplicateArrival {
                    player: arrival.player,
                    epoch,
                });
            }

            tracing::trace!(
                player = %arrival.player,
                %epoch,
                arrived = arrivals.len() + 1,
                expected,
                "rendezvous arrival"
            );
            arrivals.push(arrival);
        }

        Ok(arrivals)
    }
}
