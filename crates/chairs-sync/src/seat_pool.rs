//! The seat pool: a lock-free counter that players race to decrement.

use std::sync::atomic::{AtomicUsize, Ordering};

/// A fixed-capacity pool of seats with a non-blocking acquire.
///
/// There is no blocking acquire and no release: a seat, once taken, stays
/// taken until the coordinator calls [`reset`](Self::reset)
/// between rounds. Who wins a tie is decided by the order in which the
/// atomic decrements land; there is no fairness guarantee.
#[derive(Debug)]
pub struct SeatPool {
    available: AtomicUsize,
    capacity: AtomicUsize,
}

impl SeatPool {
    /// Creates a pool with `capacity` free seats.
    pub fn new(capacity: usize) -> Self {
        Self {
            available: AtomicUsize::new(capacity),
            capacity: AtomicUsize::new(capacity),
        }
    }

    /// Takes one seat if any is free.
    ///
    /// Returns `true` and decrements the count when at least one seat was
    /// available before the call. Returns `false` with no state change
    /// otherwise; `available` never wraps below zero.
    ///
    /// `fetch_update` runs a compare-and-swap loop: it reads the count,
    /// applies the closure, and retries if another player changed the
    /// count in between. The closure returns `None` for an empty pool
    /// (`checked_sub` on zero), which makes `fetch_update` give up and
    /// return `Err` without writing anything.
    ///
    /// `AcqRel` on success pairs with the `Release` stores in
    /// [`reset`](Self::reset): a player that wins a seat sees the
    /// capacity the coordinator set for this round.
    pub fn try_acquire(&self) -> bool {
        self.available
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                n.checked_sub(1)
            })
            .is_ok()
    }

    /// Refills the pool to a new capacity.
    ///
    /// Must only be called while no player can be racing, i.e. after the
    /// round's rendezvous has completed and before the next stop signal.
    pub fn reset(&self, capacity: usize) {
        self.capacity.store(capacity, Ordering::Release);
        self.available.store(capacity, Ordering::Release);
        tracing::debug!(capacity, "seat pool reset");
    }

    /// Seats still free this round.
    pub fn available(&self) -> usize {
        self.available.load(Ordering::Acquire)
    }

    /// Seats the pool was last filled with.
    pub fn capacity(&self) -> usize {
        self.capacity.load(Ordering::Acquire)
    }

}
