//! # Musical Chairs
//!
//! N player actors race for N−1 seats every time the music stops; one
//! player goes out per round until a single winner is left.
//!
//! The game is a concurrency exercise: a coordinator task and one task per
//! player synchronize through a resizable seat pool, an epoch-tagged
//! broadcast signal, and a rendezvous barrier. This crate bundles the
//! layers behind one builder and one error type:
//!
//! - `chairs-protocol`: ids, events, encoders
//! - `chairs-sync`: seat pool, round signal, barrier
//! - `chairs-pacing`: music and settle timing
//! - `chairs-game`: game state and the actors
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chairs::prelude::*;
//!
//! # async fn demo() -> Result<(), ChairsError> {
//! let report = MusicalChairs::builder().players(4).build()?.run().await?;
//! assert_eq!(report.rounds, 3);
//! # Ok(())
//! # }
//! ```

mod builder;
mod error;
mod logging;
mod printer;

pub use builder::{MusicalChairs, MusicalChairsBuilder};
pub use error::ChairsError;
pub use logging::init_tracing;
pub use printer::print_events;

pub use chairs_game as game;
pub use chairs_pacing as pacing;
pub use chairs_protocol as protocol;
pub use chairs_sync as sync;

pub mod prelude {
    //! The types most programs need.

    pub use crate::{ChairsError, MusicalChairs, MusicalChairsBuilder, init_tracing};
    pub use chairs_game::{EndReason, GameConfig, GameHandle, GameReport};
    pub use chairs_pacing::PacingConfig;
    pub use chairs_protocol::{
        EventEncoder, EventFormat, GameEvent, JsonEncoder, PlayerId, TextEncoder,
    };
}
