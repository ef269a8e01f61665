//! The musical chairs game: shared state and the actors that play it.
//!
//! One coordinator task and one task per player, sharing a [`GameState`],
//! a seat pool, and a round signal through `Arc` handles handed out by
//! [`spawn_game`]. Nothing is a process-wide static, so any number of
//! games can run side by side.
//!
//! # Key types
//!
//! - [`GameState`]: player/seat counts and the elimination rule
//! - [`GameConfig`]: player count, round budget, pacing
//! - [`spawn_game`] / [`GameHandle`]: start a game, abort it, join it
//! - [`GameReport`]: winner, rounds, elimination order
//! - [`PlayerState`] / [`CoordinatorPhase`]: the actor state machines

mod config;
mod coordinator;
mod error;
mod game;
mod player;
mod state;

pub use config::{CoordinatorPhase, GameConfig, PlayerState};
pub use coordinator::{EndReason, EventSender};
pub use error::{GameError, ProtocolViolation};
pub use game::{GameHandle, GameReport, run_game, spawn_game};
pub use player::{PlayerSummary, RaceResult};
pub use state::{GameSnapshot, GameState};
