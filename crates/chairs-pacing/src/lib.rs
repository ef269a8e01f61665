//! Round pacing for the musical chairs coordinator.
//!
//! Decides how long the music plays each round, how long a seated player
//! settles before the next round, and how long the coordinator is willing
//! to wait at the rendezvous before declaring the round broken.
//!
//! None of these timings is safety-relevant. Correctness comes from the
//! round signal and the rendezvous barrier; pacing only makes the game
//! watchable. A zero music duration is valid and is what tests use.
//!
//! # Integration
//!
//! The coordinator owns one [`Pacer`] and calls it at the top of every
//! round:
//!
//! ```ignore
//! while state.is_running() {
//!     let played = pacer.play_music().await;
//!     let epoch = signal.signal_stop();
//!     // collect, shrink, reset ...
//! }
//! ```

use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tokio::time;
use tracing::{debug, trace, warn};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Timing configuration for a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PacingConfig {
    /// How long the music plays before it stops. Default: 2 s.
    pub music: Duration,
    /// Random extra play time (0..jitter) added each round so players
    /// can't predict the stop. Default: 0.
    pub music_jitter: Duration,
    /// Pause a seated player takes before waiting on the next round.
    /// Default: 100 ms.
    pub settle: Duration,
    /// Upper bound on the rendezvous after each stop. `None` waits
    /// forever. Default: 5 s.
    pub rendezvous_timeout: Option<Duration>,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            music: Duration::from_secs(2),
            music_jitter: Duration::ZERO,
            settle: Duration::from_millis(100),
            rendezvous_timeout: Some(Duration::from_secs(5)),
        }
    }
}

impl PacingConfig {
    /// Longest music a round may play, jitter included.
    pub const MAX_MUSIC: Duration = Duration::from_secs(60);

    /// Longest settle delay a player may take.
    pub const MAX_SETTLE: Duration = Duration::from_secs(10);

    /// Slack a bounded rendezvous must leave on top of `settle`.
    ///
    /// A seated player can still be settling when the next stop is
    /// broadcast, so it reaches the rendezvous up to `settle` late.
    pub const RENDEZVOUS_MARGIN: Duration = Duration::from_secs(1);

    /// A config with no delays at all, for tests and benchmarks.
    pub fn instant() -> Self {
        Self {
            music: Duration::ZERO,
            music_jitter: Duration::ZERO,
            settle: Duration::ZERO,
            rendezvous_timeout: Some(Duration::from_secs(5)),
        }
    }

    /// Clamp out-of-range values so the config is safe to use.
    ///
    /// Called automatically by [`Pacer::new`]. Rules:
    /// - `music` capped to [`Self::MAX_MUSIC`].
    /// - `music + music_jitter` capped to [`Self::MAX_MUSIC`] by
    ///   shrinking the jitter.
    /// - `settle` capped to [`Self::MAX_SETTLE`].
    /// - A zero `rendezvous_timeout` becomes `None`; a round can't finish
    ///   in no time at all.
    /// - Any other `rendezvous_timeout` is raised to at least
    ///   `settle + RENDEZVOUS_MARGIN`, so a slow settle never times out
    ///   a healthy round.
    pub fn validated(mut self) -> Self {
        if self.music > Self::MAX_MUSIC {
            warn!(
                music_ms = self.music.as_millis() as u64,
                max_ms = Self::MAX_MUSIC.as_millis() as u64,
                "music duration exceeds maximum, clamping"
            );
            self.music = Self::MAX_MUSIC;
        }
        let headroom = Self::MAX_MUSIC - self.music;
        if self.music_jitter > headroom {
            warn!(
                jitter_ms = self.music_jitter.as_millis() as u64,
                headroom_ms = headroom.as_millis() as u64,
                "music jitter exceeds headroom, clamping"
            );
            self.music_jitter = headroom;
        }
        if self.settle > Self::MAX_SETTLE {
            warn!(
                settle_ms = self.settle.as_millis() as u64,
                max_ms = Self::MAX_SETTLE.as_millis() as u64,
                "settle delay exceeds maximum, clamping"
            );
            self.settle = Self::MAX_SETTLE;
        }
        if self.rendezvous_timeout == Some(Duration::ZERO) {
            warn!("zero rendezvous timeout, waiting without a bound instead");
            self.rendezvous_timeout = None;
        }
        if let Some(timeout) = self.rendezvous_timeout {
            let floor = self.settle + Self::RENDEZVOUS_MARGIN;
            if timeout < floor {
                warn!(
                    timeout_ms = timeout.as_millis() as u64,
                    settle_ms = self.settle.as_millis() as u64,
                    floor_ms = floor.as_millis() as u64,
                    "rendezvous timeout shorter than settle delay, raising"
                );
                self.rendezvous_timeout = Some(floor);
            }
        }
        self
    }
}

// ---------------------------------------------------------------------------
// Metrics
// ---------------------------------------------------------------------------

/// Running totals for how long the music has played.
#[derive(Debug, Clone, Default)]
pub struct PacingMetrics {
    /// Rounds of music played so far.
    pub rounds: u32,
    /// Total time spent playing music.
    pub total_music: Duration,
    /// Longest single round of music.
    pub max_music: Duration,
}

impl PacingMetrics {
    /// Mean music duration per round, or zero before the first round.
    pub fn avg_music(&self) -> Duration {
        if self.rounds == 0 {
            Duration::ZERO
        } else {
            self.total_music / self.rounds
        }
    }
}

// ---------------------------------------------------------------------------
// Pacer
// ---------------------------------------------------------------------------

/// Drives the coordinator's "music playing" phase.
pub struct Pacer {
    config: PacingConfig,
    metrics: PacingMetrics,
}

impl Pacer {
    /// Create a pacer from config (validated on the way in).
    pub fn new(config: PacingConfig) -> Self {
        let config = config.validated();
        debug!(
            music_ms = config.music.as_millis() as u64,
            jitter_ms = config.music_jitter.as_millis() as u64,
            settle_ms = config.settle.as_millis() as u64,
            "pacer created"
        );
        Self {
            config,
            metrics: PacingMetrics::default(),
        }
    }

    /// The music duration for the next round: base plus random jitter.
    pub fn next_music_duration(&self) -> Duration {
        let jitter_us = self.config.music_jitter.as_micros() as u64;
        let jitter = if jitter_us > 0 {
            Duration::from_micros(rand::rng().random_range(0..jitter_us))
        } else {
            Duration::ZERO
        };
        self.config.music + jitter
    }

    /// Let the music play for one round. Returns how long it played.
    pub async fn play_music(&mut self) -> Duration {
        let duration = self.next_music_duration();
        if !duration.is_zero() {
            time::sleep(duration).await;
        }

        self.metrics.rounds += 1;
        self.metrics.total_music += duration;
        if duration > self.metrics.max_music {
            self.metrics.max_music = duration;
        }
        trace!(
            round = self.metrics.rounds,
            played_ms = duration.as_millis() as u64,
            "music played"
        );
        duration
    }

    /// How long seated players settle between rounds.
    pub fn settle(&self) -> Duration {
        self.config.settle
    }

    /// The rendezvous bound, if any.
    pub fn rendezvous_timeout(&self) -> Option<Duration> {
        self.config.rendezvous_timeout
    }

    /// The validated config this pacer runs with.
    pub fn config(&self) -> &PacingConfig {
        &self.config
    }

    /// Snapshot of current metrics.
    pub fn metrics(&self) -> &PacingMetrics {
        &self.metrics
    }
}
