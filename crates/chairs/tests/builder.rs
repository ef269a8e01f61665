//! Integration tests for the builder and printed game output.

use std::time::Duration;

use chairs::prelude::*;
use tokio::time::timeout;

// =========================================================================
// Helpers
// =========================================================================

/// A builder with every delay removed.
fn fast(players: usize) -> MusicalChairsBuilder {
    MusicalChairs::builder()
        .players(players)
        .pacing(PacingConfig::instant())
}

const LIMIT: Duration = Duration::from_secs(10);

// =========================================================================
// Builder
// =========================================================================

#[test]
fn test_builder_defaults() {
    let builder = MusicalChairs::builder();
    assert_eq!(builder.config().players, 4);
    assert_eq!(builder.config().max_rounds, None);
    assert_eq!(builder.config().pacing, PacingConfig::default());
}

#[test]
fn test_builder_setters() {
    let builder = MusicalChairs::builder()
        .players(7)
        .max_rounds(Some(3))
        .music(Duration::from_millis(10))
        .music_jitter(Duration::from_millis(5))
        .settle(Duration::ZERO)
        .rendezvous_timeout(None);

    let config = builder.config();
    assert_eq!(config.players, 7);
    assert_eq!(config.max_rounds, Some(3));
    assert_eq!(config.pacing.music, Duration::from_millis(10));
    assert_eq!(config.pacing.music_jitter, Duration::from_millis(5));
    assert_eq!(config.pacing.settle, Duration::ZERO);
    assert_eq!(config.pacing.rendezvous_timeout, None);
}

#[test]
fn test_build_rejects_zero_players() {
    let err = MusicalChairs::builder().players(0).build().unwrap_err();
    assert!(matches!(err, ChairsError::Game(_)));
}

// =========================================================================
// Running
// =========================================================================

#[tokio::test]
async fn test_run_returns_report() {
    let report = timeout(LIMIT, fast(5).build().unwrap().run())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(report.rounds, 4);
    assert_eq!(report.end, EndReason::Winner);
    assert!(report.winner.is_some());
}

#[tokio::test]
async fn test_run_printing_text_output() {
    let mut out: Vec<u8> = Vec::new();
    let report = timeout(
        LIMIT,
        fast(4).build().unwrap().run_printing(&TextEncoder, &mut out),
    )
    .await
    .unwrap()
    .unwrap();

    let text = String::from_utf8(out).unwrap();
    let eliminated: Vec<_> = text
        .lines()
        .filter(|l| l.ends_with(" eliminated"))
        .collect();
    assert_eq!(eliminated.len(), 3);

    let seats: Vec<_> = text
        .lines()
        .filter(|l| l.starts_with("Seats remaining:"))
        .collect();
    assert_eq!(
        seats,
        vec!["Seats remaining: 2", "Seats remaining: 1", "Seats remaining: 0"]
    );

    let winner = report.winner.unwrap();
    assert_eq!(
        text.lines().last().unwrap(),
        format!("Game over after 3 rounds: player {} wins", winner.0)
    );
}

#[tokio::test]
async fn test_run_printing_json_lines() {
    let mut out: Vec<u8> = Vec::new();
    timeout(
        LIMIT,
        fast(3).build().unwrap().run_printing(&JsonEncoder, &mut out),
    )
    .await
    .unwrap()
    .unwrap();

    let text = String::from_utf8(out).unwrap();
    let events: Vec<GameEvent> = text
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();

    assert!(matches!(
        events.first(),
        Some(GameEvent::RoundStarted { round: 1, .. })
    ));
    assert!(matches!(
        events.last(),
        Some(GameEvent::GameOver { rounds: 2, winner: Some(_) })
    ));
}

#[tokio::test]
async fn test_spawn_and_abort() {
    let handle = MusicalChairs::builder()
        .players(4)
        .pacing(PacingConfig {
            music: Duration::from_secs(60),
            ..PacingConfig::instant()
        })
        .build()
        .unwrap()
        .spawn(None)
        .unwrap();

    tokio::time::sleep(Duration::from_millis(20)).await;
    handle.abort();

    let report = timeout(Duration::from_secs(1), handle.join())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(report.end, EndReason::Aborted);
}
