//! Integration tests for full games: coordinator plus player actors.
//!
//! Most games run with `PacingConfig::instant()` so a round costs no
//! wall-clock time; the pacing test uses `start_paused = true` to check
//! timing on the virtual clock.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use chairs_pacing::PacingConfig;
use chairs_protocol::{GameEvent, PlayerId};
use chairs_game::{
    EndReason, GameConfig, GameError, GameReport, ProtocolViolation, run_game, spawn_game,
};
use tokio::sync::mpsc;
use tokio::time::{Instant, timeout};

// =========================================================================
// Helpers
// =========================================================================

fn instant_config(players: usize) -> GameConfig {
    GameConfig {
        players,
        max_rounds: None,
        pacing: PacingConfig::instant(),
    }
}

/// Runs a game to completion and returns its report and every event.
async fn play(config: GameConfig) -> (GameReport, Vec<GameEvent>) {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let report = timeout(Duration::from_secs(10), run_game(config, Some(tx)))
        .await
        .expect("game did not finish in time")
        .expect("game failed");

    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    (report, events)
}

/// `(players_remaining, seats_remaining)` after each round, in order.
fn resolved_counts(events: &[GameEvent]) -> Vec<(usize, usize)> {
    events
        .iter()
        .filter_map(|e| match e {
            GameEvent::RoundResolved {
                players_remaining,
                seats_remaining,
                ..
            } => Some((*players_remaining, *seats_remaining)),
            _ => None,
        })
        .collect()
}

fn eliminations_per_round(events: &[GameEvent]) -> BTreeMap<u32, usize> {
    let mut counts = BTreeMap::new();
    for event in events {
        if let GameEvent::PlayerEliminated { round, .. } = event {
            *counts.entry(*round).or_insert(0) += 1;
        }
    }
    counts
}

// =========================================================================
// End-to-end
// =========================================================================

#[tokio::test]
async fn test_four_player_game_end_to_end() {
    let (report, events) = play(instant_config(4)).await;

    // Round 1 opens with 4 players and 3 seats.
    assert!(matches!(
        events.first(),
        Some(GameEvent::RoundStarted {
            round: 1,
            players: 4,
            seats: 3,
            ..
        })
    ));

    assert_eq!(resolved_counts(&events), vec![(3, 2), (2, 1), (1, 0)]);
    assert_eq!(report.rounds, 3);
    assert_eq!(report.end, EndReason::Winner);
    assert_eq!(report.eliminations.len(), 3);

    let winner = report.winner.expect("a four-player game has a winner");
    assert!(!report.eliminations.contains(&winner));

    let logged: Vec<_> = events
        .iter()
        .filter(|e| matches!(e, GameEvent::PlayerEliminated { .. }))
        .collect();
    assert_eq!(logged.len(), 3);

    assert_eq!(
        events.last(),
        Some(&GameEvent::GameOver {
            winner: Some(winner),
            rounds: 3
        })
    );
}

#[tokio::test]
async fn test_every_round_eliminates_exactly_one() {
    let (_, events) = play(instant_config(8)).await;
    let counts = eliminations_per_round(&events);
    assert_eq!(counts.len(), 7);
    assert!(counts.values().all(|&n| n == 1), "{counts:?}");
}

#[tokio::test]
async fn test_round_counts_shrink_by_one() {
    let (_, events) = play(instant_config(10)).await;
    let counts = resolved_counts(&events);

    let mut expected_players = 10;
    for (players, seats) in counts {
        expected_players -= 1;
        assert_eq!(players, expected_players);
        assert_eq!(seats, players - 1);
    }
    assert_eq!(expected_players, 1);
}

#[tokio::test]
async fn test_game_terminates_in_n_minus_one_rounds() {
    for n in 2..=9 {
        let (report, _) = play(instant_config(n)).await;
        assert_eq!(report.rounds as usize, n - 1, "n = {n}");
        assert!(report.winner.is_some());
    }
}

#[tokio::test]
async fn test_no_player_is_eliminated_twice() {
    let (report, _) = play(instant_config(12)).await;
    let unique: HashSet<PlayerId> = report.eliminations.iter().copied().collect();
    assert_eq!(unique.len(), report.eliminations.len());
    assert_eq!(unique.len(), 11);
}

#[tokio::test]
async fn test_every_racer_reports_each_round() {
    let (_, events) = play(instant_config(5)).await;
    for round in 1..=4u32 {
        let racers = events
            .iter()
            .filter(|e| {
                matches!(
                    e,
                    GameEvent::PlayerSeated { round: r, .. }
                        | GameEvent::PlayerEliminated { round: r, .. }
                        if *r == round
                )
            })
            .count();
        assert_eq!(racers, 5 - round as usize + 1, "round {round}");
    }
}

#[tokio::test]
async fn test_player_summaries_match_report() {
    let (report, _) = play(instant_config(6)).await;
    assert_eq!(report.players.len(), 6);

    let winner = report.winner.unwrap();
    for summary in &report.players {
        if summary.id == winner {
            assert!(summary.survived());
            assert_eq!(summary.rounds_survived, 5);
        } else {
            let epoch = summary.eliminated_in.expect("loser has an elimination epoch");
            // Survived every round before the one it went out in.
            assert_eq!(summary.rounds_survived as u64, epoch.0 - 1);
        }
    }
}

#[tokio::test]
async fn test_single_player_wins_without_playing() {
    let (report, events) = play(instant_config(1)).await;
    assert_eq!(report.rounds, 0);
    assert_eq!(report.winner, Some(PlayerId(1)));
    assert!(report.eliminations.is_empty());
    assert_eq!(
        events,
        vec![GameEvent::GameOver {
            winner: Some(PlayerId(1)),
            rounds: 0
        }]
    );
}

#[tokio::test]
async fn test_round_budget_ends_game_early() {
    let config = GameConfig {
        max_rounds: Some(2),
        ..instant_config(5)
    };
    let (report, events) = play(config).await;

    assert_eq!(report.end, EndReason::RoundBudget);
    assert_eq!(report.rounds, 2);
    assert_eq!(report.winner, None);
    assert_eq!(report.eliminations.len(), 2);
    assert_eq!(
        events.last(),
        Some(&GameEvent::GameOver {
            winner: None,
            rounds: 2
        })
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_parallel_players_on_multi_thread_runtime() {
    for _ in 0..5 {
        let (report, events) = play(instant_config(16)).await;
        assert_eq!(report.rounds, 15);
        assert!(eliminations_per_round(&events).values().all(|&n| n == 1));
    }
}

// =========================================================================
// Pacing
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_rounds_follow_music_duration() {
    let config = GameConfig {
        players: 4,
        max_rounds: None,
        pacing: PacingConfig {
            music: Duration::from_secs(2),
            music_jitter: Duration::ZERO,
            settle: Duration::from_millis(100),
            rendezvous_timeout: Some(Duration::from_secs(5)),
        },
    };

    let start = Instant::now();
    let (report, _) = play(config).await;
    assert_eq!(report.rounds, 3);
    assert!(start.elapsed() >= Duration::from_secs(6));
}

#[tokio::test(start_paused = true)]
async fn test_slow_settle_does_not_break_rendezvous() {
    // Survivors of round 1 are still settling when round 2's music stops.
    let config = GameConfig {
        players: 3,
        max_rounds: None,
        pacing: PacingConfig {
            music: Duration::ZERO,
            music_jitter: Duration::ZERO,
            settle: Duration::from_secs(6),
            rendezvous_timeout: Some(Duration::from_secs(5)),
        },
    };

    let start = Instant::now();
    let (report, events) = play(config).await;
    assert_eq!(report.end, EndReason::Winner);
    assert_eq!(report.rounds, 2);
    assert_eq!(resolved_counts(&events), vec![(2, 1), (1, 0)]);

    // The winner's final settle is cut short by the shutdown.
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_secs(6));
    assert!(elapsed < Duration::from_secs(12), "{elapsed:?}");
}

// =========================================================================
// Shutdown and errors
// =========================================================================

#[tokio::test]
async fn test_abort_releases_all_waiting_players() {
    let config = GameConfig {
        players: 6,
        max_rounds: None,
        pacing: PacingConfig {
            music: Duration::from_secs(60),
            ..PacingConfig::instant()
        },
    };
    let handle = spawn_game(config, None).unwrap();

    // Let every player reach WaitingForStop while the music plays.
    tokio::time::sleep(Duration::from_millis(50)).await;
    handle.abort();

    let report = timeout(Duration::from_secs(1), handle.join())
        .await
        .expect("players did not exit after abort")
        .unwrap();

    assert_eq!(report.end, EndReason::Aborted);
    assert_eq!(report.winner, None);
    assert!(report.eliminations.is_empty());
    assert_eq!(report.players.len(), 6);
    assert!(report.players.iter().all(|p| p.survived()));
}

#[tokio::test]
async fn test_abort_is_visible_in_snapshot() {
    let config = GameConfig {
        pacing: PacingConfig {
            music: Duration::from_secs(60),
            ..PacingConfig::instant()
        },
        ..instant_config(3)
    };
    let handle = spawn_game(config, None).unwrap();
    assert!(handle.snapshot().running);

    handle.abort();
    assert!(!handle.snapshot().running);
    assert!(!handle.state().is_running());

    timeout(Duration::from_secs(1), handle.join())
        .await
        .unwrap()
        .unwrap();
}

#[tokio::test]
async fn test_spawn_rejects_invalid_config() {
    let result = spawn_game(instant_config(0), None);
    assert!(matches!(result, Err(GameError::InvalidConfig(_))));
}

#[tokio::test(start_paused = true)]
async fn test_violation_in_a_player_aborts_the_game() {
    let config = GameConfig {
        pacing: PacingConfig {
            music: Duration::from_secs(10),
            ..PacingConfig::instant()
        },
        ..instant_config(2)
    };
    let handle = spawn_game(config, None).unwrap();
    let state = Arc::clone(handle.state());

    // Knock player 1 out behind the game's back while the music plays.
    // Whoever misses the seat then breaks a rule when eliminating itself.
    tokio::time::sleep(Duration::from_secs(1)).await;
    state.eliminate(PlayerId(1)).unwrap();

    let err = timeout(Duration::from_secs(30), handle.join())
        .await
        .expect("actors did not exit after a fatal error")
        .unwrap_err();
    assert!(
        matches!(
            err,
            GameError::Violation(
                ProtocolViolation::AlreadyEliminated(PlayerId(1))
                    | ProtocolViolation::LastPlayer(PlayerId(2))
            )
        ),
        "{err}"
    );

    assert!(!state.is_running());
    // Every actor has exited and dropped its handle on the state.
    assert_eq!(Arc::strong_count(&state), 1);
}
