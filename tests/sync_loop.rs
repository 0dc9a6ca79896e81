//! Integration tests for the synchronization loop on a paused clock.

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use std::time::Duration;

use tokio::time::{Instant, sleep};

use skirmish::game::{CellContent, GameReport, GameStatus, Position, Terrain};
use skirmish::source::ScriptedSource;
use skirmish::{LoopExit, Session, SyncConfig, SyncError, SyncPhase, Synchronizer};

fn report(rounds: usize, status: GameStatus) -> GameReport {
    let logs = (0..rounds)
        .map(|i| {
            vec![CellContent::with_terrain(
                Position::new(i % 10, i / 10),
                Terrain::Mountain,
            )]
        })
        .collect();
    GameReport::new(logs, status)
}

fn config() -> SyncConfig {
    SyncConfig::default()
        .with_active_delay(Duration::from_millis(250))
        .with_idle_delay(Duration::from_secs(2))
}

#[tokio::test(start_paused = true)]
async fn test_terminal_status_halts_polling() {
    let source = ScriptedSource::new()
        .then_report(report(2, GameStatus::InProgress))
        .then_nothing()
        .then_report(report(1, GameStatus::BlackWins));
    let log = source.request_log();
    let session = Session::new();
    let mut synchronizer = Synchronizer::new(session.clone(), config());

    synchronizer.start(source).unwrap();
    assert_eq!(synchronizer.wait_terminated().await, Some(LoopExit::Terminated));
    assert_eq!(synchronizer.phase(), SyncPhase::Terminated);
    assert_eq!(session.status(), GameStatus::BlackWins);
    assert_eq!(session.turn_counter(), 3);
    assert_eq!(log.calls(), vec![0, 2, 2]);

    // No further polls however long we wait
    sleep(Duration::from_secs(60)).await;
    assert_eq!(log.count(), 3);
    assert!(!session.has_writer());
}

#[tokio::test(start_paused = true)]
async fn test_idle_and_active_cadence() {
    let source = ScriptedSource::new()
        .then_nothing()
        .then_report(report(1, GameStatus::InProgress))
        .then_report(report(1, GameStatus::Draw));
    let log = source.request_log();
    let session = Session::new();
    let mut synchronizer = Synchronizer::new(session.clone(), config());

    let started = Instant::now();
    synchronizer.start(source).unwrap();
    synchronizer.wait_terminated().await;

    // Polls at 0, 2000 (after idle) and 2250 (after active)
    assert_eq!(log.calls(), vec![0, 0, 1]);
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_millis(2250), "elapsed {elapsed:?}");
    assert!(elapsed < Duration::from_millis(2500), "elapsed {elapsed:?}");
}

#[tokio::test(start_paused = true)]
async fn test_idle_source_polled_every_idle_delay() {
    let source = ScriptedSource::new();
    let log = source.request_log();
    let mut synchronizer = Synchronizer::new(Session::new(), config());

    synchronizer.start(source).unwrap();
    sleep(Duration::from_millis(4500)).await;

    assert_eq!(log.calls(), vec![0, 0, 0]);
    assert_eq!(synchronizer.phase(), SyncPhase::Scheduled);
    assert!(synchronizer.is_running());
    synchronizer.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_transport_failure_is_retried() {
    let source = ScriptedSource::new()
        .then_failure("connection refused")
        .then_report(report(4, GameStatus::WhiteWins));
    let log = source.request_log();
    let session = Session::new();
    let mut synchronizer = Synchronizer::new(session.clone(), config());

    let started = Instant::now();
    synchronizer.start(source).unwrap();
    assert_eq!(synchronizer.wait_terminated().await, Some(LoopExit::Terminated));

    assert_eq!(log.calls(), vec![0, 0]);
    assert!(started.elapsed() >= config().idle_delay);
    assert_eq!(session.history().len(), 4);
}

#[tokio::test(start_paused = true)]
async fn test_stop_discards_inflight_poll() {
    let source = ScriptedSource::new()
        .with_latency(Duration::from_secs(1))
        .then_report(report(3, GameStatus::InProgress));
    let session = Session::new();
    let mut synchronizer = Synchronizer::new(session.clone(), config());

    synchronizer.start(source).unwrap();
    sleep(Duration::from_millis(500)).await;
    assert_eq!(synchronizer.phase(), SyncPhase::Polling);

    synchronizer.stop().await;
    assert_eq!(synchronizer.phase(), SyncPhase::Idle);
    assert!(!synchronizer.is_running());
    assert!(!session.has_writer());

    sleep(Duration::from_secs(5)).await;
    assert_eq!(session.turn_counter(), 0);
    assert!(session.history().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_stop_when_idle_is_noop() {
    let mut synchronizer = Synchronizer::new(Session::new(), config());
    synchronizer.stop().await;
    assert_eq!(synchronizer.phase(), SyncPhase::Idle);
    assert_eq!(synchronizer.wait_terminated().await, None);
}

#[tokio::test(start_paused = true)]
async fn test_reset_then_resync() {
    let session = Session::new();
    let mut synchronizer = Synchronizer::new(session.clone(), config());

    synchronizer
        .start(ScriptedSource::new().then_report(report(5, GameStatus::Draw)))
        .unwrap();
    synchronizer.wait_terminated().await;
    assert_eq!(session.turn_counter(), 5);

    synchronizer.reset().await.unwrap();
    assert_eq!(session.turn_counter(), 0);
    assert_eq!(session.status(), GameStatus::InProgress);
    assert!(session.history().is_empty());

    let source = ScriptedSource::new().then_report(report(2, GameStatus::BlackWins));
    let log = source.request_log();
    synchronizer.start(source).unwrap();
    synchronizer.wait_terminated().await;
    assert_eq!(log.calls(), vec![0]);
    assert_eq!(session.turn_counter(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_second_writer_is_refused() {
    let session = Session::new();
    let mut synchronizer = Synchronizer::new(session.clone(), config());
    synchronizer.start(ScriptedSource::new()).unwrap();

    assert_eq!(
        synchronizer.start(ScriptedSource::new()),
        Err(SyncError::WriterBusy)
    );
    let mut other = Synchronizer::new(session.clone(), config());
    assert_eq!(other.start(ScriptedSource::new()), Err(SyncError::WriterBusy));

    synchronizer.stop().await;
    assert!(other.start(ScriptedSource::new()).is_ok());
    other.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_terminal_session_is_never_polled() {
    let session = Session::new();
    session
        .try_acquire_writer()
        .unwrap()
        .apply_report(report(1, GameStatus::Draw));

    let source = ScriptedSource::new().then_report(report(1, GameStatus::InProgress));
    let log = source.request_log();
    let mut synchronizer = Synchronizer::new(session.clone(), config());
    synchronizer.start(source).unwrap();

    assert_eq!(synchronizer.wait_terminated().await, Some(LoopExit::Terminated));
    assert_eq!(log.count(), 0);
    assert_eq!(session.turn_counter(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_phase_is_observable() {
    let mut synchronizer = Synchronizer::new(Session::new(), config());
    let mut phase = synchronizer.subscribe();

    synchronizer
        .start(ScriptedSource::new().then_report(report(1, GameStatus::WhiteWins)))
        .unwrap();
    let reached = *phase
        .wait_for(|phase| *phase == SyncPhase::Terminated)
        .await
        .unwrap();
    assert_eq!(reached, SyncPhase::Terminated);
}

#[tokio::test(start_paused = true)]
async fn test_dropping_synchronizer_cancels_loop() {
    let session = Session::new();
    let source = ScriptedSource::new();
    let log = source.request_log();
    {
        let mut synchronizer = Synchronizer::new(session.clone(), config());
        synchronizer.start(source).unwrap();
        sleep(Duration::from_millis(100)).await;
    }

    sleep(Duration::from_secs(10)).await;
    assert_eq!(log.count(), 1);
    assert!(!session.has_writer());
}
