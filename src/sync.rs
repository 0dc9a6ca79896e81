//! The synchronization loop.
//!
//! A poll asks the source for every round past the session's turn counter,
//! merges the answer into the board, appends it to the history and schedules
//! the next poll. The loop is an explicit state machine:
//!
//! ```text
//! Idle -> Polling -> Applying -> Scheduled -> Polling -> ...
//!            |           |
//!            |           +-> Terminated (terminal status)
//!            +-> Scheduled (nothing new, or the poll failed)
//! ```
//!
//! Delays are tokio timers and every await races a cancellation token, so
//! stopping takes effect before the next step.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::SyncConfig;
use crate::error::{SyncError, SyncResult};
use crate::session::{Session, SessionWriter};
use crate::source::ReportSource;

/// Where the loop currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncPhase {
    /// Not running.
    #[default]
    Idle,
    /// A poll is in flight.
    Polling,
    /// New rounds are being merged into the session.
    Applying,
    /// Waiting for the next poll.
    Scheduled,
    /// The game reached a terminal status; no more polls.
    Terminated,
}

/// What one poll cycle decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cycle {
    /// Poll again after this delay.
    Reschedule(Duration),
    /// The game is over.
    Terminated,
    /// The loop was cancelled; anything fetched was discarded.
    Cancelled,
}

/// Why a loop stopped running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    /// The game reached a terminal status.
    Terminated,
    /// The loop was cancelled.
    Cancelled,
}

/// One synchronization loop bound to a session writer and a source.
#[derive(Debug)]
pub struct SyncLoop<S> {
    writer: SessionWriter,
    source: S,
    config: SyncConfig,
    cancel: CancellationToken,
    phase: Arc<watch::Sender<SyncPhase>>,
}

impl<S: ReportSource> SyncLoop<S> {
    /// Create a loop with its own cancellation token and phase channel.
    #[must_use]
    pub fn new(writer: SessionWriter, source: S, config: SyncConfig) -> Self {
        Self::attached(
            writer,
            source,
            config,
            CancellationToken::new(),
            Arc::new(watch::Sender::new(SyncPhase::Idle)),
        )
    }

    fn attached(
        writer: SessionWriter,
        source: S,
        config: SyncConfig,
        cancel: CancellationToken,
        phase: Arc<watch::Sender<SyncPhase>>,
    ) -> Self {
        Self {
            writer,
            source,
            config,
            cancel,
            phase,
        }
    }

    /// Token that stops this loop when cancelled.
    #[must_use]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Watch the loop's phase.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SyncPhase> {
        self.phase.subscribe()
    }

    /// Run one poll cycle.
    ///
    /// A session that is already terminal is never polled.
    pub async fn cycle(&mut self) -> Cycle {
        if self.cancel.is_cancelled() {
            return Cycle::Cancelled;
        }
        if self.writer.status().is_terminal() {
            self.set_phase(SyncPhase::Terminated);
            return Cycle::Terminated;
        }

        let since_turn = self.writer.turn_counter();
        self.set_phase(SyncPhase::Polling);
        debug!(turn = since_turn, "polling for new rounds");

        let fetched = tokio::select! {
            biased;
            () = self.cancel.cancelled() => return Cycle::Cancelled,
            fetched = self.source.fetch(since_turn) => fetched,
        };
        if self.cancel.is_cancelled() {
            debug!(turn = since_turn, "discarding poll result after cancellation");
            return Cycle::Cancelled;
        }

        let report = match fetched {
            Ok(Some(report)) if !report.is_empty() => report,
            Ok(_) => {
                debug!(turn = since_turn, "no new rounds");
                return self.schedule(self.config.idle_delay);
            }
            Err(err) => {
                warn!(turn = since_turn, error = %err, "poll failed, retrying");
                return self.schedule(self.config.idle_delay);
            }
        };

        self.set_phase(SyncPhase::Applying);
        let applied = self.writer.apply_report(report);
        debug!(
            rounds = applied.rounds,
            turn = applied.turn_counter,
            "applied new rounds"
        );

        if applied.status.is_terminal() {
            info!(
                turn = applied.turn_counter,
                status = %applied.status,
                "game finished, polling stopped"
            );
            self.set_phase(SyncPhase::Terminated);
            Cycle::Terminated
        } else {
            self.schedule(self.config.active_delay)
        }
    }

    /// Poll until the game ends or the loop is cancelled.
    ///
    /// The writer role is released when this returns.
    pub async fn run(mut self) -> LoopExit {
        info!(turn = self.writer.turn_counter(), "synchronization started");
        loop {
            let delay = match self.cycle().await {
                Cycle::Reschedule(delay) => delay,
                Cycle::Terminated => return LoopExit::Terminated,
                Cycle::Cancelled => {
                    info!(turn = self.writer.turn_counter(), "synchronization cancelled");
                    return LoopExit::Cancelled;
                }
            };

            debug!(delay = ?delay, "next poll scheduled");
            tokio::select! {
                biased;
                () = self.cancel.cancelled() => {
                    info!(turn = self.writer.turn_counter(), "synchronization cancelled");
                    return LoopExit::Cancelled;
                }
                () = tokio::time::sleep(delay) => {}
            }
        }
    }

    fn schedule(&self, delay: Duration) -> Cycle {
        self.set_phase(SyncPhase::Scheduled);
        Cycle::Reschedule(delay)
    }

    fn set_phase(&self, phase: SyncPhase) {
        self.phase.send_replace(phase);
    }
}

#[derive(Debug)]
struct ActiveLoop {
    cancel: CancellationToken,
    task: JoinHandle<LoopExit>,
}

/// Owner of a session's synchronization loop: start, stop and reset.
///
/// Dropping it cancels a running loop.
#[derive(Debug)]
pub struct Synchronizer {
    session: Session,
    config: SyncConfig,
    phase: Arc<watch::Sender<SyncPhase>>,
    active: Option<ActiveLoop>,
}

impl Synchronizer {
    /// Create an idle synchronizer for `session`.
    #[must_use]
    pub fn new(session: Session, config: SyncConfig) -> Self {
        Self {
            session,
            config,
            phase: Arc::new(watch::Sender::new(SyncPhase::Idle)),
            active: None,
        }
    }

    /// The synchronized session.
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> SyncPhase {
        *self.phase.borrow()
    }

    /// Watch phase changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SyncPhase> {
        self.phase.subscribe()
    }

    /// Whether a loop task is still running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.active
            .as_ref()
            .is_some_and(|active| !active.task.is_finished())
    }

    /// Spawn the loop on the current tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::WriterBusy`] if a loop or a replay already holds
    /// the session's writer role.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn start<S>(&mut self, source: S) -> SyncResult<()>
    where
        S: ReportSource + 'static,
    {
        let writer = self
            .session
            .try_acquire_writer()
            .ok_or(SyncError::WriterBusy)?;
        let cancel = CancellationToken::new();
        let sync_loop = SyncLoop::attached(
            writer,
            source,
            self.config,
            cancel.clone(),
            Arc::clone(&self.phase),
        );
        let task = tokio::spawn(sync_loop.run());
        self.active = Some(ActiveLoop { cancel, task });
        Ok(())
    }

    /// Cancel the loop, wait for it to release the writer and go idle.
    ///
    /// Safe to call in any phase, including when nothing runs.
    pub async fn stop(&mut self) {
        if let Some(active) = self.active.take() {
            active.cancel.cancel();
            match active.task.await {
                Ok(exit) => debug!(?exit, "synchronization task joined"),
                Err(err) => warn!(error = %err, "synchronization task failed"),
            }
        }
        self.phase.send_replace(SyncPhase::Idle);
    }

    /// Stop the loop, then clear the board and the history.
    ///
    /// The synchronizer only owns its own loop. A replay running on the same
    /// session keeps the writer role, and the board and history are then
    /// left as they are; cancel the replay and call `reset` again.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::WriterBusy`] if another driver, such as a replay,
    /// holds the writer role.
    pub async fn reset(&mut self) -> SyncResult<()> {
        self.stop().await;
        let mut writer = self
            .session
            .try_acquire_writer()
            .ok_or(SyncError::WriterBusy)?;
        writer.reset();
        info!("session reset");
        Ok(())
    }

    /// Wait until the running loop halts, either terminal or cancelled.
    ///
    /// Returns `None` if no loop was started since the last stop or wait.
    /// Dropping the future before it resolves leaves the loop running.
    pub async fn wait_terminated(&mut self) -> Option<LoopExit> {
        let active = self.active.as_mut()?;
        let joined = (&mut active.task).await;
        self.active = None;
        match joined {
            Ok(exit) => Some(exit),
            Err(err) => {
                warn!(error = %err, "synchronization task failed");
                None
            }
        }
    }
}

impl Drop for Synchronizer {
    fn drop(&mut self) {
        if let Some(active) = &self.active {
            active.cancel.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{CellContent, GameReport, GameStatus, Position, Terrain};
    use crate::replay::{ReplayDriver, SessionReplay};
    use crate::source::ScriptedSource;

    fn report(rounds: usize, status: GameStatus) -> GameReport {
        let logs = (0..rounds)
            .map(|i| vec![CellContent::with_terrain(Position::new(i % 10, 0), Terrain::Fort)])
            .collect();
        GameReport::new(logs, status)
    }

    fn sync_loop(source: ScriptedSource) -> (Session, SyncLoop<ScriptedSource>) {
        let session = Session::new();
        let writer = session.try_acquire_writer().unwrap();
        (session, SyncLoop::new(writer, source, SyncConfig::default()))
    }

    #[tokio::test]
    async fn test_cycle_active_then_terminal() {
        let source = ScriptedSource::new()
            .then_report(report(3, GameStatus::InProgress))
            .then_report(report(1, GameStatus::Draw));
        let log = source.request_log();
        let (session, mut sync_loop) = sync_loop(source);
        let phase = sync_loop.subscribe();

        let config = SyncConfig::default();
        assert_eq!(sync_loop.cycle().await, Cycle::Reschedule(config.active_delay));
        assert_eq!(*phase.borrow(), SyncPhase::Scheduled);
        assert_eq!(session.turn_counter(), 3);

        assert_eq!(sync_loop.cycle().await, Cycle::Terminated);
        assert_eq!(*phase.borrow(), SyncPhase::Terminated);
        assert_eq!(session.status(), GameStatus::Draw);

        // Terminal sessions are never polled again
        assert_eq!(sync_loop.cycle().await, Cycle::Terminated);
        assert_eq!(log.calls(), vec![0, 3]);
    }

    #[tokio::test]
    async fn test_cycle_idle_on_nothing_empty_or_failure() {
        let source = ScriptedSource::new()
            .then_nothing()
            .then_report(GameReport::new(Vec::new(), GameStatus::BlackWins))
            .then_failure("timeout");
        let (session, mut sync_loop) = sync_loop(source);
        let idle = Cycle::Reschedule(SyncConfig::default().idle_delay);

        assert_eq!(sync_loop.cycle().await, idle);
        assert_eq!(sync_loop.cycle().await, idle);
        assert_eq!(sync_loop.cycle().await, idle);
        assert_eq!(session.turn_counter(), 0);
        assert!(session.history().is_empty());
        assert_eq!(session.status(), GameStatus::InProgress);
    }

    #[tokio::test]
    async fn test_cancelled_cycle_does_not_poll() {
        let source = ScriptedSource::new().then_report(report(1, GameStatus::InProgress));
        let log = source.request_log();
        let (session, mut sync_loop) = sync_loop(source);

        sync_loop.cancellation_token().cancel();
        assert_eq!(sync_loop.cycle().await, Cycle::Cancelled);
        assert_eq!(log.count(), 0);
        assert_eq!(session.turn_counter(), 0);
    }

    #[tokio::test]
    async fn test_run_releases_writer() {
        let source = ScriptedSource::new().then_report(report(2, GameStatus::WhiteWins));
        let (session, sync_loop) = sync_loop(source);
        assert!(session.has_writer());

        assert_eq!(sync_loop.run().await, LoopExit::Terminated);
        assert!(!session.has_writer());
        assert_eq!(session.history().len(), 2);
    }

    #[tokio::test]
    async fn test_reset_while_replaying_leaves_session_untouched() {
        let session = Session::new();
        session
            .try_acquire_writer()
            .unwrap()
            .apply_report(report(2, GameStatus::Draw));
        let mut synchronizer = Synchronizer::new(session.clone(), SyncConfig::default());

        let replay = SessionReplay::new(&session, ReplayDriver::new(Duration::ZERO)).unwrap();
        assert_eq!(synchronizer.reset().await, Err(SyncError::WriterBusy));
        assert_eq!(session.turn_counter(), 2);
        assert_eq!(session.history().len(), 2);
        assert_eq!(synchronizer.phase(), SyncPhase::Idle);

        drop(replay);
        assert_eq!(synchronizer.reset().await, Ok(()));
        assert_eq!(session.turn_counter(), 0);
        assert!(session.history().is_empty());
    }
}
