//! Polling session
//!
//! Drives one task's status checks on a fixed interval until the task
//! succeeds, fails, runs out of poll budget, or the caller stops it.
//! The timer is a tokio task owned by the session; polls run one at a time
//! inside it, so a slow response delays the next tick instead of
//! overlapping with it.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use taskwatch_core::domain::poll::{PollOutcome, PollPhase};
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{Instrument, debug, info, info_span, warn};
use uuid::Uuid;

use crate::callbacks::Callbacks;
use crate::error::PollError;
use crate::options::PollOptions;
use crate::repository::StatusRepository;

/// Shared between the session handle and its polling task
#[derive(Debug, Clone, Copy, Default)]
struct SessionState {
    phase: PollPhase,
    poll_count: u32,
    /// Bumped by every `start()`; a polling task only acts for its own
    generation: u64,
    /// Terminal phase claimed by the polling task, published to `phase`
    /// once the terminal callback has returned
    settling: Option<PollPhase>,
}

impl SessionState {
    fn is_active(&self, generation: u64) -> bool {
        self.phase == PollPhase::Polling
            && self.generation == generation
            && self.settling.is_none()
    }
}

/// Handle of the polling task, tagged with the generation that spawned it
#[derive(Debug, Default)]
struct TimerSlot(Mutex<Option<(u64, JoinHandle<()>)>>);

impl TimerSlot {
    fn lock(&self) -> MutexGuard<'_, Option<(u64, JoinHandle<()>)>> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[cfg(test)]
    fn is_set(&self) -> bool {
        self.lock().is_some()
    }

    /// Detaches the handle, whichever generation owns it
    fn take(&self) -> Option<JoinHandle<()>> {
        self.lock().take().map(|(_, handle)| handle)
    }

    /// Detaches the handle only if `generation` still owns it
    fn release(&self, generation: u64) {
        let mut slot = self.lock();
        if slot.as_ref().is_some_and(|(owner, _)| *owner == generation) {
            *slot = None;
        }
    }
}

/// Result of one poll step, before any callback runs
#[derive(Debug)]
enum PollStep {
    Outcome(PollOutcome),
    /// Request failed; keep the schedule
    Transient,
    /// Session was stopped or restarted underneath this step
    Stale,
}

/// A polling session for a single task
///
/// # Example
/// ```no_run
/// use std::sync::Arc;
/// use taskwatch_client::StatusClient;
/// use taskwatch_poller::{HttpStatusRepository, PollOptions, PollSession};
///
/// # async fn example() -> anyhow::Result<()> {
/// let repository = Arc::new(HttpStatusRepository::new(StatusClient::new("http://localhost:8000")));
/// let mut session = PollSession::new("4f1c2a", repository, PollOptions::default())?;
///
/// session.start()?;
/// let phase = session.finished().await;
/// println!("task ended: {}", phase);
/// # Ok(())
/// # }
/// ```
pub struct PollSession {
    task_id: String,
    session_id: Uuid,
    poll_interval: Duration,
    max_polls: u32,
    repository: Arc<dyn StatusRepository>,
    callbacks: Arc<Callbacks>,
    state: Arc<watch::Sender<SessionState>>,
    /// Set while polling; cleared by `stop()` or by the polling task itself
    /// when it reaches a terminal outcome
    timer: Arc<TimerSlot>,
}

impl PollSession {
    /// Creates an idle session
    ///
    /// # Arguments
    /// * `task_id` - Opaque identifier of the task to watch
    /// * `repository` - Where status lookups go
    /// * `options` - Cadence, budget and callbacks
    pub fn new(
        task_id: impl Into<String>,
        repository: Arc<dyn StatusRepository>,
        options: PollOptions,
    ) -> Result<Self, PollError> {
        let task_id = task_id.into();
        if task_id.is_empty() {
            return Err(PollError::InvalidOptions(
                "task_id cannot be empty".to_string(),
            ));
        }
        options.validate()?;

        let (state, _) = watch::channel(SessionState::default());

        Ok(Self {
            task_id,
            session_id: Uuid::new_v4(),
            poll_interval: options.poll_interval(),
            max_polls: options.max_polls(),
            repository,
            callbacks: Arc::new(options.callbacks()),
            state: Arc::new(state),
            timer: Arc::new(TimerSlot::default()),
        })
    }

    pub fn task_id(&self) -> &str {
        &self.task_id
    }

    /// Current lifecycle phase
    pub fn phase(&self) -> PollPhase {
        self.state.borrow().phase
    }

    /// Poll attempts made so far, including the one that timed out
    pub fn poll_count(&self) -> u32 {
        self.state.borrow().poll_count
    }

    pub fn is_polling(&self) -> bool {
        self.phase() == PollPhase::Polling
    }

    /// Begins polling
    ///
    /// The first poll is issued right away, then one every `poll_interval`.
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    /// * `AlreadyPolling` if the session is running
    /// * `Finished` if the session already reached a terminal phase
    /// * `NoRuntime` outside a tokio runtime
    pub fn start(&mut self) -> Result<(), PollError> {
        let phase = self.phase();
        if phase == PollPhase::Polling {
            return Err(PollError::AlreadyPolling);
        }
        if phase.is_terminal() {
            return Err(PollError::Finished(phase));
        }

        let runtime = Handle::try_current().map_err(|_| PollError::NoRuntime)?;

        let mut generation = 0;
        self.state.send_modify(|state| {
            state.generation += 1;
            state.phase = PollPhase::Polling;
            generation = state.generation;
        });

        info!(
            "Polling task {} (interval: {:?}, max polls: {})",
            self.task_id, self.poll_interval, self.max_polls
        );

        let driver = Driver {
            task_id: self.task_id.clone(),
            poll_interval: self.poll_interval,
            max_polls: self.max_polls,
            repository: Arc::clone(&self.repository),
            callbacks: Arc::clone(&self.callbacks),
            state: Arc::clone(&self.state),
            timer: Arc::clone(&self.timer),
        };
        let span = info_span!(
            "poll_session",
            task_id = %self.task_id,
            session_id = %self.session_id
        );

        // Held across the spawn so the task cannot release its slot before it is filled
        let mut slot = self.timer.lock();
        *slot = Some((
            generation,
            runtime.spawn(driver.run(generation).instrument(span)),
        ));

        Ok(())
    }

    /// Stops polling
    ///
    /// Safe to call at any time. A request already in flight is left to
    /// complete but its response is discarded. A stopped session returns to
    /// `Idle` and may be started again; terminal phases are kept, including
    /// one whose callback is still running.
    pub fn stop(&mut self) {
        let stopped = self.state.send_if_modified(|state| {
            if state.phase == PollPhase::Polling && state.settling.is_none() {
                state.phase = PollPhase::Idle;
                true
            } else {
                false
            }
        });

        // Detach: the task observes the phase change and exits by itself
        self.timer.take();

        if stopped {
            info!("Stopped polling task {}", self.task_id);
        }
    }

    /// Waits until the session leaves `Polling`
    ///
    /// Resolves with the terminal phase once its callback has returned, or
    /// with `Idle` if the session was stopped or never started.
    pub async fn finished(&self) -> PollPhase {
        let mut rx = self.state.subscribe();

        let result = rx
            .wait_for(|state| state.phase != PollPhase::Polling)
            .await
            .map(|state| state.phase);

        result.unwrap_or_else(|_| self.phase())
    }
}

impl Drop for PollSession {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for PollSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PollSession")
            .field("task_id", &self.task_id)
            .field("session_id", &self.session_id)
            .field("poll_interval", &self.poll_interval)
            .field("max_polls", &self.max_polls)
            .field("state", &*self.state.borrow())
            .finish_non_exhaustive()
    }
}

/// The polling task spawned by `start()`
struct Driver {
    task_id: String,
    poll_interval: Duration,
    max_polls: u32,
    repository: Arc<dyn StatusRepository>,
    callbacks: Arc<Callbacks>,
    state: Arc<watch::Sender<SessionState>>,
    timer: Arc<TimerSlot>,
}

impl Driver {
    async fn run(self, generation: u64) {
        let mut stop_rx = self.state.subscribe();
        let mut ticker = time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = stopped(&mut stop_rx, generation) => {
                    debug!("Polling loop exiting");
                    return;
                }
            }

            match self.step(generation).await {
                PollStep::Outcome(outcome) if outcome.is_terminal() => {
                    let _settle = Settle {
                        driver: &self,
                        generation,
                    };
                    self.callbacks.dispatch(&outcome);
                    return;
                }
                PollStep::Outcome(outcome) => self.callbacks.dispatch(&outcome),
                PollStep::Transient => {}
                PollStep::Stale => {
                    debug!("Session no longer active, dropping poll");
                    return;
                }
            }
        }
    }

    /// Performs a single poll
    async fn step(&self, generation: u64) -> PollStep {
        let mut attempt = None;
        self.state.send_if_modified(|state| {
            if !state.is_active(generation) {
                return false;
            }
            state.poll_count += 1;
            attempt = Some(state.poll_count);
            true
        });

        let Some(attempt) = attempt else {
            return PollStep::Stale;
        };

        if attempt > self.max_polls {
            if !self.finish(generation, PollPhase::TimedOut) {
                return PollStep::Stale;
            }
            info!(
                "Task {} not ready after {} polls, giving up",
                self.task_id, self.max_polls
            );
            return PollStep::Outcome(PollOutcome::Timeout);
        }

        debug!("Poll attempt {}/{}", attempt, self.max_polls);

        let result = self.repository.fetch_status(&self.task_id).await;

        if !self.state.borrow().is_active(generation) {
            return PollStep::Stale;
        }

        match result {
            Ok(status) => {
                let outcome = PollOutcome::from_status(status);
                if outcome.is_terminal() {
                    if !self.finish(generation, outcome.phase()) {
                        return PollStep::Stale;
                    }
                    info!("Task {} finished: {}", self.task_id, outcome.phase());
                }
                PollStep::Outcome(outcome)
            }
            Err(e) => {
                warn!("Poll attempt {} failed: {:#}", attempt, e);
                PollStep::Transient
            }
        }
    }

    /// Claims a terminal phase for an active session
    ///
    /// Returns false if the session was stopped, restarted or already
    /// claimed meanwhile, so at most one terminal callback ever runs. The
    /// phase only becomes visible when `Settle` publishes it.
    fn finish(&self, generation: u64, phase: PollPhase) -> bool {
        self.state.send_if_modified(|state| {
            if !state.is_active(generation) {
                return false;
            }
            state.settling = Some(phase);
            true
        })
    }
}

/// Publishes the claimed terminal phase when dropped, after the terminal
/// callback returned or unwound
struct Settle<'a> {
    driver: &'a Driver,
    generation: u64,
}

impl Drop for Settle<'_> {
    fn drop(&mut self) {
        self.driver.timer.release(self.generation);
        self.driver.state.send_modify(|state| {
            if let Some(phase) = state.settling.take() {
                state.phase = phase;
            }
        });
    }
}

async fn stopped(rx: &mut watch::Receiver<SessionState>, generation: u64) {
    let _ = rx.wait_for(|state| !state.is_active(generation)).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use async_trait::async_trait;
    use taskwatch_core::dto::task::TaskStatus;

    struct AlwaysRunning;

    #[async_trait]
    impl StatusRepository for AlwaysRunning {
        async fn fetch_status(&self, _task_id: &str) -> Result<TaskStatus> {
            Ok(TaskStatus::running(0.0))
        }
    }

    struct AlwaysDone;

    #[async_trait]
    impl StatusRepository for AlwaysDone {
        async fn fetch_status(&self, _task_id: &str) -> Result<TaskStatus> {
            Ok(TaskStatus::succeeded())
        }
    }

    fn session(options: PollOptions) -> PollSession {
        PollSession::new("task-1", Arc::new(AlwaysRunning), options).unwrap()
    }

    #[test]
    fn test_new_session_is_idle() {
        let session = session(PollOptions::default());

        assert_eq!(session.phase(), PollPhase::Idle);
        assert_eq!(session.poll_count(), 0);
        assert!(!session.is_polling());
        assert_eq!(session.task_id(), "task-1");
    }

    #[test]
    fn test_rejects_empty_task_id() {
        let err = PollSession::new("", Arc::new(AlwaysRunning), PollOptions::default()).unwrap_err();
        assert!(matches!(err, PollError::InvalidOptions(_)));
    }

    #[test]
    fn test_rejects_invalid_options() {
        let err = PollSession::new(
            "task-1",
            Arc::new(AlwaysRunning),
            PollOptions::default().with_max_polls(0),
        )
        .unwrap_err();
        assert!(matches!(err, PollError::InvalidOptions(_)));
    }

    #[test]
    fn test_start_outside_runtime() {
        let mut session = session(PollOptions::default());

        assert_eq!(session.start(), Err(PollError::NoRuntime));
        assert_eq!(session.phase(), PollPhase::Idle);
    }

    #[test]
    fn test_stop_when_idle_is_noop() {
        let mut session = session(PollOptions::default());

        session.stop();
        session.stop();

        assert_eq!(session.phase(), PollPhase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_double_start_fails_fast() {
        let mut session = session(PollOptions::default());

        session.start().unwrap();
        assert_eq!(session.start(), Err(PollError::AlreadyPolling));
        assert!(session.is_polling());

        session.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_poll_is_immediate() {
        let mut session = session(PollOptions::default());

        session.start().unwrap();
        tokio::time::sleep(Duration::from_millis(1)).await;

        assert_eq!(session.poll_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_held_only_while_polling() {
        let mut session = session(PollOptions::default());
        assert!(!session.timer.is_set());

        session.start().unwrap();
        assert!(session.timer.is_set());

        session.stop();
        assert!(!session.timer.is_set());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_released_on_terminal_outcome() {
        let mut session =
            PollSession::new("task-1", Arc::new(AlwaysDone), PollOptions::default()).unwrap();

        session.start().unwrap();
        assert_eq!(session.finished().await, PollPhase::Succeeded);

        assert!(!session.timer.is_set());
    }

    #[tokio::test(start_paused = true)]
    async fn test_finished_on_idle_session_returns_immediately() {
        let session = session(PollOptions::default());
        assert_eq!(session.finished().await, PollPhase::Idle);
    }
}
