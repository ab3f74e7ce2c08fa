//! Session callbacks
//!
//! Each poll outcome is handed to exactly one callback. Callers override
//! any subset through [`PollOptions`](crate::PollOptions); the rest fall
//! back to the defaults below.

use std::fmt;
use std::sync::Arc;
use taskwatch_core::domain::poll::PollOutcome;
use taskwatch_core::dto::task::TaskStatus;
use tracing::{error, info};

use crate::service::{Navigator, Notifier};

/// Alert shown when the poll budget runs out
pub const TIMEOUT_MESSAGE: &str = "Task timed out. Please refresh to check status.";

/// Called with the status of a task that is still running
pub type ProgressFn = Arc<dyn Fn(&TaskStatus) + Send + Sync>;
/// Called with the full payload of a task that succeeded
pub type SuccessFn = Arc<dyn Fn(&TaskStatus) + Send + Sync>;
/// Called with the failure message of a task that failed
pub type ErrorFn = Arc<dyn Fn(&str) + Send + Sync>;
/// Called once the poll budget is exhausted
pub type TimeoutFn = Arc<dyn Fn() + Send + Sync>;

/// The four outcome handlers of a session
#[derive(Clone)]
pub struct Callbacks {
    pub(crate) on_progress: ProgressFn,
    pub(crate) on_success: SuccessFn,
    pub(crate) on_error: ErrorFn,
    pub(crate) on_timeout: TimeoutFn,
}

impl Callbacks {
    /// Built-in handlers backed by the given capabilities
    pub fn defaults(navigator: Arc<dyn Navigator>, notifier: Arc<dyn Notifier>) -> Self {
        let timeout_notifier = Arc::clone(&notifier);

        Self {
            on_progress: Arc::new(|status: &TaskStatus| {
                info!("Progress: {}", status.progress_or_zero());
            }),
            on_success: Arc::new(move |status: &TaskStatus| {
                info!("Task succeeded");
                if let Some(url) = &status.redirect_url {
                    navigator.navigate(url);
                }
            }),
            on_error: Arc::new(move |message: &str| {
                error!("Task failed: {}", message);
                notifier.alert(&format!("Task failed: {}", message));
            }),
            on_timeout: Arc::new(move || {
                error!("Task timed out");
                timeout_notifier.alert(TIMEOUT_MESSAGE);
            }),
        }
    }

    /// Routes an outcome to its handler
    pub fn dispatch(&self, outcome: &PollOutcome) {
        match outcome {
            PollOutcome::Progress(status) => (self.on_progress)(status),
            PollOutcome::Success(status) => (self.on_success)(status),
            PollOutcome::Failure(message) => (self.on_error)(message),
            PollOutcome::Timeout => (self.on_timeout)(),
        }
    }
}

impl fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callbacks").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        navigations: Mutex<Vec<String>>,
        alerts: Mutex<Vec<String>>,
    }

    impl Navigator for Recorder {
        fn navigate(&self, url: &str) {
            self.navigations.lock().unwrap().push(url.to_string());
        }
    }

    impl Notifier for Recorder {
        fn alert(&self, message: &str) {
            self.alerts.lock().unwrap().push(message.to_string());
        }
    }

    fn defaults() -> (Callbacks, Arc<Recorder>) {
        let recorder = Arc::new(Recorder::default());
        let callbacks = Callbacks::defaults(recorder.clone(), recorder.clone());
        (callbacks, recorder)
    }

    #[test]
    fn test_success_navigates_to_redirect() {
        let (callbacks, recorder) = defaults();

        callbacks.dispatch(&PollOutcome::Success(
            TaskStatus::succeeded().with_redirect("/admin/orders/"),
        ));

        assert_eq!(*recorder.navigations.lock().unwrap(), vec!["/admin/orders/"]);
        assert!(recorder.alerts.lock().unwrap().is_empty());
    }

    #[test]
    fn test_success_without_redirect_stays_put() {
        let (callbacks, recorder) = defaults();

        callbacks.dispatch(&PollOutcome::Success(TaskStatus::succeeded()));

        assert!(recorder.navigations.lock().unwrap().is_empty());
    }

    #[test]
    fn test_failure_alerts_user() {
        let (callbacks, recorder) = defaults();

        callbacks.dispatch(&PollOutcome::Failure("supplier offline".to_string()));

        assert_eq!(
            *recorder.alerts.lock().unwrap(),
            vec!["Task failed: supplier offline"]
        );
    }

    #[test]
    fn test_timeout_suggests_refresh() {
        let (callbacks, recorder) = defaults();

        callbacks.dispatch(&PollOutcome::Timeout);

        assert_eq!(*recorder.alerts.lock().unwrap(), vec![TIMEOUT_MESSAGE]);
        assert!(recorder.navigations.lock().unwrap().is_empty());
    }

    #[test]
    fn test_progress_has_no_side_effects() {
        let (callbacks, recorder) = defaults();

        callbacks.dispatch(&PollOutcome::Progress(TaskStatus::default()));

        assert!(recorder.navigations.lock().unwrap().is_empty());
        assert!(recorder.alerts.lock().unwrap().is_empty());
    }
}
