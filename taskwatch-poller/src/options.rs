//! Options accepted when constructing a polling session

use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use taskwatch_core::dto::task::TaskStatus;

use crate::callbacks::{Callbacks, ErrorFn, ProgressFn, SuccessFn, TimeoutFn};
use crate::error::PollError;
use crate::service::{LogNavigator, LogNotifier, Navigator, Notifier};

/// Default time between two polls
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(5000);

/// Default number of polls before giving up
pub const DEFAULT_MAX_POLLS: u32 = 360;

/// Polling cadence, budget and outcome handlers
///
/// # Example
/// ```
/// use std::time::Duration;
/// use taskwatch_poller::PollOptions;
///
/// let options = PollOptions::default()
///     .with_poll_interval(Duration::from_secs(2))
///     .with_max_polls(30)
///     .on_progress(|status| println!("{}%", status.progress_or_zero()));
/// ```
#[derive(Clone)]
pub struct PollOptions {
    poll_interval: Duration,
    max_polls: u32,
    on_progress: Option<ProgressFn>,
    on_success: Option<SuccessFn>,
    on_error: Option<ErrorFn>,
    on_timeout: Option<TimeoutFn>,
    navigator: Arc<dyn Navigator>,
    notifier: Arc<dyn Notifier>,
}

impl PollOptions {
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_max_polls(mut self, max_polls: u32) -> Self {
        self.max_polls = max_polls;
        self
    }

    /// Replaces the default progress handler
    pub fn on_progress(mut self, f: impl Fn(&TaskStatus) + Send + Sync + 'static) -> Self {
        self.on_progress = Some(Arc::new(f));
        self
    }

    /// Replaces the default success handler
    pub fn on_success(mut self, f: impl Fn(&TaskStatus) + Send + Sync + 'static) -> Self {
        self.on_success = Some(Arc::new(f));
        self
    }

    /// Replaces the default failure handler
    pub fn on_error(mut self, f: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Arc::new(f));
        self
    }

    /// Replaces the default timeout handler
    pub fn on_timeout(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_timeout = Some(Arc::new(f));
        self
    }

    /// Navigator used by the default success handler
    pub fn with_navigator(mut self, navigator: impl Navigator + 'static) -> Self {
        self.navigator = Arc::new(navigator);
        self
    }

    /// Notifier used by the default failure and timeout handlers
    pub fn with_notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Arc::new(notifier);
        self
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub fn max_polls(&self) -> u32 {
        self.max_polls
    }

    /// Validates the options
    pub fn validate(&self) -> Result<(), PollError> {
        if self.poll_interval.is_zero() {
            return Err(PollError::InvalidOptions(
                "poll_interval must be greater than 0".to_string(),
            ));
        }

        if self.max_polls == 0 {
            return Err(PollError::InvalidOptions(
                "max_polls must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Resolves overrides against the built-in handlers
    pub(crate) fn callbacks(&self) -> Callbacks {
        let defaults = Callbacks::defaults(Arc::clone(&self.navigator), Arc::clone(&self.notifier));

        Callbacks {
            on_progress: self.on_progress.clone().unwrap_or(defaults.on_progress),
            on_success: self.on_success.clone().unwrap_or(defaults.on_success),
            on_error: self.on_error.clone().unwrap_or(defaults.on_error),
            on_timeout: self.on_timeout.clone().unwrap_or(defaults.on_timeout),
        }
    }
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_polls: DEFAULT_MAX_POLLS,
            on_progress: None,
            on_success: None,
            on_error: None,
            on_timeout: None,
            navigator: Arc::new(LogNavigator),
            notifier: Arc::new(LogNotifier),
        }
    }
}

impl fmt::Debug for PollOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PollOptions")
            .field("poll_interval", &self.poll_interval)
            .field("max_polls", &self.max_polls)
            .field("on_progress", &self.on_progress.is_some())
            .field("on_success", &self.on_success.is_some())
            .field("on_error", &self.on_error.is_some())
            .field("on_timeout", &self.on_timeout.is_some())
            .finish_non_exhaustive()
    }
}
