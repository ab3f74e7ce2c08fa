//! Poll domain types

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::dto::task::TaskStatus;

/// What a single poll concluded
///
/// `Progress` keeps the session running; every other variant is terminal.
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    /// Task is still running
    Progress(TaskStatus),
    /// Task finished successfully; carries the full payload
    Success(TaskStatus),
    /// Task finished with an error; carries the failure message
    Failure(String),
    /// Poll budget exhausted before the task became ready
    Timeout,
}

impl PollOutcome {
    /// Classifies a status response
    ///
    /// Never produces `Timeout`: that outcome comes from the poll counter,
    /// not from the server.
    pub fn from_status(status: TaskStatus) -> Self {
        if !status.ready {
            return Self::Progress(status);
        }

        if status.success {
            Self::Success(status)
        } else {
            Self::Failure(status.failure_message())
        }
    }

    /// Whether this outcome ends the session
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Progress(_))
    }

    /// The phase a session enters after this outcome
    pub fn phase(&self) -> PollPhase {
        match self {
            Self::Progress(_) => PollPhase::Polling,
            Self::Success(_) => PollPhase::Succeeded,
            Self::Failure(_) => PollPhase::Failed,
            Self::Timeout => PollPhase::TimedOut,
        }
    }
}

/// Lifecycle phase of a polling session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PollPhase {
    #[default]
    Idle,
    Polling,
    Succeeded,
    Failed,
    TimedOut,
}

impl PollPhase {
    /// Terminal phases are never left
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed | Self::TimedOut)
    }
}

impl fmt::Display for PollPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Polling => "polling",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
            Self::TimedOut => "timed out",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_ready_is_progress() {
        let outcome = PollOutcome::from_status(TaskStatus::running(10.0));

        assert_eq!(outcome, PollOutcome::Progress(TaskStatus::running(10.0)));
        assert!(!outcome.is_terminal());
        assert_eq!(outcome.phase(), PollPhase::Polling);
    }

    #[test]
    fn test_ready_and_successful_keeps_payload() {
        let status = TaskStatus::succeeded().with_redirect("/done/");
        let outcome = PollOutcome::from_status(status.clone());

        assert_eq!(outcome, PollOutcome::Success(status));
        assert_eq!(outcome.phase(), PollPhase::Succeeded);
    }

    #[test]
    fn test_ready_and_failed_uses_server_message() {
        let outcome = PollOutcome::from_status(TaskStatus::failed(Some("bad input".into())));
        assert_eq!(outcome, PollOutcome::Failure("bad input".to_string()));
    }

    #[test]
    fn test_ready_and_failed_without_message() {
        let outcome = PollOutcome::from_status(TaskStatus::failed(None));
        assert_eq!(outcome, PollOutcome::Failure("Task failed".to_string()));
        assert_eq!(outcome.phase(), PollPhase::Failed);
    }

    #[test]
    fn test_success_flag_ignored_while_running() {
        let status = TaskStatus {
            success: true,
            ..TaskStatus::running(99.0)
        };
        assert!(matches!(
            PollOutcome::from_status(status),
            PollOutcome::Progress(_)
        ));
    }

    #[test]
    fn test_terminal_phases() {
        assert!(!PollPhase::Idle.is_terminal());
        assert!(!PollPhase::Polling.is_terminal());
        assert!(PollPhase::Succeeded.is_terminal());
        assert!(PollPhase::Failed.is_terminal());
        assert!(PollPhase::TimedOut.is_terminal());
        assert!(PollOutcome::Timeout.is_terminal());
    }
}
