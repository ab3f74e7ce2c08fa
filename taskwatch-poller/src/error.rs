//! Errors returned synchronously by a polling session
//!
//! Task failures and timeouts are not errors here: they are delivered
//! through the session callbacks.

use taskwatch_core::domain::poll::PollPhase;
use thiserror::Error;

/// Misuse of a polling session
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PollError {
    /// `start()` called while the session is already polling
    #[error("Session is already polling")]
    AlreadyPolling,

    /// `start()` called after the session reached a terminal phase
    #[error("Session already finished ({0})")]
    Finished(PollPhase),

    /// `start()` called outside a tokio runtime
    #[error("No tokio runtime available to drive the poll timer")]
    NoRuntime,

    /// Options rejected at construction
    #[error("Invalid poll options: {0}")]
    InvalidOptions(String),
}
