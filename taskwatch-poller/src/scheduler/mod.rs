//! Scheduler layer
//!
//! Owns the poll timer of a session and turns each status response into
//! a poll outcome for the callbacks.

mod session;

pub use session::PollSession;
