//! Taskwatch Poller
//!
//! Watches a server-side task until it finishes.
//!
//! Architecture:
//! - Configuration: cadence, budget and server location
//! - Repositories: HTTP status lookups behind a trait
//! - Services: navigation and notification capabilities
//! - Scheduler: the polling session and its timer
//!
//! A [`PollSession`] polls `GET /tasks/{id}/status/` on a fixed interval
//! and reports each outcome through its callbacks. Network errors are
//! logged and the schedule carries on; success, failure and timeout end
//! the session.

pub mod callbacks;
pub mod config;
pub mod error;
pub mod options;
pub mod repository;
pub mod scheduler;
pub mod service;

pub use callbacks::Callbacks;
pub use config::Config;
pub use error::PollError;
pub use options::PollOptions;
pub use repository::{HttpStatusRepository, StatusRepository};
pub use scheduler::PollSession;
pub use service::{LogNavigator, LogNotifier, Navigator, Notifier};

pub use taskwatch_core::domain::poll::{PollOutcome, PollPhase};
pub use taskwatch_core::dto::task::TaskStatus;
