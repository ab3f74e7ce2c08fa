//! Repository layer
//!
//! Repositories are stateless HTTP adapters that fetch task status for the
//! scheduler. They contain no polling logic.
//!
//! The scheduler only sees the trait so tests can script responses.

mod status;

// Re-export trait
pub use status::StatusRepository;

// Re-export implementation
pub use status::HttpStatusRepository;
