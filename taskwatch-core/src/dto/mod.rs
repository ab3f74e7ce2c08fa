//! Data Transfer Objects
//!
//! Wire representations of what the task-status endpoint returns.

pub mod task;
