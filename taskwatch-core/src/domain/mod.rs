//! Core domain types
//!
//! The vocabulary of a polling session: what a single poll concluded
//! and which phase the session is in.

pub mod poll;
