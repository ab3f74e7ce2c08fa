//! Taskwatch Core
//!
//! Core types shared by the Taskwatch client, poller and CLI.
//!
//! This crate contains:
//! - Domain types: poll outcomes and session phases
//! - DTOs: the task status payload returned by the status endpoint

pub mod domain;
pub mod dto;
