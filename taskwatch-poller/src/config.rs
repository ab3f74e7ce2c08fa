//! Poller configuration
//!
//! Defines where status requests go and how often they are made.

use anyhow::Context;
use std::time::Duration;
use taskwatch_client::StatusClient;

use crate::options::{DEFAULT_MAX_POLLS, DEFAULT_POLL_INTERVAL, PollOptions};

/// Poller configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server hosting `/tasks/{id}/status/` (e.g., "http://localhost:8000")
    pub base_url: String,

    /// Time between two polls
    pub poll_interval: Duration,

    /// Polls allowed before the session times out
    pub max_polls: u32,

    /// Transport timeout for a single status request
    pub request_timeout: Duration,
}

impl Config {
    /// Creates a new configuration with defaults
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_polls: DEFAULT_MAX_POLLS,
            request_timeout: Duration::from_secs(30),
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - TASKWATCH_URL (required)
    /// - POLL_INTERVAL_MS (optional, milliseconds, default: 5000)
    /// - MAX_POLLS (optional, default: 360)
    /// - REQUEST_TIMEOUT_SECS (optional, seconds, default: 30)
    pub fn from_env() -> anyhow::Result<Self> {
        let base_url = std::env::var("TASKWATCH_URL")
            .map_err(|_| anyhow::anyhow!("TASKWATCH_URL environment variable not set"))?;

        let poll_interval = std::env::var("POLL_INTERVAL_MS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_POLL_INTERVAL);

        let max_polls = std::env::var("MAX_POLLS")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(DEFAULT_MAX_POLLS);

        let request_timeout = std::env::var("REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(30));

        Ok(Self {
            base_url,
            poll_interval,
            max_polls,
            request_timeout,
        })
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.base_url.is_empty() {
            anyhow::bail!("base_url cannot be empty");
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            anyhow::bail!("base_url must start with http:// or https://");
        }

        if self.poll_interval.is_zero() {
            anyhow::bail!("poll_interval must be greater than 0");
        }

        if self.max_polls == 0 {
            anyhow::bail!("max_polls must be greater than 0");
        }

        if self.request_timeout.is_zero() {
            anyhow::bail!("request_timeout must be greater than 0");
        }

        Ok(())
    }

    /// Session options with this configuration's cadence and budget
    pub fn poll_options(&self) -> PollOptions {
        PollOptions::default()
            .with_poll_interval(self.poll_interval)
            .with_max_polls(self.max_polls)
    }

    /// Status client honoring the request timeout
    pub fn status_client(&self) -> anyhow::Result<StatusClient> {
        StatusClient::with_timeout(self.base_url.clone(), self.request_timeout)
            .context("Failed to build HTTP client")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new("http://localhost:8000".to_string())
    }
}
