//! Taskwatch CLI
//!
//! Command-line interface for watching server-side tasks.

mod commands;
mod terminal;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use std::process::ExitCode;
use std::time::Duration;
use taskwatch_poller::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "taskwatch")]
#[command(about = "Watch background tasks until they finish", long_about = None)]
struct Cli {
    /// Base URL of the server exposing /tasks/{id}/status/
    #[arg(
        long,
        global = true,
        env = "TASKWATCH_URL",
        default_value = "http://localhost:8000"
    )]
    url: String,

    /// Milliseconds between two polls
    #[arg(long, global = true, env = "POLL_INTERVAL_MS", default_value_t = 5000)]
    interval_ms: u64,

    /// Polls before giving up
    #[arg(long, global = true, env = "MAX_POLLS", default_value_t = 360)]
    max_polls: u32,

    /// Timeout of a single status request, in seconds
    #[arg(long, global = true, env = "REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    request_timeout_secs: u64,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Initialize logging; outcomes are printed by the terminal handlers
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "taskwatch_cli=info,taskwatch_poller=warn,taskwatch_poller::callbacks=off,taskwatch_client=warn"
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = Config {
        base_url: cli.url,
        poll_interval: Duration::from_millis(cli.interval_ms),
        max_polls: cli.max_polls,
        request_timeout: Duration::from_secs(cli.request_timeout_secs),
    };
    config.validate()?;

    handle_command(cli.command, &config).await
}
