//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod status;
mod watch;

use anyhow::Result;
use clap::Subcommand;
use std::process::ExitCode;
use taskwatch_poller::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Poll a task until it succeeds, fails or times out
    Watch {
        /// Task identifier
        task_id: String,
    },
    /// Show the current status of a task
    Status {
        /// Task identifier
        task_id: String,

        /// Print the raw JSON payload
        #[arg(long)]
        json: bool,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
///
/// # Arguments
/// * `command` - The command to execute
/// * `config` - The resolved configuration
///
/// # Returns
/// The process exit code
pub async fn handle_command(command: Commands, config: &Config) -> Result<ExitCode> {
    match command {
        Commands::Watch { task_id } => watch::watch_task(config, &task_id).await,
        Commands::Status { task_id, json } => status::show_status(config, &task_id, json).await,
    }
}
