//! Status command handler
//!
//! Fetches a task's status once and prints it.

use anyhow::{Context, Result};
use colored::*;
use std::process::ExitCode;
use taskwatch_core::domain::poll::PollOutcome;
use taskwatch_core::dto::task::TaskStatus;
use taskwatch_poller::Config;

/// Fetch and display a task's status
pub async fn show_status(config: &Config, task_id: &str, json: bool) -> Result<ExitCode> {
    let client = config.status_client()?;

    let status = client
        .get_task_status(task_id)
        .await
        .with_context(|| format!("Failed to fetch status of task {}", task_id))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        print_status(task_id, &status);
    }

    Ok(ExitCode::SUCCESS)
}

/// Print a status summary
fn print_status(task_id: &str, status: &TaskStatus) {
    println!("{}", "Task Status:".bold());
    println!("  ID:       {}", task_id.cyan());

    match PollOutcome::from_status(status.clone()) {
        PollOutcome::Progress(status) => {
            println!("  State:    {}", "running".yellow());
            println!("  Progress: {}%", status.progress_or_zero());
        }
        PollOutcome::Success(status) => {
            println!("  State:    {}", "succeeded".green());
            if let Some(url) = &status.redirect_url {
                println!("  Redirect: {}", url.dimmed());
            }
        }
        PollOutcome::Failure(message) => {
            println!("  State:    {}", "failed".red());
            println!("  Error:    {}", message.red());
        }
        PollOutcome::Timeout => {}
    }

    if !status.extra.is_empty() {
        println!("\n{}", "Details:".bold());
        for (key, value) in &status.extra {
            println!("  {} = {}", key.cyan(), value);
        }
    }
}
