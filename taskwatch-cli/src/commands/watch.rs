//! Watch command handler
//!
//! Runs a polling session in the foreground and reports each outcome.

use anyhow::Result;
use colored::*;
use std::process::ExitCode;
use std::sync::Arc;
use taskwatch_core::domain::poll::PollPhase;
use taskwatch_core::dto::task::TaskStatus;
use taskwatch_poller::{Config, HttpStatusRepository, Navigator, PollSession};
use tracing::info;

use crate::terminal::{TerminalNavigator, TerminalNotifier};

/// Exit code used when the user interrupts the watch
const INTERRUPTED: u8 = 130;

/// Poll a task until it reaches a terminal state
///
/// Exits 0 on success, 1 on failure or timeout.
pub async fn watch_task(config: &Config, task_id: &str) -> Result<ExitCode> {
    let repository = Arc::new(HttpStatusRepository::new(config.status_client()?));
    let navigator = TerminalNavigator::new(&config.base_url);
    let success_task_id = task_id.to_string();

    let options = config
        .poll_options()
        .on_progress(print_progress)
        .on_success(move |status| {
            print_success(&success_task_id, status);
            if let Some(url) = &status.redirect_url {
                navigator.navigate(url);
            }
        })
        .with_notifier(TerminalNotifier);

    let mut session = PollSession::new(task_id, repository, options)?;

    println!(
        "{} {} (every {:?}, up to {} polls)",
        "Watching task".bold(),
        task_id.cyan(),
        config.poll_interval,
        config.max_polls
    );

    session.start()?;

    let phase = tokio::select! {
        phase = session.finished() => Some(phase),
        _ = tokio::signal::ctrl_c() => None,
    };

    let Some(phase) = phase else {
        session.stop();
        println!("{}", "Interrupted, stopped polling.".yellow());
        return Ok(ExitCode::from(INTERRUPTED));
    };

    info!(
        "Task {} ended as {} after {} poll(s)",
        task_id,
        phase,
        session.poll_count()
    );

    Ok(match phase {
        PollPhase::Succeeded => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    })
}

/// Print a progress line
fn print_progress(status: &TaskStatus) {
    println!("  {} {:>5.1}%", "▸".cyan(), status.progress_or_zero());
}

/// Print the success summary and payload details
fn print_success(task_id: &str, status: &TaskStatus) {
    println!("{} Task {} succeeded", "✓".green().bold(), task_id.cyan());

    for (key, value) in &status.extra {
        println!("    {} = {}", key.cyan(), value);
    }
}
