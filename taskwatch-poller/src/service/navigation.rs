//! Navigation service

use tracing::info;

/// Moves the user to a follow-up location after a task succeeds
pub trait Navigator: Send + Sync {
    /// Navigates to `url`
    fn navigate(&self, url: &str);
}

/// Navigator that only records the target in the log
#[derive(Debug, Clone, Default)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn navigate(&self, url: &str) {
        info!("Navigate to {}", url);
    }
}
