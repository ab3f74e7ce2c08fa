//! Notification service

use tracing::warn;

/// Surfaces a message the user has to acknowledge
pub trait Notifier: Send + Sync {
    /// Shows `message` to the user
    fn alert(&self, message: &str);
}

/// Notifier that writes alerts to the log
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn alert(&self, message: &str) {
        warn!(target: "taskwatch::alert", "{}", message);
    }
}
