//! Terminal implementations of the poller's host capabilities

use colored::*;
use taskwatch_poller::{Navigator, Notifier};

/// Prints where to continue once a task succeeds
///
/// Relative redirect targets are resolved against the server URL.
#[derive(Debug, Clone)]
pub struct TerminalNavigator {
    base_url: String,
}

impl TerminalNavigator {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn resolve(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else if url.starts_with('/') {
            format!("{}{}", self.base_url, url)
        } else {
            format!("{}/{}", self.base_url, url)
        }
    }
}

impl Navigator for TerminalNavigator {
    fn navigate(&self, url: &str) {
        println!("  {} {}", "→ Continue at".bold(), self.resolve(url).cyan());
    }
}

/// Prints alerts to stderr
#[derive(Debug, Clone, Default)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn alert(&self, message: &str) {
        eprintln!("{} {}", "✗".red().bold(), message.red());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolves_relative_targets() {
        let navigator = TerminalNavigator::new("http://localhost:8000/");

        assert_eq!(
            navigator.resolve("/admin/orders/"),
            "http://localhost:8000/admin/orders/"
        );
        assert_eq!(navigator.resolve("orders/"), "http://localhost:8000/orders/");
    }

    #[test]
    fn test_keeps_absolute_targets() {
        let navigator = TerminalNavigator::new("http://localhost:8000");

        assert_eq!(
            navigator.resolve("https://reports.example.com/9"),
            "https://reports.example.com/9"
        );
    }
}
