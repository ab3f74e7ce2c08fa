//! Task status DTO
//!
//! The JSON body of `GET /tasks/{task_id}/status/`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Message reported when a task fails without saying why
pub const FALLBACK_FAILURE_MESSAGE: &str = "Task failed";

/// Status of a server-tracked task
///
/// Missing booleans read as `false`, so a body without `ready` is treated as
/// a task that is still running. Fields the poller does not interpret are
/// kept in `extra` and serialized back out unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskStatus {
    /// The task reached a terminal state
    #[serde(default)]
    pub ready: bool,

    /// Only meaningful when `ready` is true
    #[serde(default)]
    pub success: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Only meaningful when `ready` is false
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<f64>,

    /// Follow-up navigation target on success
    #[serde(
        default,
        alias = "redirectUrl",
        skip_serializing_if = "Option::is_none"
    )]
    pub redirect_url: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TaskStatus {
    /// A running task at the given progress
    pub fn running(progress: f64) -> Self {
        Self {
            progress: Some(progress),
            ..Default::default()
        }
    }

    /// A task that finished successfully
    pub fn succeeded() -> Self {
        Self {
            ready: true,
            success: true,
            ..Default::default()
        }
    }

    /// A task that finished with an error
    pub fn failed(error: Option<String>) -> Self {
        Self {
            ready: true,
            success: false,
            error,
            ..Default::default()
        }
    }

    /// Sets the redirect target
    pub fn with_redirect(mut self, url: impl Into<String>) -> Self {
        self.redirect_url = Some(url.into());
        self
    }

    /// Reported progress, 0 when the server sent none
    pub fn progress_or_zero(&self) -> f64 {
        self.progress.unwrap_or(0.0)
    }

    /// Server-provided error message, or the generic fallback when it is
    /// missing or empty
    pub fn failure_message(&self) -> String {
        self.error
            .clone()
            .filter(|message| !message.is_empty())
            .unwrap_or_else(|| FALLBACK_FAILURE_MESSAGE.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_progress_payload() {
        let status: TaskStatus =
            serde_json::from_value(json!({ "ready": false, "progress": 42.5 })).unwrap();

        assert!(!status.ready);
        assert_eq!(status.progress, Some(42.5));
        assert!(status.extra.is_empty());
    }

    #[test]
    fn test_missing_fields_default_to_not_ready() {
        let status: TaskStatus = serde_json::from_value(json!({})).unwrap();

        assert!(!status.ready);
        assert!(!status.success);
        assert_eq!(status.progress_or_zero(), 0.0);
    }

    #[test]
    fn test_redirect_accepts_both_spellings() {
        let snake: TaskStatus =
            serde_json::from_value(json!({ "ready": true, "success": true, "redirect_url": "/a/" }))
                .unwrap();
        let camel: TaskStatus =
            serde_json::from_value(json!({ "ready": true, "success": true, "redirectUrl": "/b/" }))
                .unwrap();

        assert_eq!(snake.redirect_url.as_deref(), Some("/a/"));
        assert_eq!(camel.redirect_url.as_deref(), Some("/b/"));
    }

    #[test]
    fn test_unknown_fields_are_preserved() {
        let body = json!({ "ready": true, "success": true, "result": { "rows": 12 } });
        let status: TaskStatus = serde_json::from_value(body.clone()).unwrap();

        assert_eq!(status.extra.get("result"), Some(&json!({ "rows": 12 })));
        assert_eq!(serde_json::to_value(&status).unwrap(), body);
    }

    #[test]
    fn test_failure_message_fallback() {
        assert_eq!(TaskStatus::failed(None).failure_message(), "Task failed");
        assert_eq!(
            TaskStatus::failed(Some("disk full".to_string())).failure_message(),
            "disk full"
        );
    }

    #[test]
    fn test_empty_error_uses_fallback() {
        let status: TaskStatus =
            serde_json::from_value(json!({ "ready": true, "success": false, "error": "" }))
                .unwrap();

        assert_eq!(status.failure_message(), "Task failed");
    }
}
